//! In-process test support for the HTTP adapter.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};

/// Session middleware for in-process tests.
///
/// Mirrors the production cookie settings except for `Secure`, which is
/// dropped so the actix test client can speak plain HTTP, and the key,
/// which is freshly generated per call so tests never share sessions.
pub fn ephemeral_session() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_secure(false)
        .build()
}
