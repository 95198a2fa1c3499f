//! Session-derived identity for the expense endpoints.
//!
//! The cookie session is the only trusted source of the owning user:
//! request bodies and paths never carry user ids. Expense handlers take a
//! [`CurrentUser`] argument, so a request without a valid session is
//! rejected with 401 before the handler body runs; the login handler is
//! the single writer via [`bind_user`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Bind the authenticated user to the session after a successful login.
pub fn bind_user(session: &Session, user_id: &UserId) -> Result<(), Error> {
    session
        .insert(USER_ID_KEY, user_id.as_ref())
        .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
}

/// The authenticated owner of the rows a request may touch.
pub struct CurrentUser(UserId);

impl CurrentUser {
    /// Consume the extractor, yielding the owning user id.
    pub fn into_id(self) -> UserId {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            let raw = session
                .get::<String>(USER_ID_KEY)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
                .ok_or_else(|| Error::unauthorized("login required"))?;
            // A stored value that fails validation is a forged or corrupted
            // cookie; treat it the same as no session at all.
            let user_id = UserId::new(raw).map_err(|error| {
                warn!(%error, "rejecting session with invalid user id");
                Error::unauthorized("login required")
            })?;
            Ok(Self(user_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const OWNER_ID: &str = "7f1c2ae0-93d4-4b2a-9d6e-2f3a8c5b1e47";

    fn identity_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::ephemeral_session())
            .route(
                "/bind",
                web::post().to(|session: Session| async move {
                    let id = UserId::new(OWNER_ID).expect("fixture id");
                    bind_user(&session, &id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/owner",
                web::get().to(|user: CurrentUser| async move {
                    HttpResponse::Ok().body(user.into_id().to_string())
                }),
            )
    }

    fn session_cookie(
        response: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn a_bound_user_is_visible_on_later_requests() {
        let app = test::init_service(identity_app()).await;

        let bind =
            test::call_service(&app, test::TestRequest::post().uri("/bind").to_request()).await;
        assert_eq!(bind.status(), StatusCode::OK);
        let cookie = session_cookie(&bind);

        let owner = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/owner")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(owner.status(), StatusCode::OK);
        assert_eq!(test::read_body(owner).await, OWNER_ID);
    }

    #[actix_web::test]
    async fn extraction_without_a_session_is_unauthorised() {
        let app = test::init_service(identity_app()).await;

        let owner =
            test::call_service(&app, test::TestRequest::get().uri("/owner").to_request()).await;
        assert_eq!(owner.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn a_forged_user_id_is_treated_as_no_session() {
        let app = test::init_service(identity_app().route(
            "/forge",
            web::post().to(|session: Session| async move {
                session
                    .insert(USER_ID_KEY, "not-a-uuid")
                    .expect("write forged id");
                HttpResponse::Ok()
            }),
        ))
        .await;

        let forged =
            test::call_service(&app, test::TestRequest::post().uri("/forge").to_request()).await;
        let cookie = session_cookie(&forged);

        let owner = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/owner")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(owner.status(), StatusCode::UNAUTHORIZED);
    }
}
