//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: the expense endpoints, the session login, the health
//! probes, and the session cookie security scheme. The generated document
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::expenses::{ExpenseListResponse, ExpenseResponse, NewExpenseRequest};
use crate::inbound::http::users::LoginRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Expense tracker backend API",
        description = "Session-authenticated expense tracking: list, add, and delete expenses with a per-user running total."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::add_expense,
        crate::inbound::http::expenses::delete_expense,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        NewExpenseRequest,
        ExpenseResponse,
        ExpenseListResponse,
    )),
    tags(
        (name = "users", description = "Session establishment"),
        (name = "expenses", description = "Expense tracking operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
