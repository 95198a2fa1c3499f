//! Expense API handlers.
//!
//! ```text
//! GET    /api/v1/expenses       List the caller's expenses with their total
//! POST   /api/v1/expenses      Record a new expense
//! DELETE /api/v1/expenses/{id} Remove an expense owned by the caller
//! ```
//!
//! The owning user always comes from the session; bodies and paths carry
//! only expense data. Input validation happens here, before any storage
//! access, so a rejected request never touches the database.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Amount, Category, Description, Error, Expense, ExpenseId, ExpenseOverview, NewExpense, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_field_error, missing_field_error};

/// Request payload for recording an expense.
///
/// `amount` accepts a JSON number or a numeric string; either way it is
/// parsed into a typed amount before any storage call.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenseRequest {
    /// Amount spent; JSON number or numeric string.
    #[schema(value_type = Option<f64>, example = 49.99)]
    pub amount: Option<serde_json::Value>,
    /// What the money went on.
    pub description: Option<String>,
    /// Grouping label.
    pub category: Option<String>,
}

/// A single expense as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Amount spent.
    pub amount: f64,
    /// What the money went on.
    pub description: String,
    /// Grouping label.
    pub category: String,
}

impl From<Expense> for ExpenseResponse {
    fn from(value: Expense) -> Self {
        Self {
            id: value.id.value(),
            amount: value.amount.to_f64(),
            description: value.description.into(),
            category: value.category.into(),
        }
    }
}

/// Response payload for the expense overview.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListResponse {
    /// All of the caller's expenses, in storage order.
    pub expenses: Vec<ExpenseResponse>,
    /// Cached total across those expenses; zero when there are none.
    pub total_amount: f64,
}

impl From<ExpenseOverview> for ExpenseListResponse {
    fn from(value: ExpenseOverview) -> Self {
        Self {
            expenses: value.expenses.into_iter().map(Into::into).collect(),
            total_amount: value.total.to_f64(),
        }
    }
}

fn parse_amount_field(value: serde_json::Value) -> Result<Amount, Error> {
    let raw = match value {
        serde_json::Value::Number(number) => number.to_string(),
        serde_json::Value::String(text) => text,
        other => {
            return Err(invalid_field_error(
                "amount",
                "invalid_amount",
                "amount must be a number",
                other.to_string(),
            ));
        }
    };
    Amount::parse(&raw)
        .map_err(|err| invalid_field_error("amount", "invalid_amount", err.to_string(), raw))
}

fn parse_new_expense(user_id: UserId, payload: NewExpenseRequest) -> Result<NewExpense, Error> {
    let amount = payload
        .amount
        .ok_or_else(|| missing_field_error("amount"))
        .and_then(parse_amount_field)?;
    // An empty string counts as absent, matching the presence checks the
    // contract requires for description and category.
    let description = payload
        .description
        .and_then(|raw| Description::new(raw).ok())
        .ok_or_else(|| missing_field_error("description"))?;
    let category = payload
        .category
        .and_then(|raw| Category::new(raw).ok())
        .ok_or_else(|| missing_field_error("category"))?;

    Ok(NewExpense {
        user_id,
        amount,
        description,
        category,
    })
}

/// Fetch the authenticated user's expenses and running total.
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    description = "List expenses with the cached total; zero when no expenses exist.",
    responses(
        (status = 200, description = "Expenses and total", body = ExpenseListResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "listExpenses"
)]
#[get("/expenses")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<ExpenseListResponse>> {
    let user_id = user.into_id();
    let overview = state.expenses.overview(&user_id).await?;
    Ok(web::Json(ExpenseListResponse::from(overview)))
}

/// Record a new expense for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = NewExpenseRequest,
    responses(
        (status = 200, description = "Created expense", body = ExpenseResponse),
        (status = 400, description = "Invalid input", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "addExpense"
)]
#[post("/expenses")]
pub async fn add_expense(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<NewExpenseRequest>,
) -> ApiResult<web::Json<ExpenseResponse>> {
    let new_expense = parse_new_expense(user.into_id(), payload.into_inner())?;
    let stored = state.expenses.add(new_expense).await?;
    Ok(web::Json(ExpenseResponse::from(stored)))
}

/// Delete an expense owned by the authenticated user.
///
/// An id that never existed and an id owned by another user are
/// indistinguishable to the caller: both answer 404.
#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    params(("id" = i64, Path, description = "Expense identifier")),
    responses(
        (status = 200, description = "Expense deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown or foreign expense", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["expenses"],
    operation_id = "deleteExpense"
)]
#[delete("/expenses/{id}")]
pub async fn delete_expense(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = user.into_id();
    let raw = path.into_inner();
    let id = raw.parse::<ExpenseId>().map_err(|_| {
        invalid_field_error(
            "id",
            "invalid_expense_id",
            "expense id must be an integer",
            raw.clone(),
        )
    })?;
    state.expenses.remove(&user_id, id).await?;
    Ok(HttpResponse::Ok().finish())
}
