//! Budget API endpoints
//!
//! Budgets are always read and written for the current month.

use api_types::budget::{BudgetListResponse, BudgetSet, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Month, User};

use crate::{ServerError, server::ServerState};

pub(crate) fn budget_view(budget: engine::Budget) -> BudgetView {
    BudgetView {
        category: budget.category,
        amount_minor: budget.amount.cents(),
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let month = Month::current();
    let budgets = state
        .engine
        .list_budgets(user.id, month)
        .await?
        .into_iter()
        .map(budget_view)
        .collect();

    Ok(Json(BudgetListResponse {
        month: month.to_string(),
        budgets,
    }))
}

pub async fn set(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetSet>,
) -> Result<StatusCode, ServerError> {
    let amount = payload
        .amount
        .as_ref()
        .map(|amount| amount.to_text())
        .unwrap_or_default();
    state
        .engine
        .set_budget(
            user.id,
            payload.category.as_deref().unwrap_or_default(),
            &amount,
            Month::current(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_budget(user.id, &category, Month::current())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
