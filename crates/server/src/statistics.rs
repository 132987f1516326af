//! Statistics API endpoints

use api_types::stats::{CategoryTotal, Statistic};
use axum::{Extension, Json, extract::State};
use engine::{Month, User};

use crate::{ServerError, budgets::budget_view, server::ServerState};

/// Handle requests for the caller's statistics of the current month
pub async fn get_stats(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Statistic>, ServerError> {
    let report = state.engine.statistics(user.id, Month::current()).await?;

    Ok(Json(Statistic {
        month: report.month.to_string(),
        income_minor: report.income.cents(),
        expense_minor: report.expense.cents(),
        net_savings_minor: report.net_savings.cents(),
        savings_rate: report.savings_rate,
        categories: report
            .categories
            .into_iter()
            .map(|total| CategoryTotal {
                category: total.category,
                total_minor: total.total.cents(),
            })
            .collect(),
        budgets: report.budgets.into_iter().map(budget_view).collect(),
    }))
}
