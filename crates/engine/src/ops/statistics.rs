use sea_orm::{ConnectionTrait, Statement, TransactionTrait, Value};
use serde::{Deserialize, Serialize};

use crate::{Budget, EngineError, MoneyCents, Month, ResultEngine, TransactionKind, UserId};

use super::{Engine, budgets::budgets_for_month, with_tx};

/// Transactions of one owner and kind whose date starts with the month text.
///
/// This is a textual prefix test on the stored date, not a calendar range.
const MONTH_FILTER: &str = "user_id = ? AND kind = ? AND substr(date, 1, 7) = ?";

/// Summed expenses of one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: MoneyCents,
}

/// Monthly figures for one owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub month: Month,
    pub income: MoneyCents,
    pub expense: MoneyCents,
    pub net_savings: MoneyCents,
    /// Net savings as a percentage of income; `0.0` when there is no income.
    pub savings_rate: f64,
    /// Only categories with at least one expense, sorted by name.
    pub categories: Vec<CategoryTotal>,
    pub budgets: Vec<Budget>,
}

fn savings_rate(income: MoneyCents, net_savings: MoneyCents) -> f64 {
    if !income.is_positive() {
        return 0.0;
    }
    net_savings.cents() as f64 * 100.0 / income.cents() as f64
}

fn month_values(owner: UserId, kind: TransactionKind, month: Month) -> Vec<Value> {
    vec![owner.into(), kind.as_str().into(), month.to_string().into()]
}

impl Engine {
    /// Computes income, expense, savings and per-category totals of `owner`
    /// for `month`, together with the budgets set for that month.
    ///
    /// All figures are read inside one database transaction.
    pub async fn statistics(&self, owner: UserId, month: Month) -> ResultEngine<StatsReport> {
        with_tx!(self, |db_tx| {
            let income = sum_for_kind(&db_tx, owner, TransactionKind::Income, month).await?;
            let expense = sum_for_kind(&db_tx, owner, TransactionKind::Expense, month).await?;
            let categories = expenses_by_category(&db_tx, owner, month).await?;
            let budgets = budgets_for_month(&db_tx, owner, month).await?;

            let net_savings = income - expense;
            Ok::<_, EngineError>(StatsReport {
                month,
                income,
                expense,
                net_savings,
                savings_rate: savings_rate(income, net_savings),
                categories,
                budgets,
            })
        })
    }
}

async fn sum_for_kind<C: ConnectionTrait>(
    db: &C,
    owner: UserId,
    kind: TransactionKind,
    month: Month,
) -> ResultEngine<MoneyCents> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        format!(
            "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
             FROM transactions \
             WHERE {MONTH_FILTER}"
        ),
        month_values(owner, kind, month),
    );
    let sum: i64 = match db.query_one(stmt).await? {
        Some(row) => row.try_get("", "sum")?,
        None => 0,
    };
    Ok(MoneyCents::new(sum))
}

async fn expenses_by_category<C: ConnectionTrait>(
    db: &C,
    owner: UserId,
    month: Month,
) -> ResultEngine<Vec<CategoryTotal>> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        format!(
            "SELECT category, COALESCE(SUM(amount_minor), 0) AS total \
             FROM transactions \
             WHERE {MONTH_FILTER} \
             GROUP BY category \
             ORDER BY category"
        ),
        month_values(owner, TransactionKind::Expense, month),
    );

    db.query_all(stmt)
        .await?
        .into_iter()
        .map(|row| -> ResultEngine<CategoryTotal> {
            Ok(CategoryTotal {
                category: row.try_get("", "category")?,
                total: MoneyCents::new(row.try_get("", "total")?),
            })
        })
        .collect()
}
