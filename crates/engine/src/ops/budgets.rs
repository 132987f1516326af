use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::{Budget, EngineError, MoneyCents, Month, ResultEngine, UserId, budgets};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Sets the budget of `category` for `month`, replacing any previous
    /// amount for the same key.
    pub async fn set_budget(
        &self,
        owner: UserId,
        category: &str,
        amount: &str,
        month: Month,
    ) -> ResultEngine<()> {
        let category = normalize_required_text(Some(category), "category")?;
        let amount = MoneyCents::parse_positive(Some(amount))?;

        with_tx!(self, |db_tx| {
            let budget = budgets::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(owner),
                category: ActiveValue::Set(category),
                month: ActiveValue::Set(month.to_string()),
                amount_minor: ActiveValue::Set(amount.cents()),
            };
            budgets::Entity::insert(budget)
                .on_conflict(
                    OnConflict::columns([
                        budgets::Column::UserId,
                        budgets::Column::Category,
                        budgets::Column::Month,
                    ])
                    .update_column(budgets::Column::AmountMinor)
                    .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
            Ok::<_, EngineError>(())
        })
    }

    /// Removes the budget of `category` for `month`, if any.
    pub async fn delete_budget(&self, owner: UserId, category: &str, month: Month) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = budgets::Entity::delete_many()
                .filter(budgets::Column::UserId.eq(owner))
                .filter(budgets::Column::Category.eq(category.trim()))
                .filter(budgets::Column::Month.eq(month.to_string()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                tracing::debug!(owner, category, %month, "delete of unknown budget ignored");
            }
            Ok::<_, EngineError>(())
        })
    }

    /// Lists the budgets of `owner` for `month`, sorted by category.
    pub async fn list_budgets(&self, owner: UserId, month: Month) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| budgets_for_month(&db_tx, owner, month).await)
    }
}

pub(super) async fn budgets_for_month<C: ConnectionTrait>(
    db: &C,
    owner: UserId,
    month: Month,
) -> ResultEngine<Vec<Budget>> {
    budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(owner))
        .filter(budgets::Column::Month.eq(month.to_string()))
        .order_by_asc(budgets::Column::Category)
        .all(db)
        .await?
        .into_iter()
        .map(Budget::try_from)
        .collect()
}
