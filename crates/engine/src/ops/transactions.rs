use chrono::Local;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    DEFAULT_CATEGORY, EngineError, MoneyCents, NewTransaction, ResultEngine, Transaction,
    TransactionId, UserId,
    transactions::{self, DATE_FORMAT, parse_date},
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Records a new transaction for `owner` and returns its id.
    ///
    /// Defaults: today's date, category `"Other"`, kind expense. Identical
    /// inputs always create distinct rows.
    pub async fn add_transaction(
        &self,
        owner: UserId,
        input: NewTransaction<'_>,
    ) -> ResultEngine<TransactionId> {
        let description = normalize_required_text(input.description, "description")?;
        let amount = MoneyCents::parse_positive(input.amount)?;
        let date = match normalize_optional_text(input.date) {
            Some(raw) => parse_date(&raw)?,
            None => Local::now().date_naive(),
        };
        let category =
            normalize_optional_text(input.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let kind = input.kind.unwrap_or_default();

        with_tx!(self, |db_tx| {
            let model = transactions::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(owner),
                date: ActiveValue::Set(date.format(DATE_FORMAT).to_string()),
                description: ActiveValue::Set(description),
                amount_minor: ActiveValue::Set(amount.cents()),
                category: ActiveValue::Set(category),
                kind: ActiveValue::Set(kind.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;
            Ok::<_, EngineError>(model.id)
        })
    }

    /// Lists every transaction of `owner`, newest date first.
    ///
    /// Transactions sharing a date come back newest-inserted first.
    pub async fn list_transactions(&self, owner: UserId) -> ResultEngine<Vec<Transaction>> {
        let models = with_tx!(self, |db_tx| {
            transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(owner))
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::Id)
                .all(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Deletes a transaction of `owner`.
    ///
    /// Missing ids and ids owned by someone else are a silent no-op, so the
    /// caller learns nothing about other users' rows.
    pub async fn delete_transaction(&self, owner: UserId, id: TransactionId) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.eq(id))
                .filter(transactions::Column::UserId.eq(owner))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                tracing::debug!(owner, id, "delete of unknown transaction ignored");
            }
            Ok::<_, EngineError>(())
        })
    }
}
