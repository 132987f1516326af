//! Transaction primitives.
//!
//! A `Transaction` is a single dated income or expense owned by one user.
//! Transactions are never edited: they are created and, optionally, deleted.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, UserId};

pub type TransactionId = i64;

/// Storage format of `transactions.date`.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub owner: UserId,
    /// Stored `YYYY-MM-DD` text, returned as written.
    ///
    /// New rows always hold a valid calendar date; rows written by other
    /// means are listed untouched and only need the `YYYY-MM` prefix to be
    /// counted in a month.
    pub date: String,
    pub description: String,
    pub amount: MoneyCents,
    pub category: String,
    pub kind: TransactionKind,
}

/// Input of [`Engine::add_transaction`].
///
/// Only `description` and `amount` are required; everything else has a
/// default.
///
/// [`Engine::add_transaction`]: crate::Engine::add_transaction
#[derive(Clone, Copy, Debug, Default)]
pub struct NewTransaction<'a> {
    /// `YYYY-MM-DD`; today when absent.
    pub date: Option<&'a str>,
    pub description: Option<&'a str>,
    /// Decimal text, e.g. `"12.50"`, with at most two decimal places.
    ///
    /// Amounts are kept in cents, so `"1.999"` is rejected rather than
    /// rounded.
    pub amount: Option<&'a str>,
    /// [`DEFAULT_CATEGORY`] when absent or blank.
    pub category: Option<&'a str>,
    /// Expense when absent.
    pub kind: Option<TransactionKind>,
}

pub(crate) fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| EngineError::InvalidInput(format!("invalid date: {value}")))
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub description: String,
    pub amount_minor: i64,
    pub category: String,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            owner: value.user_id,
            date: value.date,
            description: value.description,
            amount: MoneyCents::new(value.amount_minor),
            category: value.category,
            kind: TransactionKind::try_from(value.kind.as_str())?,
        })
    }
}
