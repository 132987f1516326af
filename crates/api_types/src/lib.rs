use serde::{Deserialize, Serialize};

/// A monetary amount as sent by clients.
///
/// Both `12.5` and `"12.50"` are accepted; the engine parses the textual form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
}

impl AmountInput {
    /// Returns the amount in the textual form understood by the engine.
    pub fn to_text(&self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

pub mod user {
    use super::*;

    /// Request body for `/signup` and `/login`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        #[serde(default)]
        pub username: String,
        #[serde(default)]
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i64,
        pub username: String,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TransactionKind {
        #[serde(alias = "income")]
        Income,
        #[serde(alias = "expense")]
        Expense,
    }

    /// Request body for creating a transaction.
    ///
    /// Omitted fields fall back to: today's date, category `"Other"`,
    /// kind `Expense`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// `YYYY-MM-DD`.
        pub date: Option<String>,
        pub description: Option<String>,
        pub amount: Option<AmountInput>,
        pub category: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<TransactionKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        /// `YYYY-MM-DD`, as stored.
        pub date: String,
        pub description: String,
        pub amount_minor: i64,
        pub category: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        /// Newest date first.
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: i64,
    }
}

pub mod budget {
    use super::*;

    /// Request body for setting a budget of the current month.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetSet {
        pub category: Option<String>,
        pub amount: Option<AmountInput>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub category: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        /// `YYYY-MM`.
        pub month: String,
        pub budgets: Vec<BudgetView>,
    }
}

pub mod stats {
    use super::*;
    use crate::budget::BudgetView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        /// `YYYY-MM`.
        pub month: String,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub net_savings_minor: i64,
        /// Percentage of income saved; `0.0` when there is no income.
        pub savings_rate: f64,
        pub categories: Vec<CategoryTotal>,
        pub budgets: Vec<BudgetView>,
    }
}
