//! Ledger, budget and statistics engine.
//!
//! Every operation is scoped to an owner ([`UserId`]): rows belonging to other
//! users are neither visible nor mutable. The [`Engine`] holds the injected
//! database handle and opens one database transaction per operation.

pub use budgets::Budget;
pub use error::EngineError;
pub use money::MoneyCents;
pub use month::Month;
pub use ops::{CategoryTotal, Engine, EngineBuilder, StatsReport};
pub use transactions::{
    DEFAULT_CATEGORY, NewTransaction, Transaction, TransactionId, TransactionKind,
};
pub use users::{User, UserId};

mod budgets;
mod error;
mod money;
mod month;
mod ops;
mod password;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
