use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod budgets;
mod statistics;
mod transactions;
mod users;

pub use statistics::{CategoryTotal, StatsReport};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: Option<&str>, label: &str) -> ResultEngine<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| EngineError::InvalidInput(format!("{label} is required")))
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(
            normalize_required_text(Some("  Rent "), "description").unwrap(),
            "Rent"
        );
        assert_eq!(
            normalize_required_text(Some("   "), "description"),
            Err(EngineError::InvalidInput("description is required".to_string()))
        );
        assert_eq!(
            normalize_required_text(None, "category"),
            Err(EngineError::InvalidInput("category is required".to_string()))
        );
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some(" Food ")), Some("Food".to_string()));
        assert_eq!(normalize_optional_text(Some("")), None);
        assert_eq!(normalize_optional_text(None), None);
    }
}
