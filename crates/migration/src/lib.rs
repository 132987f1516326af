pub use sea_orm_migration::prelude::*;

mod m20240301_000000_init;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240301_000000_init::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

    async fn tables(db: &DatabaseConnection) -> Vec<String> {
        db.query_all(Statement::from_string(
            db.get_database_backend(),
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name IN ('users', 'transactions', 'budgets') \
             ORDER BY name",
        ))
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.try_get("", "name").unwrap())
        .collect()
    }

    #[tokio::test]
    async fn up_and_down() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        assert_eq!(tables(&db).await, ["budgets", "transactions", "users"]);

        Migrator::down(&db, None).await.unwrap();
        assert!(tables(&db).await.is_empty());

        Migrator::up(&db, None).await.unwrap();
        assert_eq!(tables(&db).await.len(), 3);
    }

    #[tokio::test]
    async fn budget_key_is_unique() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();

        db.execute(Statement::from_string(
            backend,
            "INSERT INTO users (username, password_hash) VALUES ('alice', 'x')",
        ))
        .await
        .unwrap();
        let insert = "INSERT INTO budgets (user_id, category, month, amount_minor) \
                      VALUES (1, 'Food', '2024-03', 100)";
        db.execute(Statement::from_string(backend, insert))
            .await
            .unwrap();
        assert!(db.execute(Statement::from_string(backend, insert)).await.is_err());
    }
}
