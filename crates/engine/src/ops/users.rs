use sea_orm::{ActiveValue, QueryFilter, SqlErr, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, User, UserId, password, users};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a user and returns its id.
    ///
    /// The username is stored exactly as given and compared case-sensitively;
    /// names with leading or trailing whitespace are rejected. The password is
    /// stored as a salted Argon2 hash, never in plaintext.
    pub async fn register(&self, username: &str, password: &str) -> ResultEngine<UserId> {
        let username = validate_username(username)?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput("password is required".to_string()));
        }
        let password_hash = password::hash(password)?;

        with_tx!(self, |db_tx| {
            let exists = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::DuplicateUsername(username));
            }

            let user = users::ActiveModel {
                id: ActiveValue::NotSet,
                username: ActiveValue::Set(username.clone()),
                password_hash: ActiveValue::Set(password_hash),
            };
            // A concurrent registration can still win between the check and
            // the insert; the unique index catches it.
            let model = user
                .insert(&db_tx)
                .await
                .map_err(|err| duplicate_or_database(err, &username))?;
            Ok(model.id)
        })
    }

    /// Verifies credentials.
    ///
    /// The username must match exactly. Returns `None` both for an unknown
    /// username and for a wrong password; callers cannot tell the two apart.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<User>> {
        if username.is_empty() {
            password::verify_dummy(password);
            return Ok(None);
        }

        let model = with_tx!(self, |db_tx| {
            users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        match model {
            Some(model) if password::verify(password, &model.password_hash) => {
                Ok(Some(model.into()))
            }
            Some(_) => Ok(None),
            None => {
                password::verify_dummy(password);
                Ok(None)
            }
        }
    }

    /// Looks a user up by exact username, without checking credentials.
    pub async fn find_user(&self, username: &str) -> ResultEngine<Option<User>> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.database)
            .await?;
        Ok(model.map(User::from))
    }
}

fn validate_username(username: &str) -> ResultEngine<String> {
    if username.is_empty() {
        return Err(EngineError::InvalidInput("username is required".to_string()));
    }
    if username.trim() != username {
        return Err(EngineError::InvalidInput(
            "username must not start or end with whitespace".to_string(),
        ));
    }
    Ok(username.to_string())
}

fn duplicate_or_database(err: DbErr, username: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            EngineError::DuplicateUsername(username.to_string())
        }
        _ => EngineError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;
    use sea_orm::Database;

    #[test]
    fn usernames_are_taken_verbatim() {
        assert_eq!(validate_username("Alice").unwrap(), "Alice");
        assert_eq!(
            validate_username(""),
            Err(EngineError::InvalidInput("username is required".to_string()))
        );
        for name in [" alice", "alice ", "   "] {
            assert!(matches!(
                validate_username(name),
                Err(EngineError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn unique_violation_maps_to_duplicate_username() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let user = || users::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set("alice".to_string()),
            password_hash: ActiveValue::Set("x".to_string()),
        };

        user().insert(&db).await.unwrap();
        let err = user().insert(&db).await.unwrap_err();
        assert_eq!(
            duplicate_or_database(err, "alice"),
            EngineError::DuplicateUsername("alice".to_string())
        );

        let other = duplicate_or_database(DbErr::Custom("disk".to_string()), "alice");
        assert!(matches!(other, EngineError::Database(_)));
    }
}
