use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::{duplicate, ensure_columns, first_or_not_found};
use crate::database::manager::DatabaseError;
use crate::database::models::{from_row, NewUser, User, UserCredentials, UserSummary};
use crate::database::storage::Storage;
use crate::query::{partial_update, FieldSet, Filter, ParameterizedStatement, Resource};
use crate::validation::schemas::USER_UPDATE;

const NOT_FOUND: &str = "User does not exist";
const PUBLIC_COLUMNS: &str = "username, first_name, last_name, email, photo_url";

/// Account storage. Passwords arrive here already hashed.
pub struct UserRepository {
    storage: Arc<dyn Storage>,
}

impl UserRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>, DatabaseError> {
        let statement = Filter::build(Resource::Users, &FieldSet::new())?;
        let rows = self.storage.execute(&statement).await?;
        rows.into_iter().map(from_row).collect()
    }

    /// Inserts a non-admin account.
    pub async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let statement = ParameterizedStatement::new(
            format!(
                "INSERT INTO users (username, password, first_name, last_name, email, photo_url) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
                PUBLIC_COLUMNS
            ),
            vec![
                json!(user.username),
                json!(user.password),
                json!(user.first_name),
                json!(user.last_name),
                json!(user.email),
                json!(user.photo_url),
            ],
        );
        let rows = self
            .storage
            .execute(&statement)
            .await
            .map_err(|e| duplicate(e, format!("Duplicate username or email: {}", user.username)))?;
        debug!("Registered user {}", user.username);
        from_row(first_or_not_found(rows, NOT_FOUND)?)
    }

    pub async fn get(&self, username: &str) -> Result<User, DatabaseError> {
        let statement = ParameterizedStatement::new(
            format!("SELECT {} FROM users WHERE username = $1", PUBLIC_COLUMNS),
            vec![json!(username)],
        );
        from_row(first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?)
    }

    /// Applies a partial update. The returned row is decoded as the public
    /// `User` view, so the hash and admin flag are dropped.
    pub async fn update(&self, username: &str, fields: &FieldSet) -> Result<User, DatabaseError> {
        ensure_columns(&USER_UPDATE, fields)?;
        let statement = partial_update("users", fields, "username", username)?;
        let rows = self
            .storage
            .execute(&statement)
            .await
            .map_err(|e| duplicate(e, format!("Duplicate email for user: {}", username)))?;
        from_row(first_or_not_found(rows, NOT_FOUND)?)
    }

    pub async fn remove(&self, username: &str) -> Result<(), DatabaseError> {
        let statement = ParameterizedStatement::new(
            "DELETE FROM users WHERE username = $1 RETURNING username",
            vec![json!(username)],
        );
        first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?;
        debug!("Removed user {}", username);
        Ok(())
    }

    /// Stored hash and admin flag for login. `None` when the user is unknown.
    pub async fn credentials(&self, username: &str) -> Result<Option<UserCredentials>, DatabaseError> {
        let statement = ParameterizedStatement::new(
            "SELECT username, password, is_admin FROM users WHERE username = $1",
            vec![json!(username)],
        );
        self.storage
            .execute(&statement)
            .await?
            .into_iter()
            .next()
            .map(from_row::<UserCredentials>)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedStorage;

    #[tokio::test]
    async fn list_orders_by_username() {
        let storage = Arc::new(ScriptedStorage::new());
        let repo = UserRepository::new(storage.clone());

        repo.list().await.unwrap();
        let statement = storage.last().unwrap();
        assert_eq!(
            statement.query,
            "SELECT username, first_name, last_name, email FROM users ORDER BY username"
        );
        assert!(statement.params.is_empty());
    }

    #[tokio::test]
    async fn update_drops_private_columns() {
        let storage = Arc::new(ScriptedStorage::new());
        storage.reply(vec![json!({
            "username": "kenny",
            "password": "$2b$04$hash",
            "first_name": "Ken",
            "last_name": "Lee",
            "email": "ken@example.com",
            "photo_url": null,
            "is_admin": true
        })]);
        let repo = UserRepository::new(storage.clone());

        let user = repo.update("kenny", &FieldSet::new().with("first_name", "Ken")).await.unwrap();
        let body = serde_json::to_value(&user).unwrap();
        assert!(body.get("password").is_none());
        assert!(body.get("is_admin").is_none());

        let statement = storage.last().unwrap();
        assert_eq!(statement.query, "UPDATE users SET first_name=$1 WHERE username=$2 RETURNING *");
    }

    #[tokio::test]
    async fn update_rejects_admin_flag() {
        let storage = Arc::new(ScriptedStorage::new());
        let repo = UserRepository::new(storage.clone());

        let err = repo.update("kenny", &FieldSet::new().with("is_admin", true)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidInput(_)));
        assert!(storage.executed().is_empty());
    }

    #[tokio::test]
    async fn credentials_for_unknown_user_is_none() {
        let storage = Arc::new(ScriptedStorage::new());
        let repo = UserRepository::new(storage);
        assert!(repo.credentials("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn credentials_carry_admin_flag() {
        let storage = Arc::new(ScriptedStorage::new());
        storage.reply(vec![json!({"username": "root", "password": "hash", "is_admin": true})]);
        let repo = UserRepository::new(storage);

        let creds = repo.credentials("root").await.unwrap().unwrap();
        assert!(creds.is_admin);
        assert_eq!(creds.password, "hash");
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let storage = Arc::new(ScriptedStorage::new());
        let repo = UserRepository::new(storage);
        assert!(matches!(repo.get("ghost").await, Err(DatabaseError::NotFound(ref m)) if m == "User does not exist"));
    }
}
