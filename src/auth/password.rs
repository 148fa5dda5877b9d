use thiserror::Error;
use tokio::sync::OnceCell;

/// Stand-in hash checked when the account does not exist.
static UNKNOWN_USER_HASH: OnceCell<String> = OnceCell::const_new();

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, PasswordError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?;
    Ok(matches)
}

/// Pays the same bcrypt cost as a real check, then fails.
pub async fn reject_unknown_user(password: String, cost: u32) -> Result<bool, PasswordError> {
    let hash = UNKNOWN_USER_HASH
        .get_or_try_init(|| hash_password("unknown-user".to_string(), cost))
        .await?;
    verify_password(password, hash.clone()).await?;
    Ok(false)
}
