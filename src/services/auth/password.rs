//! Password hashing (bcrypt).
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    /// `hash = None` means the account does not exist. The password is then
    /// hashed at the same cost and discarded, so unknown logins and wrong
    /// passwords take the same time. The result is always `false`.
    pub async fn verify(&self, password: &str, hash: Option<&str>) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;

        let matches = match hash.map(str::to_owned) {
            Some(hash) => {
                tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??
            }
            None => {
                tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
                false
            }
        };

        Ok(matches)
    }
}
