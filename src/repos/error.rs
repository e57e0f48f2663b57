/**
 * Responsibility
 * - what the repo layer reports upwards
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("email already registered: {email}")]
    Conflict { email: String },
}

impl RepoError {
    /// Give meaning to unique violations on `users.email` (SQLSTATE 23505).
    pub fn from_sqlx(e: sqlx::Error, email: &str) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict {
                email: email.to_string(),
            };
        }
        RepoError::Db(e)
    }
}
