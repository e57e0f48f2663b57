/*
 * Responsibility
 * - users storage behind the UserRepo trait
 * - PgUserRepo: SQLx against PostgreSQL
 * - InMemoryUserRepo: process-local store (no DATABASE_URL, tests)
 */
use std::sync::{
    RwLock,
    atomic::{AtomicI64, Ordering},
};

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub password_hash: String,
}

/// Storage seam used by registration, login and `/api/users/me`.
///
/// Implementations must be cheap to share (`Arc<dyn UserRepo>` in AppState).
#[async_trait]
pub trait UserRepo: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Fails with `RepoError::Conflict` when the email is already taken.
    async fn create(&self, user: NewUser) -> Result<UserRecord, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;

    // Names are not unique: every account with `name`, oldest first.
    async fn find_all_by_name(&self, name: &str) -> Result<Vec<UserRecord>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn ensure_schema(&self) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id            BIGSERIAL PRIMARY KEY,
                name          TEXT NOT NULL,
                age           INTEGER NOT NULL,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, RepoError> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, age, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, age, email, password_hash
            "#,
        )
        .bind(&user.name)
        .bind(user.age)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| RepoError::from_sqlx(e, &user.email))?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, age, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, age, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn find_all_by_name(&self, name: &str) -> Result<Vec<UserRecord>, RepoError> {
        let rows = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, age, email, password_hash
            FROM users
            WHERE name = $1
            ORDER BY id ASC
            "#,
        )
        .bind(name)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    next_id: AtomicI64,
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<UserRecord>> {
        // poisoning is ignored: every write is a single push
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn find(&self, pred: impl Fn(&UserRecord) -> bool) -> Option<UserRecord> {
        self.read().iter().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, RepoError> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());

        if users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict { email: user.email });
        }

        let record = UserRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: user.name,
            age: user.age,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.push(record.clone());

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn find_all_by_name(&self, name: &str) -> Result<Vec<UserRecord>, RepoError> {
        Ok(self.read().iter().filter(|u| u.name == name).cloned().collect())
    }
}
