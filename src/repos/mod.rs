/*
 * Responsibility
 * - persistence for user records (the login / registration collaborator)
 */
pub mod error;
pub mod user_repo;

pub use user_repo::{InMemoryUserRepo, NewUser, PgUserRepo, UserRecord, UserRepo};
