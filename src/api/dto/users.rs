/*
 * Responsibility
 * - Users request/response DTOs
 * - validate() does shape checks only; uniqueness is the repo's job
 */
use serde::{Deserialize, Serialize};

use crate::api::extractors::Validate;
use crate::repos::UserRecord;

pub const MIN_AGE: i32 = 12;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub password: String,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.age < MIN_AGE {
            return Err("age must be at least 12");
        }
        if self.email.trim().is_empty() {
            return Err("email is required");
        }
        if !is_valid_email(self.email.trim()) {
            return Err("email must be a valid address");
        }
        if self.password.trim().is_empty() {
            return Err("password is required");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub email: String,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            name: u.name,
            age: u.age,
            email: u.email,
        }
    }
}

/// `local@domain.tld`: exactly one `@`, non-empty local part, a dotted
/// domain with no empty labels, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
