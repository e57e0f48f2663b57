/*
 * Responsibility
 * - the resolved identity of an authenticated caller (one request)
 * - immutable once built: fields are read through accessors only
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: i64,
    email: String,
    display_name: String,
}

impl Principal {
    pub fn new(user_id: i64, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: display_name.into(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
