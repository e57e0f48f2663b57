pub mod login;
pub mod password;
pub mod principal;
pub mod token_service;

pub use login::{LoginOutcome, LoginService};
pub use password::PasswordHasher;
pub use principal::Principal;
pub use token_service::{Claims, TOKEN_TTL_HOURS, TokenService, ValidationError};
