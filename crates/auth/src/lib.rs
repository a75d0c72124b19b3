//! Authentication
//!
//! PBKDF2 password hashing and HS256 bearer tokens. Transport-agnostic: the
//! API crate decides where tokens come from.

mod password;
mod signup;
mod token;

pub use password::{hash_password, verify_password, MIN_PASSWORD_LEN};
pub use signup::SignupRequest;
pub use token::{Claims, TokenIssuer};

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token has expired")]
    Expired,
    #[error("{0}")]
    InvalidSignup(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Invalid auth configuration: {0}")]
    InvalidConfig(String),
}
