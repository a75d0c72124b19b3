//! Signup Validation

use crate::{AuthError, MIN_PASSWORD_LEN};
use serde::Deserialize;

/// Signup form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Check required fields, email shape and password length
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(AuthError::InvalidSignup(
                "Please provide name, email and password".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(AuthError::InvalidSignup(
                "Please provide a valid email".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidSignup(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}
