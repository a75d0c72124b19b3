//! Validation Error Types

use thiserror::Error;

/// Errors raised when an ad description is not usable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required field absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Budget must be a positive, finite amount
    #[error("Budget must be greater than zero, got {0}")]
    InvalidBudget(f64),

    /// Budget above `MAX_BUDGET`
    #[error("Budget must be at most {max}, got {0}", max = crate::MAX_BUDGET)]
    BudgetTooLarge(f64),
}
