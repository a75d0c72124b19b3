//! Campaign Planning
//!
//! Rule-based helpers that size a campaign budget and describe a target
//! audience before an ad is written.

mod audience;
mod budget;

pub use audience::{build_audience, AudienceProfile, AudienceRequest};
pub use budget::{calculate_budget, BudgetPlan, BudgetRequest};

use thiserror::Error;

/// Errors from the planning helpers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("Campaign duration must be at least one day")]
    InvalidDuration,
    #[error("Product price must be a non-negative amount, got {0}")]
    InvalidPrice(f64),
}
