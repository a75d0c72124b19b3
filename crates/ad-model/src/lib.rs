//! Ad Performance Data Model
//!
//! Types shared by the fallback engine, the oracle client, storage, and the API.

mod ad;
mod error;
mod format;
mod prediction;

pub use ad::{AdInput, Platform, MAX_BUDGET};
pub use error::ValidationError;
pub use format::format_count;
pub use prediction::{Prediction, Sourced, SuggestionSet};
