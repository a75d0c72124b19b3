//! Rule-Based Fallback System
//!
//! Provides deterministic ad performance predictions and optimization
//! suggestions when the AI oracle is unavailable. Nothing here performs I/O,
//! and equal inputs always produce equal outputs.

mod engine;
mod fingerprint;
mod predictor;
mod suggester;

pub use engine::FallbackEngine;
pub use fingerprint::fingerprint;
pub use predictor::predict;
pub use suggester::{suggest, CTR_THRESHOLD, REACH_PER_DOLLAR_THRESHOLD};
