//! Fallback Engine

use ad_model::{AdInput, Prediction, SuggestionSet};
use tracing::debug;

/// Stateless fallback engine.
///
/// Cheap to copy and safe to share between request handlers; it holds no
/// state and never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine;

impl FallbackEngine {
    /// Create a new fallback engine
    pub fn new() -> Self {
        Self
    }

    /// Deterministic performance prediction
    pub fn predict(&self, ad: &AdInput) -> Prediction {
        let prediction = crate::predictor::predict(ad);
        debug!(
            "Fallback prediction: ctr={} reach={} engagement={}",
            prediction.ctr, prediction.reach, prediction.engagement
        );
        prediction
    }

    /// Deterministic optimization suggestions
    pub fn suggest(&self, ad: &AdInput, prediction: &Prediction) -> SuggestionSet {
        debug!("Fallback suggestions for ctr={}", prediction.ctr);
        crate::suggester::suggest(ad, prediction)
    }
}
