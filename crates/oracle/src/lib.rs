//! AI Oracle
//!
//! Capability-typed access to an external language model that predicts ad
//! performance. Callers treat every [`OracleError`] as a signal to use the
//! deterministic fallback instead.

mod disabled;
mod extract;
mod gemini;
mod prompt;

pub use disabled::DisabledOracle;
pub use extract::{extract_json_object, parse_json_reply};
pub use gemini::{GeminiConfig, GeminiOracle};
pub use prompt::{prediction_prompt, suggestion_prompt};

use ad_model::{AdInput, Prediction, SuggestionSet};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the oracle
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle disabled: no API key configured")]
    Disabled,
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Oracle returned HTTP {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("No JSON object found in oracle reply")]
    NoJson,
    #[error("Failed to parse oracle JSON: {0}")]
    Parse(String),
    #[error("Oracle timeout after {0}ms")]
    Timeout(u64),
}

/// External predictor of ad performance
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &str;

    /// Whether calls can succeed at all
    fn is_enabled(&self) -> bool;

    /// Predict performance for an ad
    async fn predict(&self, ad: &AdInput) -> Result<Prediction, OracleError>;

    /// Suggest improvements given an ad and its prediction
    async fn suggest(
        &self,
        ad: &AdInput,
        prediction: &Prediction,
    ) -> Result<SuggestionSet, OracleError>;
}
