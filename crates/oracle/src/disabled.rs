//! Disabled Oracle

use crate::{Oracle, OracleError};
use ad_model::{AdInput, Prediction, SuggestionSet};
use async_trait::async_trait;

/// Oracle used when no credential is configured; every call fails with
/// [`OracleError::Disabled`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOracle;

#[async_trait]
impl Oracle for DisabledOracle {
    fn name(&self) -> &str {
        "Mock AI"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn predict(&self, _ad: &AdInput) -> Result<Prediction, OracleError> {
        Err(OracleError::Disabled)
    }

    async fn suggest(
        &self,
        _ad: &AdInput,
        _prediction: &Prediction,
    ) -> Result<SuggestionSet, OracleError> {
        Err(OracleError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_disabled() {
        let oracle = DisabledOracle;
        assert!(!oracle.is_enabled());
        let err = oracle.predict(&AdInput::default()).await.unwrap_err();
        assert!(matches!(err, OracleError::Disabled));
    }
}
