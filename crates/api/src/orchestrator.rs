//! Prediction Orchestrator
//!
//! Asks the oracle first and falls back to the deterministic engine on any
//! error, timeout, or out-of-shape reply.

use ad_model::{AdInput, Prediction, Sourced, SuggestionSet};
use fallback::FallbackEngine;
use oracle::{Oracle, OracleError};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Combines an [`Oracle`] with the [`FallbackEngine`]
#[derive(Clone)]
pub struct PredictionService {
    oracle: Arc<dyn Oracle>,
    fallback: FallbackEngine,
    timeout: Duration,
}

impl PredictionService {
    pub fn new(oracle: Arc<dyn Oracle>, timeout: Duration) -> Self {
        Self {
            oracle,
            fallback: FallbackEngine::new(),
            timeout,
        }
    }

    /// Name of the configured oracle, for health output
    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    pub async fn predict(&self, ad: &AdInput) -> Sourced<Prediction> {
        if self.oracle.is_enabled() {
            match self.bounded(self.oracle.predict(ad)).await {
                Ok(prediction) if prediction.is_well_formed() => {
                    record_source("predictions_total", "oracle");
                    return Sourced::oracle(prediction);
                }
                Ok(prediction) => {
                    warn!("Oracle prediction out of range, using fallback: {:?}", prediction);
                }
                Err(e) => warn!("Oracle prediction failed, using fallback: {}", e),
            }
        }

        record_source("predictions_total", "fallback");
        Sourced::fallback(self.fallback.predict(ad))
    }

    pub async fn suggest(&self, ad: &AdInput, prediction: &Prediction) -> Sourced<SuggestionSet> {
        if self.oracle.is_enabled() {
            match self.bounded(self.oracle.suggest(ad, prediction)).await {
                Ok(suggestions) if suggestions.is_well_formed() => {
                    record_source("suggestions_total", "oracle");
                    return Sourced::oracle(suggestions);
                }
                Ok(suggestions) => warn!(
                    "Oracle returned {} text variants, using fallback",
                    suggestions.improved_text.len()
                ),
                Err(e) => warn!("Oracle suggestions failed, using fallback: {}", e),
            }
        }

        record_source("suggestions_total", "fallback");
        Sourced::fallback(self.fallback.suggest(ad, prediction))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, OracleError>>,
    ) -> Result<T, OracleError> {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout(self.timeout.as_millis() as u64)),
        };
        let elapsed = start.elapsed();
        metrics::histogram!("oracle_request_seconds").record(elapsed.as_secs_f64());
        debug!("Oracle call finished in {:?}", elapsed);
        result
    }
}

fn record_source(counter: &'static str, source: &'static str) {
    metrics::counter!(counter, "source" => source).increment(1);
}
