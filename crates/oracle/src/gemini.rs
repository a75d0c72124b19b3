//! Gemini Oracle Client

use crate::extract::parse_json_reply;
use crate::prompt::{prediction_prompt, suggestion_prompt};
use crate::{Oracle, OracleError};
use ad_model::{AdInput, Prediction, SuggestionSet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Header carrying the API key; keeps it out of URLs and error text
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model name, e.g. `gemini-2.0-flash-exp`
    pub model: String,
    /// API root; overridable for tests and proxies
    pub base_url: String,
    /// Per-request timeout (ms)
    pub timeout_ms: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gemini-2.0-flash-exp".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Oracle backed by the Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiOracle {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiOracle {
    /// Create a new Gemini oracle
    pub fn new(config: GeminiConfig) -> Result<Self, OracleError> {
        info!("Creating Gemini oracle with model: {}", config.model);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send a prompt and return the text of the first candidate
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": 0.4,
                "topP": 0.95,
                "maxOutputTokens": 1024
            }
        });

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.config.timeout_ms)
                } else {
                    OracleError::Transport(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.without_url().to_string()))?;

        let text = body
            .get("candidates")
            .and_then(|candidates| candidates.get(0))
            .and_then(|first| first.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(|parts| parts.get(0))
            .and_then(|part| part.get("text"))
            .and_then(|text| text.as_str())
            .ok_or_else(|| OracleError::MalformedResponse("missing candidate text".to_string()))?;

        debug!("Gemini replied in {}ms", start.elapsed().as_millis());
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl Oracle for GeminiOracle {
    fn name(&self) -> &str {
        "Gemini AI"
    }

    fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn predict(&self, ad: &AdInput) -> Result<Prediction, OracleError> {
        let reply = self.generate(&prediction_prompt(ad)).await?;
        parse_json_reply(&reply)
    }

    async fn suggest(
        &self,
        ad: &AdInput,
        prediction: &Prediction,
    ) -> Result<SuggestionSet, OracleError> {
        let reply = self.generate(&suggestion_prompt(ad, prediction)).await?;
        parse_json_reply(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::RawQuery,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };

    /// Serve `reply` from a local stand-in for the Gemini API. Requests that
    /// do not carry the key in the header, or that leak it into the query
    /// string, get a 403.
    async fn spawn_stub(status: StatusCode, reply: serde_json::Value) -> String {
        let app = Router::new().route(
            "/v1beta/models/:model",
            post(move |headers: HeaderMap, RawQuery(query): RawQuery| {
                let reply = reply.clone();
                async move {
                    let key_in_header = headers
                        .get(API_KEY_HEADER)
                        .and_then(|v| v.to_str().ok())
                        == Some("test-key");
                    if !key_in_header || query.is_some() {
                        return (StatusCode::FORBIDDEN, Json(json!({})));
                    }
                    (status, Json(reply))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn candidate(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    fn oracle(base_url: String) -> GeminiOracle {
        GeminiOracle::new(GeminiConfig {
            base_url,
            timeout_ms: 2_000,
            ..GeminiConfig::new("test-key")
        })
        .unwrap()
    }

    fn ad() -> AdInput {
        AdInput::new("Summer Sale", "Get 50% off", 100.0, "young adults", "Instagram")
    }

    #[tokio::test]
    async fn test_predict_parses_candidate() {
        let reply = candidate(
            "```json\n{\"ctr\": 2.5, \"reach\": 15000, \"engagement\": 375, \
             \"confidence\": 0.85, \"explanation\": \"ok\"}\n```",
        );
        let base = spawn_stub(StatusCode::OK, reply).await;

        let prediction = oracle(base).predict(&ad()).await.unwrap();
        assert_eq!(prediction.ctr, 2.5);
        assert_eq!(prediction.reach, 15000);
    }

    #[tokio::test]
    async fn test_suggest_parses_candidate() {
        let reply = candidate(
            r#"{"improved_text": ["a", "b"], "targeting": "t", "budget_adjustment": "b",
                "platform_recommendation": "Instagram", "explanation": "e"}"#,
        );
        let base = spawn_stub(StatusCode::OK, reply).await;
        let prediction = Prediction {
            ctr: 1.0,
            reach: 10,
            engagement: 1,
            confidence: 0.7,
            explanation: String::new(),
        };

        let suggestions = oracle(base).suggest(&ad(), &prediction).await.unwrap();
        assert_eq!(suggestions.improved_text, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let base = spawn_stub(StatusCode::TOO_MANY_REQUESTS, json!({})).await;
        let err = oracle(base).predict(&ad()).await.unwrap_err();
        assert!(matches!(err, OracleError::Status(429)));
    }

    #[tokio::test]
    async fn test_missing_candidates() {
        let base = spawn_stub(StatusCode::OK, json!({ "candidates": [] })).await;
        let err = oracle(base).predict(&ad()).await.unwrap_err();
        assert!(matches!(err, OracleError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_prose_without_json() {
        let base = spawn_stub(StatusCode::OK, candidate("I cannot help with that.")).await;
        let err = oracle(base).predict(&ad()).await.unwrap_err();
        assert!(matches!(err, OracleError::NoJson));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        // Port 9 (discard) on localhost is expected to refuse the connection
        let err = oracle("http://127.0.0.1:9".to_string())
            .predict(&ad())
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Transport(_) | OracleError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_key() {
        let secret = "SUPERSECRETKEY123";
        let oracle = GeminiOracle::new(GeminiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 2_000,
            ..GeminiConfig::new(secret)
        })
        .unwrap();

        let err = oracle.predict(&ad()).await.unwrap_err();
        assert!(!err.to_string().contains(secret), "{}", err);
        assert!(!format!("{:?}", err).contains(secret));
    }
}
