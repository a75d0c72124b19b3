//! Ad Input

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted budget in dollars. Keeps derived counts well inside the
/// range storage can hold.
pub const MAX_BUDGET: f64 = 1e12;

/// Advertising platform the ad runs on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Facebook,
    Instagram,
    /// Wire name `"Google Ads"`
    GoogleAds,
    /// Any other platform, kept verbatim
    Other(String),
}

impl Platform {
    /// Get string representation
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::GoogleAds => "Google Ads",
            Platform::Other(name) => name,
        }
    }

    /// CTR multiplier used by the fallback predictor
    pub fn ctr_multiplier(&self) -> f64 {
        match self {
            Platform::Facebook => 1.2,
            Platform::Instagram => 1.5,
            Platform::GoogleAds | Platform::Other(_) => 1.0,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Other(String::new())
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Facebook" => Platform::Facebook,
            "Instagram" => Platform::Instagram,
            "Google Ads" => Platform::GoogleAds,
            _ => Platform::Other(name),
        }
    }
}

impl From<&str> for Platform {
    fn from(name: &str) -> Self {
        Platform::from(name.to_string())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of an advertisement submitted for prediction.
///
/// Every field defaults when absent so that partially filled payloads still
/// reach the fallback engine; [`AdInput::validate`] is what enforces the
/// required fields on the prediction path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdInput {
    pub title: String,
    pub text: String,
    /// Campaign budget in dollars
    pub budget: f64,
    pub audience: String,
    pub platform: Platform,
    /// Opaque image reference (usually a data URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl AdInput {
    /// Create an ad input without an image
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        budget: f64,
        audience: impl Into<String>,
        platform: impl Into<Platform>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            budget,
            audience: audience.into(),
            platform: platform.into(),
            image: None,
        }
    }

    /// Check that every field needed for a prediction is present
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::MissingField("text"));
        }
        if self.budget == 0.0 {
            return Err(ValidationError::MissingField("budget"));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(ValidationError::InvalidBudget(self.budget));
        }
        if self.budget > MAX_BUDGET {
            return Err(ValidationError::BudgetTooLarge(self.budget));
        }
        if self.audience.trim().is_empty() {
            return Err(ValidationError::MissingField("audience"));
        }
        if self.platform.is_blank() {
            return Err(ValidationError::MissingField("platform"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AdInput {
        AdInput::new(
            "Summer Sale",
            "Get 50% off all items now",
            100.0,
            "young adults",
            "Instagram",
        )
    }

    #[test]
    fn test_platform_names_round_trip() {
        assert_eq!(Platform::from("Google Ads"), Platform::GoogleAds);
        assert_eq!(Platform::from("TikTok"), Platform::Other("TikTok".into()));
        assert_eq!(String::from(Platform::GoogleAds), "Google Ads");
        assert_eq!(Platform::from("LinkedIn").to_string(), "LinkedIn");
    }

    #[test]
    fn test_valid_input() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let mut ad = sample();
        ad.title = "  ".into();
        assert_eq!(ad.validate(), Err(ValidationError::MissingField("title")));

        let mut ad = sample();
        ad.budget = 0.0;
        assert_eq!(ad.validate(), Err(ValidationError::MissingField("budget")));

        let mut ad = sample();
        ad.platform = Platform::default();
        assert_eq!(ad.validate(), Err(ValidationError::MissingField("platform")));
    }

    #[test]
    fn test_negative_budget() {
        let mut ad = sample();
        ad.budget = -5.0;
        assert!(matches!(ad.validate(), Err(ValidationError::InvalidBudget(_))));
    }

    #[test]
    fn test_budget_upper_bound() {
        let mut ad = sample();
        ad.budget = MAX_BUDGET;
        assert!(ad.validate().is_ok());

        ad.budget = 1e18;
        assert_eq!(ad.validate(), Err(ValidationError::BudgetTooLarge(1e18)));
        assert!(ValidationError::BudgetTooLarge(1e18)
            .to_string()
            .starts_with("Budget must be at most"));
    }

    #[test]
    fn test_partial_payload_deserializes() {
        let ad: AdInput = serde_json::from_str(r#"{"title":"Hi","platform":"Facebook"}"#).unwrap();
        assert_eq!(ad.title, "Hi");
        assert_eq!(ad.text, "");
        assert_eq!(ad.budget, 0.0);
        assert_eq!(ad.platform, Platform::Facebook);
    }
}
