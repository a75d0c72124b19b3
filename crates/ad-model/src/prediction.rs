//! Prediction and Suggestion Types

use serde::{Deserialize, Serialize};

/// Predicted performance of an ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Click-through rate in percent (2 decimal places)
    pub ctr: f64,
    /// Estimated unique viewers
    pub reach: u64,
    /// Estimated interactions
    pub engagement: u64,
    /// Confidence score (0.0 to 1.0)
    pub confidence: f64,
    /// Human-readable summary
    #[serde(default)]
    pub explanation: String,
}

impl Prediction {
    /// Whether the values are usable (finite, non-negative CTR, a
    /// confidence inside [0, 1], and counts no larger than `i64::MAX`)
    pub fn is_well_formed(&self) -> bool {
        i64::try_from(self.reach).is_ok()
            && i64::try_from(self.engagement).is_ok()
            && self.ctr.is_finite()
            && self.ctr >= 0.0
            && self.confidence.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
    }
}

/// Optimization suggestions for an ad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    /// Two rewritten variants of the ad copy
    pub improved_text: Vec<String>,
    pub targeting: String,
    pub budget_adjustment: String,
    pub platform_recommendation: String,
    #[serde(default)]
    pub explanation: String,
}

impl SuggestionSet {
    pub fn is_well_formed(&self) -> bool {
        self.improved_text.len() == 2
    }
}

/// A result tagged with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    #[serde(flatten)]
    pub value: T,
    /// True when the external oracle produced the value
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
}

impl<T> Sourced<T> {
    pub fn oracle(value: T) -> Self {
        Self { value, is_ai_generated: true }
    }

    pub fn fallback(value: T) -> Self {
        Self { value, is_ai_generated: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_prediction() {
        let p = Prediction {
            ctr: 2.5,
            reach: 15000,
            engagement: 375,
            confidence: 0.85,
            explanation: String::new(),
        };
        assert!(p.is_well_formed());
        assert!(!Prediction { confidence: 1.5, ..p.clone() }.is_well_formed());
        assert!(!Prediction { ctr: f64::NAN, ..p.clone() }.is_well_formed());
        assert!(!Prediction { reach: u64::MAX, ..p }.is_well_formed());
    }

    #[test]
    fn test_sourced_flattens() {
        let sourced = Sourced::fallback(Prediction {
            ctr: 1.0,
            reach: 10,
            engagement: 0,
            confidence: 0.6,
            explanation: "x".into(),
        });
        let json = serde_json::to_value(&sourced).unwrap();
        assert_eq!(json["ctr"], 1.0);
        assert_eq!(json["isAIGenerated"], false);
    }
}
