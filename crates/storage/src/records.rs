//! Stored Records

use ad_model::{AdInput, Prediction, SuggestionSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Saved prediction with the ad it was made for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub ad: AdInput,
    #[serde(flatten)]
    pub prediction: Prediction,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub user_id: i64,
    pub ad: AdInput,
    pub prediction: Prediction,
}

/// Saved suggestions attached to a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    pub id: i64,
    pub prediction_id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub suggestions: SuggestionSet,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub prediction_id: i64,
    pub user_id: i64,
    pub suggestions: SuggestionSet,
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Count of all matching records, not just this page
    pub total: usize,
    pub items: Vec<T>,
}

/// Dashboard aggregates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Kpis {
    #[serde(rename = "totalAds")]
    pub total_ads: u64,
    /// Mean CTR, two decimal places
    #[serde(rename = "avgCTR")]
    pub avg_ctr: f64,
    /// Mean engagement, rounded down
    #[serde(rename = "avgEngagement")]
    pub avg_engagement: u64,
}

impl Kpis {
    /// Build from a count and column sums; all zero when `total_ads` is 0
    pub fn from_sums(total_ads: u64, ctr_sum: f64, engagement_sum: f64) -> Self {
        if total_ads == 0 {
            return Self::default();
        }
        let n = total_ads as f64;
        Self {
            total_ads,
            avg_ctr: (ctr_sum / n * 100.0).round() / 100.0,
            avg_engagement: (engagement_sum / n).floor() as u64,
        }
    }
}
