//! Ad Prediction Routes

use ad_model::{AdInput, Prediction, Sourced, SuggestionSet};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{Kpis, NewPrediction, NewSuggestion, PredictionRecord, SuggestionRecord};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 10;
const MAX_HISTORY_LIMIT: usize = 100;

/// Prediction as returned to the client, echoing the ad it was made for
#[derive(Debug, Serialize)]
pub struct PredictionPayload {
    #[serde(flatten)]
    pub prediction: Sourced<Prediction>,
    #[serde(rename = "adData")]
    pub ad_data: AdInput,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: PredictionPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestionsRequest {
    pub ad_data: Option<AdInput>,
    pub prediction: Option<Prediction>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub success: bool,
    pub suggestions: Sourced<SuggestionSet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveRequest {
    pub ad_data: Option<AdInput>,
    pub prediction: Option<Prediction>,
    pub suggestions: Option<SuggestionSet>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub prediction: PredictionRecord,
}

/// Pagination parameters; unparsable or zero values use the defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl HistoryQuery {
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT)
    }

    fn offset(&self) -> usize {
        self.offset
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub total: usize,
    pub predictions: Vec<PredictionRecord>,
    pub kpis: Kpis,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub success: bool,
    pub prediction: PredictionRecord,
    pub suggestions: Option<SuggestionRecord>,
}

fn missing_ad_or_prediction() -> ApiError {
    ApiError::BadRequest("Please provide ad data and prediction".to_string())
}

/// POST /api/ad/predict
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<AdInput>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(ad) = body?;
    ad.validate()?;

    let prediction = state.predictions.predict(&ad).await;
    debug!(
        "Prediction for user {}: ctr={} ai={}",
        user.id, prediction.value.ctr, prediction.is_ai_generated
    );

    Ok(Json(PredictResponse {
        success: true,
        prediction: PredictionPayload {
            prediction,
            ad_data: ad,
        },
    }))
}

/// POST /api/ad/suggestions
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SuggestionsRequest>, JsonRejection>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let Json(request) = body?;
    let (ad, prediction) = request
        .ad_data
        .zip(request.prediction)
        .ok_or_else(missing_ad_or_prediction)?;

    let suggestions = state.predictions.suggest(&ad, &prediction).await;
    Ok(Json(SuggestionsResponse {
        success: true,
        suggestions,
    }))
}

/// POST /api/ad/save
pub async fn save(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(request) = body?;
    let (ad, prediction) = request
        .ad_data
        .zip(request.prediction)
        .ok_or_else(missing_ad_or_prediction)?;
    if i64::try_from(prediction.reach).is_err() || i64::try_from(prediction.engagement).is_err()
    {
        return Err(ApiError::BadRequest(
            "Prediction reach and engagement are out of range".to_string(),
        ));
    }

    let record = state
        .store
        .create_prediction(NewPrediction {
            user_id: user.id,
            ad,
            prediction,
        })
        .await?;

    if let Some(suggestions) = request.suggestions {
        state
            .store
            .create_suggestion(NewSuggestion {
                prediction_id: record.id,
                user_id: user.id,
                suggestions,
            })
            .await?;
    }

    info!("User {} saved prediction {}", user.id, record.id);
    Ok(Json(SaveResponse {
        success: true,
        message: "Prediction saved successfully".to_string(),
        prediction: record,
    }))
}

/// GET /api/ad/history
pub async fn history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let page = state
        .store
        .list_predictions(user.id, query.limit(), query.offset())
        .await?;
    let kpis = state.store.prediction_kpis(user.id).await?;

    Ok(Json(HistoryResponse {
        success: true,
        total: page.total,
        predictions: page.items,
        kpis,
    }))
}

/// GET /api/ad/:id
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, ApiError> {
    let not_found = || ApiError::NotFound("Prediction not found".to_string());

    let id: i64 = id.parse().map_err(|_| not_found())?;
    let prediction = state.store.get_prediction(id).await?.ok_or_else(not_found)?;

    if prediction.user_id != user.id {
        return Err(ApiError::Forbidden("Not authorized".to_string()));
    }

    let suggestions = state.store.suggestion_for_prediction(prediction.id).await?;
    Ok(Json(DetailResponse {
        success: true,
        prediction,
        suggestions,
    }))
}
