//! Storage Layer
//!
//! Persists users, saved predictions, and their suggestions behind the
//! [`Store`] trait, with an in-memory and a SQLite implementation.

mod records;
mod repository;
mod sqlite;

pub use records::{
    Kpis, NewPrediction, NewSuggestion, NewUser, Page, PredictionRecord, SuggestionRecord, User,
};
pub use repository::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Record not found")]
    NotFound,
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::Conflict(db.message().to_string())
            }
            _ => StorageError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

/// Convert a count to the signed form SQLite stores. Both backends reject
/// counts above `i64::MAX` so that they accept the same records.
pub(crate) fn to_stored_count(field: &str, value: u64) -> Result<i64, StorageError> {
    i64::try_from(value).map_err(|_| {
        StorageError::SerializationError(format!("{} {} exceeds storable range", field, value))
    })
}

pub(crate) fn from_stored_count(field: &str, value: i64) -> Result<u64, StorageError> {
    u64::try_from(value).map_err(|_| {
        StorageError::SerializationError(format!("{} {} is negative", field, value))
    })
}

/// Data access used by the API.
///
/// Ids are assigned sequentially per table starting at 1. Prediction
/// listings are newest first.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create a user; fails with `Conflict` if the email (case-insensitive)
    /// is taken
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;

    async fn create_prediction(
        &self,
        prediction: NewPrediction,
    ) -> Result<PredictionRecord, StorageError>;

    /// One page of a user's predictions plus the user's total count
    async fn list_predictions(
        &self,
        user_id: i64,
        limit: usize,
        offset: usize,
    ) -> Result<Page<PredictionRecord>, StorageError>;

    async fn get_prediction(&self, id: i64) -> Result<Option<PredictionRecord>, StorageError>;

    async fn create_suggestion(
        &self,
        suggestion: NewSuggestion,
    ) -> Result<SuggestionRecord, StorageError>;

    async fn suggestion_for_prediction(
        &self,
        prediction_id: i64,
    ) -> Result<Option<SuggestionRecord>, StorageError>;

    /// Dashboard aggregates over all of a user's predictions
    async fn prediction_kpis(&self, user_id: i64) -> Result<Kpis, StorageError>;

    /// Total predictions across all users
    async fn prediction_count(&self) -> Result<usize, StorageError>;
}
