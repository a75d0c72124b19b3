//! In-Memory Repository

use crate::records::{
    Kpis, NewPrediction, NewSuggestion, NewUser, Page, PredictionRecord, SuggestionRecord, User,
};
use crate::{to_stored_count, StorageError, Store};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    predictions: Vec<PredictionRecord>,
    suggestions: Vec<SuggestionRecord>,
    next_user_id: i64,
    next_prediction_id: i64,
    next_suggestion_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Store backed by process memory; contents are lost on restart
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        info!("Creating in-memory store");
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))
    }

    /// Clear all data (for testing)
    pub fn clear(&self) {
        if let Ok(mut tables) = self.tables.lock() {
            *tables = Tables::default();
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let mut tables = self.lock()?;

        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StorageError::Conflict(format!(
                "email already registered: {}",
                user.email
            )));
        }

        let record = User {
            id: Tables::next_id(&mut tables.next_user_id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(record.clone());
        debug!("Inserted user with ID {}", record.id);
        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_prediction(
        &self,
        prediction: NewPrediction,
    ) -> Result<PredictionRecord, StorageError> {
        to_stored_count("reach", prediction.prediction.reach)?;
        to_stored_count("engagement", prediction.prediction.engagement)?;

        let mut tables = self.lock()?;
        let record = PredictionRecord {
            id: Tables::next_id(&mut tables.next_prediction_id),
            user_id: prediction.user_id,
            ad: prediction.ad,
            prediction: prediction.prediction,
            created_at: Utc::now(),
        };
        tables.predictions.push(record.clone());
        debug!("Inserted prediction with ID {}", record.id);
        Ok(record)
    }

    async fn list_predictions(
        &self,
        user_id: i64,
        limit: usize,
        offset: usize,
    ) -> Result<Page<PredictionRecord>, StorageError> {
        let tables = self.lock()?;

        let mut owned: Vec<&PredictionRecord> = tables
            .predictions
            .iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(Page {
            total: owned.len(),
            items: owned.into_iter().skip(offset).take(limit).cloned().collect(),
        })
    }

    async fn get_prediction(&self, id: i64) -> Result<Option<PredictionRecord>, StorageError> {
        let tables = self.lock()?;
        Ok(tables.predictions.iter().find(|p| p.id == id).cloned())
    }

    async fn create_suggestion(
        &self,
        suggestion: NewSuggestion,
    ) -> Result<SuggestionRecord, StorageError> {
        let mut tables = self.lock()?;
        let record = SuggestionRecord {
            id: Tables::next_id(&mut tables.next_suggestion_id),
            prediction_id: suggestion.prediction_id,
            user_id: suggestion.user_id,
            suggestions: suggestion.suggestions,
            created_at: Utc::now(),
        };
        tables.suggestions.push(record.clone());
        debug!(
            "Inserted suggestion {} for prediction {}",
            record.id, record.prediction_id
        );
        Ok(record)
    }

    async fn suggestion_for_prediction(
        &self,
        prediction_id: i64,
    ) -> Result<Option<SuggestionRecord>, StorageError> {
        let tables = self.lock()?;
        Ok(tables
            .suggestions
            .iter()
            .find(|s| s.prediction_id == prediction_id)
            .cloned())
    }

    async fn prediction_kpis(&self, user_id: i64) -> Result<Kpis, StorageError> {
        let tables = self.lock()?;
        let (count, ctr_sum, engagement_sum) = tables
            .predictions
            .iter()
            .filter(|p| p.user_id == user_id)
            .fold((0u64, 0.0, 0.0), |(n, ctr, eng), p| {
                (n + 1, ctr + p.prediction.ctr, eng + p.prediction.engagement as f64)
            });
        Ok(Kpis::from_sums(count, ctr_sum, engagement_sum))
    }

    async fn prediction_count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.predictions.len())
    }
}
