//! SQLite Repository

use crate::records::{
    Kpis, NewPrediction, NewSuggestion, NewUser, Page, PredictionRecord, SuggestionRecord, User,
};
use crate::{from_stored_count, to_stored_count, StorageError, Store};
use ad_model::{AdInput, Platform, Prediction, SuggestionSet};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS ad_predictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        text TEXT NOT NULL,
        budget REAL NOT NULL,
        audience TEXT NOT NULL,
        platform TEXT NOT NULL,
        image TEXT,
        ctr REAL NOT NULL,
        reach INTEGER NOT NULL,
        engagement INTEGER NOT NULL,
        confidence REAL NOT NULL,
        explanation TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_ad_predictions_user
        ON ad_predictions (user_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS suggestions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        prediction_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        improved_text TEXT NOT NULL,
        targeting TEXT NOT NULL,
        budget_adjustment TEXT NOT NULL,
        platform_recommendation TEXT NOT NULL,
        explanation TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_suggestions_prediction ON suggestions (prediction_id)",
];

const PREDICTION_COLUMNS: &str = "id, user_id, title, text, budget, audience, platform, image, \
     ctr, reach, engagement, confidence, explanation, created_at";

/// Current time at the precision the timestamp column keeps
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width timestamps so that text ordering matches time ordering
fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::SerializationError(format!("bad timestamp {}: {}", raw, e)))
}

fn user_from_row(row: &SqliteRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: decode_time(&row.try_get::<String, _>("created_at")?)?,
    })
}

fn prediction_from_row(row: &SqliteRow) -> Result<PredictionRecord, StorageError> {
    let reach: i64 = row.try_get("reach")?;
    let engagement: i64 = row.try_get("engagement")?;
    Ok(PredictionRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        ad: AdInput {
            title: row.try_get("title")?,
            text: row.try_get("text")?,
            budget: row.try_get("budget")?,
            audience: row.try_get("audience")?,
            platform: Platform::from(row.try_get::<String, _>("platform")?),
            image: row.try_get("image")?,
        },
        prediction: Prediction {
            ctr: row.try_get("ctr")?,
            reach: from_stored_count("reach", reach)?,
            engagement: from_stored_count("engagement", engagement)?,
            confidence: row.try_get("confidence")?,
            explanation: row.try_get("explanation")?,
        },
        created_at: decode_time(&row.try_get::<String, _>("created_at")?)?,
    })
}

fn suggestion_from_row(row: &SqliteRow) -> Result<SuggestionRecord, StorageError> {
    let improved_text: String = row.try_get("improved_text")?;
    Ok(SuggestionRecord {
        id: row.try_get("id")?,
        prediction_id: row.try_get("prediction_id")?,
        user_id: row.try_get("user_id")?,
        suggestions: SuggestionSet {
            improved_text: serde_json::from_str(&improved_text)?,
            targeting: row.try_get("targeting")?,
            budget_adjustment: row.try_get("budget_adjustment")?,
            platform_recommendation: row.try_get("platform_recommendation")?,
            explanation: row.try_get("explanation")?,
        },
        created_at: decode_time(&row.try_get::<String, _>("created_at")?)?,
    })
}

/// Store backed by a SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` (e.g. `sqlite://data/adpredict.db` or
    /// `sqlite::memory:`) and create the schema if missing
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        info!("Opening SQLite store at {}", url);
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Each connection to :memory: is its own database, so keep exactly one
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        debug!("SQLite schema ready");
        Ok(())
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StorageError> {
        let created_at = now();
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(encode_time(&created_at))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted user with ID {}", id);
        Ok(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at,
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn create_prediction(
        &self,
        prediction: NewPrediction,
    ) -> Result<PredictionRecord, StorageError> {
        let created_at = now();
        let NewPrediction {
            user_id,
            ad,
            prediction,
        } = prediction;
        let reach = to_stored_count("reach", prediction.reach)?;
        let engagement = to_stored_count("engagement", prediction.engagement)?;

        let result = sqlx::query(
            "INSERT INTO ad_predictions (user_id, title, text, budget, audience, platform, image, \
             ctr, reach, engagement, confidence, explanation, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&ad.title)
        .bind(&ad.text)
        .bind(ad.budget)
        .bind(&ad.audience)
        .bind(ad.platform.as_str())
        .bind(ad.image.as_deref())
        .bind(prediction.ctr)
        .bind(reach)
        .bind(engagement)
        .bind(prediction.confidence)
        .bind(&prediction.explanation)
        .bind(encode_time(&created_at))
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted prediction with ID {}", id);
        Ok(PredictionRecord {
            id,
            user_id,
            ad,
            prediction,
            created_at,
        })
    }

    async fn list_predictions(
        &self,
        user_id: i64,
        limit: usize,
        offset: usize,
    ) -> Result<Page<PredictionRecord>, StorageError> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM ad_predictions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?
            .try_get("n")?;

        let sql = format!(
            "SELECT {} FROM ad_predictions WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            PREDICTION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            total: total.max(0) as usize,
            items: rows
                .iter()
                .map(prediction_from_row)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    async fn get_prediction(&self, id: i64) -> Result<Option<PredictionRecord>, StorageError> {
        let sql = format!("SELECT {} FROM ad_predictions WHERE id = ?", PREDICTION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(prediction_from_row).transpose()
    }

    async fn create_suggestion(
        &self,
        suggestion: NewSuggestion,
    ) -> Result<SuggestionRecord, StorageError> {
        let created_at = now();
        let improved_text = serde_json::to_string(&suggestion.suggestions.improved_text)?;

        let result = sqlx::query(
            "INSERT INTO suggestions (prediction_id, user_id, improved_text, targeting, \
             budget_adjustment, platform_recommendation, explanation, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(suggestion.prediction_id)
        .bind(suggestion.user_id)
        .bind(improved_text)
        .bind(&suggestion.suggestions.targeting)
        .bind(&suggestion.suggestions.budget_adjustment)
        .bind(&suggestion.suggestions.platform_recommendation)
        .bind(&suggestion.suggestions.explanation)
        .bind(encode_time(&created_at))
        .execute(&self.pool)
        .await?;

        Ok(SuggestionRecord {
            id: result.last_insert_rowid(),
            prediction_id: suggestion.prediction_id,
            user_id: suggestion.user_id,
            suggestions: suggestion.suggestions,
            created_at,
        })
    }

    async fn suggestion_for_prediction(
        &self,
        prediction_id: i64,
    ) -> Result<Option<SuggestionRecord>, StorageError> {
        let row = sqlx::query("SELECT * FROM suggestions WHERE prediction_id = ? ORDER BY id LIMIT 1")
            .bind(prediction_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(suggestion_from_row).transpose()
    }

    async fn prediction_kpis(&self, user_id: i64) -> Result<Kpis, StorageError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n, COALESCE(SUM(ctr), 0.0) AS ctr_sum, \
             COALESCE(SUM(engagement), 0) AS engagement_sum \
             FROM ad_predictions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("n")?;
        let ctr_sum: f64 = row.try_get("ctr_sum")?;
        let engagement_sum: i64 = row.try_get("engagement_sum")?;
        Ok(Kpis::from_sums(
            count.max(0) as u64,
            ctr_sum,
            engagement_sum as f64,
        ))
    }

    async fn prediction_count(&self) -> Result<usize, StorageError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM ad_predictions")
            .fetch_one(&self.pool)
            .await?
            .try_get("n")?;
        Ok(count.max(0) as usize)
    }
}
