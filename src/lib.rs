pub mod appresult;
pub mod config;
pub mod db;
pub mod events;
pub mod geocode;
pub mod models;
pub mod password;
pub mod quests;
pub mod repo;
pub mod reviews;
pub mod session;
pub mod users;
pub mod validation;
pub mod views;

use std::sync::Arc;

use axum::{extract::FromRef, Router};
use serde_json::Value;
use sqlx::SqlitePool;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppJson, AppResult};

use config::SessionSettings;
use geocode::Geocoder;
use repo::{
    EventRepository, QuestRepository, ReviewRepository, SqliteEvents, SqliteQuests, SqliteReviews,
    SqliteUsers, UserRepository,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub quests: Arc<dyn QuestRepository>,
    pub events: Arc<dyn EventRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    /// Wires every repository to the same SQLite pool.
    pub fn sqlite(db_pool: SqlitePool, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            users: Arc::new(SqliteUsers::new(db_pool.clone())),
            quests: Arc::new(SqliteQuests::new(db_pool.clone())),
            events: Arc::new(SqliteEvents::new(db_pool.clone())),
            reviews: Arc::new(SqliteReviews::new(db_pool)),
            geocoder,
        }
    }
}

/// The API routes without the session layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/users", users::router())
        .nest("/api/quests", quests::router())
        .nest("/api/events", events::router())
        .nest("/api/reviews", reviews::router())
        .with_state(state)
}

/// The full application: routes, cookie sessions and request tracing.
pub fn app(state: AppState, sessions: &SessionSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(sessions.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            sessions.inactivity_minutes,
        )));

    router(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Error)]
#[error("expected {field} in {json}")]
pub struct MissingField {
    field: String,
    json: String,
}

impl MissingField {
    fn new(field: &str, json: &Value) -> Self {
        Self {
            field: field.to_owned(),
            json: json.to_string(),
        }
    }
}

/// Typed lookups on loosely shaped JSON from third-party services.
pub trait GetField {
    fn get_str_field(&self, field: &str) -> Result<String, MissingField>;
    fn get_f64_field(&self, field: &str) -> Result<f64, MissingField>;
    fn get_obj_field(&self, field: &str) -> Result<&Value, MissingField>;
}

impl GetField for serde_json::Value {
    fn get_str_field(&self, field: &str) -> Result<String, MissingField> {
        Ok(
            self.get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| MissingField::new(field, self))?
            .to_owned()
        )
    }

    fn get_f64_field(&self, field: &str) -> Result<f64, MissingField> {
        self.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| MissingField::new(field, self))
    }

    fn get_obj_field(&self, field: &str) -> Result<&Value, MissingField> {
        self.get(field)
        .ok_or_else(|| MissingField::new(field, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_field_reads_typed_values() {
        let body = json!({ "status": "OK", "lat": 40.5, "geometry": { "k": 1 } });
        assert_eq!(body.get_str_field("status").unwrap(), "OK");
        assert_eq!(body.get_f64_field("lat").unwrap(), 40.5);
        assert_eq!(body.get_obj_field("geometry").unwrap()["k"], 1);
    }

    #[test]
    fn get_field_reports_missing_or_mistyped_fields() {
        let body = json!({ "status": 3 });
        let err = body.get_str_field("status").unwrap_err();
        assert!(err.to_string().starts_with("expected status in"));
        assert!(body.get_f64_field("lng").is_err());
    }
}
