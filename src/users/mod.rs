mod current;
mod destroy;
mod events;
mod login;
mod register;
mod show;
mod update;

use axum::{routing::{delete, get, post}, Router};
use tracing::warn;

use crate::{geocode::{Geocoder, LatLng}, AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show::index))
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .route("/session", delete(login::logout))
        .route("/current", get(current::current))
        .route("/{user_id}", get(show::show).patch(update::update).delete(destroy::destroy))
        .route("/{user_id}/events", get(events::user_events))
}

/// Geocodes a home town, turning "no match" into a field error.
async fn locate_home(geocoder: &dyn Geocoder, city: &str, state: &str) -> AppResult<LatLng> {
    let address = format!("{}, {}", city.trim(), state.trim());
    match geocoder.locate(&address).await.map_err(AppError::geocoding)? {
        Some(location) => Ok(location),
        None => {
            warn!(%address, "no geocoding result");
            Err(AppError::validation("homeCity", "Invalid city/state combination"))
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
