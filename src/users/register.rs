use std::sync::Arc;

use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::{
    geocode::Geocoder,
    models::{NewUser, DEFAULT_PROFILE_IMAGE_URL},
    password,
    repo::{RepoError, UserRepository},
    session,
    validation::Checks,
    views::SessionUser,
    AppError, AppJson, AppResult, AppState,
};

use super::{locate_home, normalize_email};

const EMAIL_TAKEN: &str = "A user has already registered with this email";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    home_city: String,
    home_state: String,
    profile_image_url: Option<String>,
}

impl RegisterRequest {
    fn validate(&self) -> AppResult<()> {
        let password_len = self.password.chars().count();
        Checks::default()
            .email("email", self.email.trim())
            .check("password", (6..=30).contains(&password_len), || {
                "Password must be between 6 and 30 characters".to_owned()
            })
            .name("firstName", &self.first_name, "First name")
            .name("lastName", &self.last_name, "Last name")
            .required("homeCity", &self.home_city, "Home city is required")
            .required("homeState", &self.home_state, "Home state is required")
            .finish()
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(users): State<Arc<dyn UserRepository>>,
    State(geocoder): State<Arc<dyn Geocoder>>,
    session: Session,
    AppJson(request): AppJson<RegisterRequest>,
) -> AppResult<Json<SessionUser>> {
    request.validate()?;

    let email = normalize_email(&request.email);
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::validation("email", EMAIL_TAKEN));
    }

    let location = locate_home(geocoder.as_ref(), &request.home_city, &request.home_state).await?;
    let hashed_password = password::hash_blocking(request.password).await?;

    let new_user = NewUser {
        email,
        hashed_password,
        first_name: request.first_name.trim().to_owned(),
        last_name: request.last_name.trim().to_owned(),
        profile_image_url: request
            .profile_image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE_URL.to_owned()),
        home_city: request.home_city.trim().to_owned(),
        home_state: request.home_state.trim().to_owned(),
        location,
    };

    let user = match users.create(new_user).await {
        Ok(user) => user,
        Err(RepoError::DuplicateEmail(_)) => return Err(AppError::validation("email", EMAIL_TAKEN)),
        Err(err) => return Err(err.into()),
    };

    session::start(&session, &user.id).await?;
    info!(user_id = %user.id, "registered user");

    Ok(Json(SessionUser::from(&user)))
}
