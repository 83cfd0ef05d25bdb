use std::sync::Arc;

use axum::{debug_handler, extract::{Path, State}, Json};
use serde::Deserialize;
use tracing::info;

use crate::{
    geocode::Geocoder,
    models::ProfileUpdate,
    repo::UserRepository,
    validation::Checks,
    views::SessionUser,
    AppError, AppJson, AppResult, AppState,
};

use super::locate_home;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct UpdateRequest {
    first_name: String,
    last_name: String,
    home_city: String,
    home_state: String,
    profile_image_url: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn update(
    State(users): State<Arc<dyn UserRepository>>,
    State(geocoder): State<Arc<dyn Geocoder>>,
    Path(user_id): Path<String>,
    AppJson(request): AppJson<UpdateRequest>,
) -> AppResult<Json<SessionUser>> {
    Checks::default()
        .name("firstName", &request.first_name, "First name")
        .name("lastName", &request.last_name, "Last name")
        .required("homeCity", &request.home_city, "Home city is required")
        .required("homeState", &request.home_state, "Home state is required")
        .finish()?;

    if users.find_by_id(&user_id).await?.is_none() {
        return Err(AppError::user_not_found());
    }

    let location = locate_home(geocoder.as_ref(), &request.home_city, &request.home_state).await?;

    let update = ProfileUpdate {
        first_name: request.first_name.trim().to_owned(),
        last_name: request.last_name.trim().to_owned(),
        home_city: request.home_city.trim().to_owned(),
        home_state: request.home_state.trim().to_owned(),
        location,
        profile_image_url: request.profile_image_url.filter(|url| !url.trim().is_empty()),
    };

    let user = users
        .update_profile(&user_id, update)
        .await?
        .ok_or_else(AppError::user_not_found)?;
    info!(user_id = %user.id, "updated profile");

    Ok(Json(SessionUser::from(&user)))
}
