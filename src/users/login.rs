use std::sync::Arc;

use axum::{debug_handler, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    password,
    repo::UserRepository,
    session,
    validation::Checks,
    views::SessionUser,
    AppError, AppJson, AppResult, AppState,
};

use super::normalize_email;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(users): State<Arc<dyn UserRepository>>,
    session: Session,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<SessionUser>> {
    Checks::default()
        .email("email", request.email.trim())
        .required("password", &request.password, "Password is required")
        .finish()?;

    let email = normalize_email(&request.email);
    let Some(user) = users.find_by_email(&email).await? else {
        warn!(%email, "login for unknown email");
        return Err(AppError::Authentication);
    };

    if !password::verify_blocking(request.password, user.hashed_password.clone()).await? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Authentication);
    }

    session::start(&session, &user.id).await?;
    info!(user_id = %user.id, "logged in");

    Ok(Json(SessionUser::from(&user)))
}

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<Json<Value>> {
    session::end(&session).await?;
    Ok(Json(json!({ "message": "success" })))
}
