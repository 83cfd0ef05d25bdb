use std::{collections::BTreeMap, sync::Arc};

use axum::{debug_handler, extract::{Path, State}, Json};
use serde::Serialize;

use crate::{repo::UserRepository, views::PublicUser, AppError, AppResult, AppState};

#[derive(Serialize)]
pub(crate) struct UserIndex {
    users: BTreeMap<String, PublicUser>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn show(
    State(users): State<Arc<dyn UserRepository>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<PublicUser>> {
    let user = users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(AppError::user_not_found)?;

    Ok(Json(PublicUser::from(&user)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(users): State<Arc<dyn UserRepository>>,
) -> AppResult<Json<UserIndex>> {
    let users = users
        .list()
        .await?
        .iter()
        .map(|user| (user.id.clone(), PublicUser::from(user)))
        .collect();

    Ok(Json(UserIndex { users }))
}
