use std::sync::Arc;

use axum::{debug_handler, extract::{Path, State}, Json};
use tower_sessions::Session;
use tracing::info;

use crate::{repo::UserRepository, session, views::PublicUser, AppError, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn destroy(
    State(users): State<Arc<dyn UserRepository>>,
    session: Session,
    Path(user_id): Path<String>,
) -> AppResult<Json<PublicUser>> {
    let Some((user, removed)) = users.delete_cascading(&user_id).await? else {
        return Err(AppError::user_not_found());
    };

    info!(
        user_id = %user.id,
        events = removed.events,
        reviews = removed.reviews,
        quests = removed.quests,
        attendances = removed.attendances,
        "deleted user"
    );

    if session::user_id(&session).await?.as_deref() == Some(user.id.as_str()) {
        session::end(&session).await?;
    }

    Ok(Json(PublicUser::from(&user)))
}
