use std::sync::Arc;

use axum::{debug_handler, extract::State, Json};
use tower_sessions::Session;

use crate::{repo::UserRepository, session, views::PublicUser, AppResult, AppState};

/// `null` for anonymous sessions and for sessions whose user is gone.
#[debug_handler(state = AppState)]
pub(crate) async fn current(
    State(users): State<Arc<dyn UserRepository>>,
    session: Session,
) -> AppResult<Json<Option<PublicUser>>> {
    let Some(user_id) = session::user_id(&session).await? else {
        return Ok(Json(None));
    };

    let user = users.find_by_id(&user_id).await?;
    Ok(Json(user.as_ref().map(PublicUser::from)))
}
