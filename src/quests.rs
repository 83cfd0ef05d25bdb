use std::sync::Arc;

use axum::{debug_handler, extract::{Path, State}, routing::get, Json, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::{
    models::NewQuest,
    repo::{QuestRepository, ReviewRepository, UserRepository},
    session,
    validation::Checks,
    views::{QuestView, ReviewView},
    AppError, AppJson, AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{quest_id}/reviews", get(quest_reviews))
}

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(quests): State<Arc<dyn QuestRepository>>,
) -> AppResult<Json<Vec<QuestView>>> {
    let quests = quests.list().await?;
    Ok(Json(quests.into_iter().map(QuestView::from).collect()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateQuestRequest {
    title: String,
    description: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(users): State<Arc<dyn UserRepository>>,
    State(quests): State<Arc<dyn QuestRepository>>,
    session: Session,
    AppJson(request): AppJson<CreateQuestRequest>,
) -> AppResult<Json<QuestView>> {
    let creator = session::require_user(&session, users.as_ref()).await?;

    Checks::default()
        .length("title", &request.title, 1..=100, "Title must be between 1 and 100 characters")
        .finish()?;

    let quest = quests
        .create(NewQuest {
            creator_id: creator.id,
            title: request.title.trim().to_owned(),
            description: request.description.trim().to_owned(),
        })
        .await?;
    info!(quest_id = %quest.id, creator_id = %quest.creator_id, "created quest");

    Ok(Json(QuestView::from(quest)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn quest_reviews(
    State(quests): State<Arc<dyn QuestRepository>>,
    State(reviews): State<Arc<dyn ReviewRepository>>,
    Path(quest_id): Path<String>,
) -> AppResult<Json<Vec<ReviewView>>> {
    if quests.find_by_id(&quest_id).await?.is_none() {
        return Err(AppError::quest_not_found());
    }

    let reviews = reviews.list_for_quest(&quest_id).await?;
    Ok(Json(reviews.into_iter().map(ReviewView::from).collect()))
}
