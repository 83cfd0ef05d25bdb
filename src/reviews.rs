use std::sync::Arc;

use axum::{debug_handler, extract::State, routing::get, Json, Router};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::{
    models::NewReview,
    repo::{QuestRepository, ReviewRepository, UserRepository},
    session,
    validation::Checks,
    views::ReviewView,
    AppError, AppJson, AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index).post(create))
}

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(reviews): State<Arc<dyn ReviewRepository>>,
) -> AppResult<Json<Vec<ReviewView>>> {
    let reviews = reviews.list().await?;
    Ok(Json(reviews.into_iter().map(ReviewView::from).collect()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateReviewRequest {
    quest: String,
    rating: i64,
    body: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(users): State<Arc<dyn UserRepository>>,
    State(quests): State<Arc<dyn QuestRepository>>,
    State(reviews): State<Arc<dyn ReviewRepository>>,
    session: Session,
    AppJson(request): AppJson<CreateReviewRequest>,
) -> AppResult<Json<ReviewView>> {
    let author = session::require_user(&session, users.as_ref()).await?;

    Checks::default()
        .required("quest", &request.quest, "Quest is required")
        .check("rating", (1..=5).contains(&request.rating), || {
            "Rating must be between 1 and 5".to_owned()
        })
        .finish()?;

    if quests.find_by_id(&request.quest).await?.is_none() {
        return Err(AppError::quest_not_found());
    }

    let review = reviews
        .create(NewReview {
            author_id: author.id,
            quest_id: request.quest,
            rating: request.rating,
            body: request.body.trim().to_owned(),
        })
        .await?;
    info!(review_id = %review.id, quest_id = %review.quest_id, "created review");

    Ok(Json(ReviewView::from(review)))
}
