use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use axum::{debug_handler, extract::{Path, State}, routing::{get, post}, Json, Router};
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_sessions::Session;
use tracing::info;

use crate::{
    models::{Event, NewEvent},
    repo::{EventRepository, QuestRepository, UserRepository},
    session,
    validation::Checks,
    views::{EventView, PublicUser},
    AppError, AppJson, AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{event_id}/attendees", post(attend))
}

/// Attaches host and attendee views to each event, keeping input order.
pub async fn populate(
    users: &dyn UserRepository,
    events: &dyn EventRepository,
    selected: Vec<Event>,
) -> AppResult<Vec<EventView>> {
    let event_ids: Vec<String> = selected.iter().map(|event| event.id.clone()).collect();
    let mut host_ids: Vec<String> = selected.iter().map(|event| event.host_id.clone()).collect();
    host_ids.sort();
    host_ids.dedup();

    let hosts: HashMap<String, PublicUser> = users
        .find_many(&host_ids)
        .await?
        .iter()
        .map(|user| (user.id.clone(), PublicUser::from(user)))
        .collect();

    let mut attendees: HashMap<String, Vec<PublicUser>> = HashMap::new();
    for (event_id, user) in events.attendees(&event_ids).await? {
        attendees.entry(event_id).or_default().push(PublicUser::from(&user));
    }

    selected
        .into_iter()
        .map(|event| -> AppResult<EventView> {
            let host = hosts
                .get(&event.host_id)
                .cloned()
                .ok_or_else(|| anyhow!("event {} has no host {}", event.id, event.host_id))?;

            Ok(EventView {
                attendees: attendees.remove(&event.id).unwrap_or_default(),
                host,
                id: event.id,
                title: event.title,
                description: event.description,
                quest: event.quest_id,
                start_time: event.start_time,
            })
        })
        .collect()
}

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(users): State<Arc<dyn UserRepository>>,
    State(events): State<Arc<dyn EventRepository>>,
) -> AppResult<Json<Vec<EventView>>> {
    let all = events.list().await?;
    Ok(Json(populate(users.as_ref(), events.as_ref(), all).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CreateEventRequest {
    quest: String,
    title: String,
    description: String,
    start_time: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(users): State<Arc<dyn UserRepository>>,
    State(quests): State<Arc<dyn QuestRepository>>,
    State(events): State<Arc<dyn EventRepository>>,
    session: Session,
    AppJson(request): AppJson<CreateEventRequest>,
) -> AppResult<Json<EventView>> {
    let host = session::require_user(&session, users.as_ref()).await?;

    let start_time = OffsetDateTime::parse(request.start_time.trim(), &Rfc3339);
    Checks::default()
        .required("quest", &request.quest, "Quest is required")
        .length("title", &request.title, 1..=100, "Title must be between 1 and 100 characters")
        .check("startTime", start_time.is_ok(), || {
            "Start time must be an RFC 3339 timestamp".to_owned()
        })
        .finish()?;
    let start_time = start_time.map_err(|err| AppError::validation("startTime", err.to_string()))?;

    if quests.find_by_id(&request.quest).await?.is_none() {
        return Err(AppError::quest_not_found());
    }

    let event = events
        .create(NewEvent {
            host_id: host.id,
            quest_id: request.quest,
            title: request.title.trim().to_owned(),
            description: request.description.trim().to_owned(),
            start_time,
        })
        .await?;
    info!(event_id = %event.id, host_id = %event.host_id, "created event");

    let mut views = populate(users.as_ref(), events.as_ref(), vec![event]).await?;
    views.pop().map(Json).ok_or_else(|| anyhow!("created event vanished").into())
}

#[debug_handler(state = AppState)]
pub(crate) async fn attend(
    State(users): State<Arc<dyn UserRepository>>,
    State(events): State<Arc<dyn EventRepository>>,
    session: Session,
    Path(event_id): Path<String>,
) -> AppResult<Json<EventView>> {
    let user_id = session::require_user(&session, users.as_ref()).await?.id;

    let Some(event) = events.find_by_id(&event_id).await? else {
        return Err(AppError::event_not_found());
    };

    events.add_attendee(&event.id, &user_id).await?;
    info!(%event_id, %user_id, "joined event");

    let mut views = populate(users.as_ref(), events.as_ref(), vec![event]).await?;
    views.pop().map(Json).ok_or_else(|| anyhow!("joined event vanished").into())
}
