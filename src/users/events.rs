use std::{collections::HashMap, sync::Arc};

use axum::{debug_handler, extract::{Path, Query, State}, Json};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    events::populate,
    models::Event,
    repo::{EventRepository, UserRepository},
    views::EventView,
    AppError, AppResult, AppState,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Role {
    Host,
    Attendee,
    #[default]
    Any,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum When {
    Past,
    Upcoming,
    #[default]
    Any,
}

impl When {
    fn admits(self, start_time: OffsetDateTime, now: OffsetDateTime) -> bool {
        match self {
            When::Past => start_time < now,
            When::Upcoming => start_time >= now,
            When::Any => true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct EventsQuery {
    role: Role,
    when: When,
}

#[debug_handler(state = AppState)]
pub(crate) async fn user_events(
    State(users): State<Arc<dyn UserRepository>>,
    State(events): State<Arc<dyn EventRepository>>,
    Path(user_id): Path<String>,
    Query(EventsQuery { role, when }): Query<EventsQuery>,
) -> AppResult<Json<Vec<EventView>>> {
    if users.find_by_id(&user_id).await?.is_none() {
        return Err(AppError::user_not_found());
    }

    let hosted = match role {
        Role::Attendee => Vec::new(),
        _ => events.list_hosted_by(&user_id).await?,
    };
    let attended = match role {
        Role::Host => Vec::new(),
        _ => events.list_attended_by(&user_id).await?,
    };

    let now = OffsetDateTime::now_utc();
    let selected = union_by_id(hosted, attended)
        .into_iter()
        .filter(|event| when.admits(event.start_time, now))
        .collect();

    Ok(Json(populate(users.as_ref(), events.as_ref(), selected).await?))
}

/// Each event once, however many roles the user holds in it, by start time.
fn union_by_id(hosted: Vec<Event>, attended: Vec<Event>) -> Vec<Event> {
    let mut by_id = HashMap::new();
    for event in hosted.into_iter().chain(attended) {
        by_id.entry(event.id.clone()).or_insert(event);
    }

    let mut events: Vec<Event> = by_id.into_values().collect();
    events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
    events
}
