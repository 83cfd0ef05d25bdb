use sqlx::FromRow;
use time::OffsetDateTime;

use crate::geocode::LatLng;

pub const DEFAULT_PROFILE_IMAGE_URL: &str =
    "https://magellan-seeds.s3.amazonaws.com/blank-profile-picture-973460.svg";

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub hashed_password: String,

    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: String,

    pub home_city: String,
    pub home_state: String,
    pub lat: f64,
    pub lng: f64,

    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,

    // unique: id
    // unique: email
}

impl User {
    pub fn location(&self) -> LatLng {
        LatLng { lat: self.lat, lng: self.lng }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: String,
    pub home_city: String,
    pub home_state: String,
    pub location: LatLng,
}

/// Every mutable profile field. A `None` image keeps the current one.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub home_city: String,
    pub home_state: String,
    pub location: LatLng,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Quest {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewQuest {
    pub creator_id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: String,
    pub host_id: String,
    pub quest_id: String,
    pub title: String,
    pub description: String,
    pub start_time: OffsetDateTime,
    pub created_at: OffsetDateTime,

    // attendees: event_attendees(event_id, user_id)
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub host_id: String,
    pub quest_id: String,
    pub title: String,
    pub description: String,
    pub start_time: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: String,
    pub author_id: String,
    pub quest_id: String,
    pub rating: i64,
    pub body: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub author_id: String,
    pub quest_id: String,
    pub rating: i64,
    pub body: String,
}

/// What a cascading user delete removed besides the user row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub events: u64,
    pub reviews: u64,
    pub quests: u64,
    /// Attendee rows, both of deleted events and of events that survive.
    pub attendances: u64,
}
