//! JSON shapes sent to clients. None of them carries the password hash.

use serde::Serialize;
use time::OffsetDateTime;

use crate::models::{Quest, Review, User};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}

/// What login, register and profile updates hand back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(flatten)]
    pub user: PublicUser,
    pub home_city: String,
    pub home_state: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            user: PublicUser::from(user),
            home_city: user.home_city.clone(),
            home_state: user.home_state.clone(),
            lat: user.lat,
            lng: user.lng,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub quest: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    pub host: PublicUser,
    pub attendees: Vec<PublicUser>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestView {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub creator: String,
}

impl From<Quest> for QuestView {
    fn from(quest: Quest) -> Self {
        Self {
            id: quest.id,
            title: quest.title,
            description: quest.description,
            creator: quest.creator_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(rename = "_id")]
    pub id: String,
    pub quest: String,
    pub author: String,
    pub rating: i64,
    pub body: String,
}

impl From<Review> for ReviewView {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            quest: review.quest_id,
            author: review.author_id,
            rating: review.rating,
            body: review.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn ada() -> User {
        User {
            id: "u1".to_owned(),
            email: "ada@example.com".to_owned(),
            hashed_password: "$argon2id$secret".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            profile_image_url: "https://img.example/ada.png".to_owned(),
            home_city: "London".to_owned(),
            home_state: "UK".to_owned(),
            lat: 51.5,
            lng: -0.12,
            created_at: datetime!(2025-01-01 0:00 UTC),
            updated_at: datetime!(2025-01-01 0:00 UTC),
        }
    }

    #[test]
    fn public_view_uses_client_field_names_and_drops_the_hash() {
        let json = serde_json::to_value(PublicUser::from(&ada())).unwrap();
        assert_eq!(json["_id"], "u1");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["profileImageUrl"], "https://img.example/ada.png");
        assert!(json.get("hashedPassword").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn session_view_flattens_the_public_fields() {
        let json = serde_json::to_value(SessionUser::from(&ada())).unwrap();
        assert_eq!(json["_id"], "u1");
        assert_eq!(json["homeCity"], "London");
        assert_eq!(json["lat"], 51.5);
        assert!(!json.to_string().contains("argon2"));
    }
}
