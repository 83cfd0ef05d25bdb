#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use questboard::{
    config::SessionSettings,
    db,
    geocode::{FixedGeocoder, Geocoder, LatLng},
    models::{Event, NewEvent, NewQuest, NewReview, NewUser, Quest, Review, User},
    AppState,
};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};

pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_pool = db::memory().await.expect("in-memory database");
        Self::with_state(AppState::sqlite(db_pool, geocoder()))
    }

    pub fn with_state(state: AppState) -> Self {
        let app = questboard::app(state.clone(), &SessionSettings::default());
        let server = TestServer::builder()
            .save_cookies()
            .build(app)
            .expect("test server");

        Self { server, state }
    }

    /// Registers through the API, which also logs the new user in.
    pub async fn register(&self, email: &str, first_name: &str) -> Value {
        let response = self
            .server
            .post("/api/users/register")
            .json(&registration(email, first_name))
            .await;
        response.assert_status_ok();
        response.json()
    }

    pub async fn login(&self, email: &str) {
        self.server
            .post("/api/users/login")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .await
            .assert_status_ok();
    }

    pub async fn user_count(&self) -> usize {
        self.state.users.list().await.expect("list users").len()
    }

    pub async fn seed_user(&self, email: &str) -> User {
        self.state
            .users
            .create(new_user(email))
            .await
            .expect("seed user")
    }

    pub async fn seed_quest(&self, creator: &User, title: &str) -> Quest {
        self.state
            .quests
            .create(NewQuest {
                creator_id: creator.id.clone(),
                title: title.to_owned(),
                description: String::new(),
            })
            .await
            .expect("seed quest")
    }

    /// `days_from_now` may be negative for events in the past.
    pub async fn seed_event(&self, host: &User, quest: &Quest, title: &str, days_from_now: i64) -> Event {
        self.state
            .events
            .create(NewEvent {
                host_id: host.id.clone(),
                quest_id: quest.id.clone(),
                title: title.to_owned(),
                description: String::new(),
                start_time: OffsetDateTime::now_utc() + Duration::days(days_from_now),
            })
            .await
            .expect("seed event")
    }

    pub async fn seed_attendee(&self, event: &Event, user: &User) {
        self.state
            .events
            .add_attendee(&event.id, &user.id)
            .await
            .expect("seed attendee");
    }

    pub async fn seed_review(&self, author: &User, quest: &Quest) -> Review {
        self.state
            .reviews
            .create(NewReview {
                author_id: author.id.clone(),
                quest_id: quest.id.clone(),
                rating: 4,
                body: "good fun".to_owned(),
            })
            .await
            .expect("seed review")
    }
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_owned(),
        hashed_password: "$argon2id$seeded".to_owned(),
        first_name: "Seed".to_owned(),
        last_name: email.to_owned(),
        profile_image_url: "https://img.example/seed.png".to_owned(),
        home_city: "Austin".to_owned(),
        home_state: "TX".to_owned(),
        location: LatLng { lat: 30.27, lng: -97.74 },
    }
}

pub fn geocoder() -> Arc<dyn Geocoder> {
    Arc::new(
        FixedGeocoder::default()
            .with("Austin, TX", 30.267153, -97.7430608)
            .with("Denver, CO", 39.7392358, -104.990251),
    )
}

pub fn registration(email: &str, first_name: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "firstName": first_name,
        "lastName": "Tester",
        "homeCity": "Austin",
        "homeState": "TX"
    })
}

pub fn ids(events: &Value) -> Vec<String> {
    let mut ids: Vec<String> = events
        .as_array()
        .expect("array of events")
        .iter()
        .map(|event| event["_id"].as_str().expect("event id").to_owned())
        .collect();
    ids.sort();
    ids
}
