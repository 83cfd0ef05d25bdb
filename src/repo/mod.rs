mod cascade;
mod events;
mod quests;
mod reviews;
mod users;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    DeletionReport, Event, NewEvent, NewQuest, NewReview, NewUser, ProfileUpdate, Quest, Review,
    User,
};

pub use events::SqliteEvents;
pub use quests::SqliteQuests;
pub use reviews::SqliteReviews;
pub use users::SqliteUsers;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    async fn find_many(&self, ids: &[String]) -> Result<Vec<User>, RepoError>;
    async fn list(&self) -> Result<Vec<User>, RepoError>;
    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<Option<User>, RepoError>;
    /// Removes the user with everything they own, directly or through their
    /// quests, in one transaction. `None` when the user does not exist.
    async fn delete_cascading(&self, id: &str) -> Result<Option<(User, DeletionReport)>, RepoError>;
}

#[async_trait]
pub trait QuestRepository: Send + Sync {
    async fn create(&self, quest: NewQuest) -> Result<Quest, RepoError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Quest>, RepoError>;
    async fn list(&self) -> Result<Vec<Quest>, RepoError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: NewEvent) -> Result<Event, RepoError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, RepoError>;
    /// Idempotent: joining twice keeps one attendee row.
    async fn add_attendee(&self, event_id: &str, user_id: &str) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<Event>, RepoError>;
    async fn list_hosted_by(&self, user_id: &str) -> Result<Vec<Event>, RepoError>;
    async fn list_attended_by(&self, user_id: &str) -> Result<Vec<Event>, RepoError>;
    /// `(event_id, attendee)` pairs for the given events.
    async fn attendees(&self, event_ids: &[String]) -> Result<Vec<(String, User)>, RepoError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: NewReview) -> Result<Review, RepoError>;
    async fn list(&self) -> Result<Vec<Review>, RepoError>;
    async fn list_for_quest(&self, quest_id: &str) -> Result<Vec<Review>, RepoError>;
}

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
