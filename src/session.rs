use tower_sessions::{session, Session};
use tracing::warn;

use crate::{models::User, repo::UserRepository, AppError, AppResult};

pub const USER_ID: &str = "user_id";

/// Logs `user_id` in under a fresh session id.
pub async fn start(session: &Session, user_id: &str) -> Result<(), session::Error> {
    session.cycle_id().await?;
    session.insert(USER_ID, user_id).await
}

pub async fn user_id(session: &Session) -> Result<Option<String>, session::Error> {
    session.get::<String>(USER_ID).await
}

/// The logged-in user. A session whose user has been deleted is flushed.
pub async fn require_user(session: &Session, users: &dyn UserRepository) -> AppResult<User> {
    let user_id = user_id(session).await?.ok_or(AppError::Unauthenticated)?;

    match users.find_by_id(&user_id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(%user_id, "session for a deleted user");
            end(session).await?;
            Err(AppError::Unauthenticated)
        }
    }
}

pub async fn end(session: &Session) -> Result<(), session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::{db, geocode::LatLng, models::NewUser, repo::SqliteUsers};

    fn fresh() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    async fn users_with_ada() -> (SqliteUsers, User) {
        let users = SqliteUsers::new(db::memory().await.unwrap());
        let ada = users
            .create(NewUser {
                email: "ada@example.com".to_owned(),
                hashed_password: "$argon2id$x".to_owned(),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                profile_image_url: String::new(),
                home_city: "London".to_owned(),
                home_state: "UK".to_owned(),
                location: LatLng { lat: 51.5, lng: -0.12 },
            })
            .await
            .unwrap();
        (users, ada)
    }

    #[tokio::test]
    async fn start_then_end() {
        let (users, ada) = users_with_ada().await;
        let session = fresh();
        assert_eq!(user_id(&session).await.unwrap(), None);

        start(&session, &ada.id).await.unwrap();
        assert_eq!(user_id(&session).await.unwrap(), Some(ada.id.clone()));
        assert_eq!(require_user(&session, &users).await.unwrap().id, ada.id);

        end(&session).await.unwrap();
        assert_eq!(user_id(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn anonymous_sessions_are_rejected() {
        let (users, _) = users_with_ada().await;
        assert!(matches!(
            require_user(&fresh(), &users).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn sessions_of_deleted_users_are_rejected_and_flushed() {
        let (users, ada) = users_with_ada().await;
        let session = fresh();
        start(&session, &ada.id).await.unwrap();

        users.delete_cascading(&ada.id).await.unwrap();

        assert!(matches!(
            require_user(&session, &users).await,
            Err(AppError::Unauthenticated)
        ));
        assert_eq!(user_id(&session).await.unwrap(), None);
    }
}
