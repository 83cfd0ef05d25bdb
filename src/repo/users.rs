use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::OffsetDateTime;

use crate::models::{DeletionReport, NewUser, ProfileUpdate, User};

use super::{cascade, new_id, RepoError, UserRepository};

#[derive(Clone)]
pub struct SqliteUsers {
    db_pool: SqlitePool,
}

impl SqliteUsers {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUsers {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let now = OffsetDateTime::now_utc();
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users
                (id,email,hashed_password,first_name,last_name,profile_image_url,home_city,home_state,lat,lng,created_at,updated_at)
            VALUES (?,?,?,?,?,?,?,?,?,?,?,?)
            RETURNING *",
        )
            .bind(new_id())
            .bind(&user.email)
            .bind(&user.hashed_password)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.profile_image_url)
            .bind(&user.home_city)
            .bind(&user.home_state)
            .bind(user.location.lat)
            .bind(user.location.lng)
            .bind(now)
            .bind(now)
            .fetch_one(&self.db_pool)
            .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(RepoError::DuplicateEmail(user.email))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM users WHERE id=?")
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?
        )
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM users WHERE email=?")
                .bind(email)
                .fetch_optional(&self.db_pool)
                .await?
        )
    }

    async fn find_many(&self, ids: &[String]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM users WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        Ok(query.build_query_as().fetch_all(&self.db_pool).await?)
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM users ORDER BY created_at, id")
                .fetch_all(&self.db_pool)
                .await?
        )
    }

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> Result<Option<User>, RepoError> {
        Ok(
            sqlx::query_as(
                "UPDATE users SET
                    first_name=?, last_name=?, home_city=?, home_state=?, lat=?, lng=?,
                    profile_image_url=COALESCE(?, profile_image_url), updated_at=?
                WHERE id=?
                RETURNING *",
            )
                .bind(update.first_name)
                .bind(update.last_name)
                .bind(update.home_city)
                .bind(update.home_state)
                .bind(update.location.lat)
                .bind(update.location.lng)
                .bind(update.profile_image_url)
                .bind(OffsetDateTime::now_utc())
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?
        )
    }

    async fn delete_cascading(&self, id: &str) -> Result<Option<(User, DeletionReport)>, RepoError> {
        cascade::delete_user(&self.db_pool, id).await
    }
}
