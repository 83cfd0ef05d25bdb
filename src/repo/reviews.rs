use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::models::{NewReview, Review};

use super::{new_id, RepoError, ReviewRepository};

#[derive(Clone)]
pub struct SqliteReviews {
    db_pool: SqlitePool,
}

impl SqliteReviews {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviews {
    async fn create(&self, review: NewReview) -> Result<Review, RepoError> {
        Ok(
            sqlx::query_as(
                "INSERT INTO reviews (id,author_id,quest_id,rating,body,created_at)
                VALUES (?,?,?,?,?,?)
                RETURNING *",
            )
                .bind(new_id())
                .bind(review.author_id)
                .bind(review.quest_id)
                .bind(review.rating)
                .bind(review.body)
                .bind(OffsetDateTime::now_utc())
                .fetch_one(&self.db_pool)
                .await?
        )
    }

    async fn list(&self) -> Result<Vec<Review>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM reviews ORDER BY created_at, id")
                .fetch_all(&self.db_pool)
                .await?
        )
    }

    async fn list_for_quest(&self, quest_id: &str) -> Result<Vec<Review>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM reviews WHERE quest_id=? ORDER BY created_at, id")
                .bind(quest_id)
                .fetch_all(&self.db_pool)
                .await?
        )
    }
}
