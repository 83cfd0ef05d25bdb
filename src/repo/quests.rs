use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::models::{NewQuest, Quest};

use super::{new_id, QuestRepository, RepoError};

#[derive(Clone)]
pub struct SqliteQuests {
    db_pool: SqlitePool,
}

impl SqliteQuests {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl QuestRepository for SqliteQuests {
    async fn create(&self, quest: NewQuest) -> Result<Quest, RepoError> {
        Ok(
            sqlx::query_as(
                "INSERT INTO quests (id,creator_id,title,description,created_at)
                VALUES (?,?,?,?,?)
                RETURNING *",
            )
                .bind(new_id())
                .bind(quest.creator_id)
                .bind(quest.title)
                .bind(quest.description)
                .bind(OffsetDateTime::now_utc())
                .fetch_one(&self.db_pool)
                .await?
        )
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Quest>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM quests WHERE id=?")
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?
        )
    }

    async fn list(&self) -> Result<Vec<Quest>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM quests ORDER BY created_at, id")
                .fetch_all(&self.db_pool)
                .await?
        )
    }
}
