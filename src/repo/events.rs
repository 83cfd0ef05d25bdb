use async_trait::async_trait;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use time::{OffsetDateTime, UtcOffset};

use crate::models::{Event, NewEvent, User};

use super::{new_id, EventRepository, RepoError};

#[derive(Clone)]
pub struct SqliteEvents {
    db_pool: SqlitePool,
}

impl SqliteEvents {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[derive(FromRow)]
struct AttendeeRow {
    event_id: String,
    #[sqlx(flatten)]
    user: User,
}

fn by_start_time(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
    events
}

#[async_trait]
impl EventRepository for SqliteEvents {
    async fn create(&self, event: NewEvent) -> Result<Event, RepoError> {
        Ok(
            sqlx::query_as(
                "INSERT INTO events (id,host_id,quest_id,title,description,start_time,created_at)
                VALUES (?,?,?,?,?,?,?)
                RETURNING *",
            )
                .bind(new_id())
                .bind(event.host_id)
                .bind(event.quest_id)
                .bind(event.title)
                .bind(event.description)
                .bind(event.start_time.to_offset(UtcOffset::UTC))
                .bind(OffsetDateTime::now_utc())
                .fetch_one(&self.db_pool)
                .await?
        )
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, RepoError> {
        Ok(
            sqlx::query_as("SELECT * FROM events WHERE id=?")
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?
        )
    }

    async fn add_attendee(&self, event_id: &str, user_id: &str) -> Result<(), RepoError> {
        sqlx::query("INSERT OR IGNORE INTO event_attendees (event_id,user_id) VALUES (?,?)")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Event>, RepoError> {
        let events = sqlx::query_as("SELECT * FROM events")
            .fetch_all(&self.db_pool)
            .await?;
        Ok(by_start_time(events))
    }

    async fn list_hosted_by(&self, user_id: &str) -> Result<Vec<Event>, RepoError> {
        let events = sqlx::query_as("SELECT * FROM events WHERE host_id=?")
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await?;
        Ok(by_start_time(events))
    }

    async fn list_attended_by(&self, user_id: &str) -> Result<Vec<Event>, RepoError> {
        let events = sqlx::query_as(
            "SELECT e.* FROM events e
            JOIN event_attendees a ON a.event_id = e.id
            WHERE a.user_id=?",
        )
            .bind(user_id)
            .fetch_all(&self.db_pool)
            .await?;
        Ok(by_start_time(events))
    }

    async fn attendees(&self, event_ids: &[String]) -> Result<Vec<(String, User)>, RepoError> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT a.event_id, u.* FROM event_attendees a
            JOIN users u ON u.id = a.user_id
            WHERE a.event_id IN (",
        );
        let mut separated = query.separated(", ");
        for id in event_ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(") ORDER BY u.last_name, u.first_name, u.id");

        let rows: Vec<AttendeeRow> = query.build_query_as().fetch_all(&self.db_pool).await?;
        Ok(rows.into_iter().map(|row| (row.event_id, row.user)).collect())
    }
}
