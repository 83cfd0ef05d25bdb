use sqlx::SqlitePool;

use crate::models::{DeletionReport, User};

use super::RepoError;

pub(super) async fn delete_user(
    db_pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<(User, DeletionReport)>, RepoError> {
    let mut tx = db_pool.begin().await?;

    let Some(user) = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id=?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    let mut report = DeletionReport::default();

    report.attendances += sqlx::query(
        "DELETE FROM event_attendees WHERE event_id IN (
            SELECT id FROM events
            WHERE host_id = ?1 OR quest_id IN (SELECT id FROM quests WHERE creator_id = ?1)
        )",
    )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    report.events = sqlx::query(
        "DELETE FROM events
        WHERE host_id = ?1 OR quest_id IN (SELECT id FROM quests WHERE creator_id = ?1)",
    )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    report.reviews = sqlx::query(
        "DELETE FROM reviews
        WHERE author_id = ?1 OR quest_id IN (SELECT id FROM quests WHERE creator_id = ?1)",
    )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    // events they only attended
    report.attendances += sqlx::query("DELETE FROM event_attendees WHERE user_id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    report.quests = sqlx::query("DELETE FROM quests WHERE creator_id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some((user, report)))
}
