pub mod catalog;
pub mod handlers;

use sqlx::{PgExecutor, PgPool};
use unicompass_core::{InterestState, ShortlistedUniversity, University};

pub async fn find_university<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<University>, sqlx::Error> {
    sqlx::query_as::<_, University>("SELECT * FROM universities WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Where the caller stands with one university.
pub async fn interest_state<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
    university_id: i64,
) -> Result<InterestState, sqlx::Error> {
    let (shortlisted, locked): (bool, bool) = sqlx::query_as(
        r#"
        SELECT
            EXISTS (SELECT 1 FROM shortlisted_universities
                    WHERE user_id = $1 AND university_id = $2),
            EXISTS (SELECT 1 FROM locked_universities
                    WHERE user_id = $1 AND university_id = $2)
        "#,
    )
    .bind(user_id)
    .bind(university_id)
    .fetch_one(executor)
    .await?;
    Ok(InterestState::from_membership(shortlisted, locked))
}

/// The caller's shortlist, oldest entry first.
pub async fn list_shortlisted(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<ShortlistedUniversity>, sqlx::Error> {
    sqlx::query_as::<_, ShortlistedUniversity>(
        r#"
        SELECT u.*, s.category, s.notes
        FROM shortlisted_universities s
        JOIN universities u ON u.id = s.university_id
        WHERE s.user_id = $1
        ORDER BY s.created_at, s.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// The caller's locked universities, in the order they were locked.
pub async fn list_locked(pool: &PgPool, user_id: i64) -> Result<Vec<University>, sqlx::Error> {
    sqlx::query_as::<_, University>(
        r#"
        SELECT u.*
        FROM locked_universities l
        JOIN universities u ON u.id = l.university_id
        WHERE l.user_id = $1
        ORDER BY l.locked_at, l.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
