// src/repository/answer.rs

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::answer::{Answer, AnswerRow, NewAnswer};

/// Cursor as stored nanoseconds, clamped by sign when outside the representable range.
fn cursor_nanos(cursor: &DateTime<Utc>) -> i64 {
    cursor.timestamp_nanos_opt().unwrap_or(if cursor.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}

pub struct AnswerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnswerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Appends an answer stamped with the current time.
    pub async fn insert(&self, answer: &NewAnswer) -> sqlx::Result<DateTime<Utc>> {
        let created = Utc::now();
        let created_nanos = created.timestamp_nanos_opt().unwrap_or(i64::MAX);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO answers (created, seed, real, fake, country, side, age)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(created_nanos)
        .bind(&answer.seed)
        .bind(&answer.real)
        .bind(&answer.fake)
        .bind(&answer.country)
        .bind(&answer.side)
        .bind(&answer.age)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(sqlx::Error::Protocol(format!(
                "inserted {} answer rows instead of one",
                result.rows_affected()
            )));
        }

        tx.commit().await?;

        Ok(created)
    }

    /// Up to `limit` answers in creation order, strictly after `cursor` when given.
    ///
    /// Rows with a negative timestamp are logged and skipped.
    pub async fn page_after(
        &self,
        limit: i64,
        cursor: Option<DateTime<Utc>>,
    ) -> sqlx::Result<Vec<Answer>> {
        let rows = match cursor {
            Some(cursor) => {
                sqlx::query_as::<_, AnswerRow>(
                    r#"
                    SELECT created, seed, real, fake, country, side, age
                    FROM answers
                    WHERE created > ?
                    ORDER BY created
                    LIMIT ?
                    "#,
                )
                .bind(cursor_nanos(&cursor))
                .bind(limit)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AnswerRow>(
                    r#"
                    SELECT created, seed, real, fake, country, side, age
                    FROM answers
                    ORDER BY created
                    LIMIT ?
                    "#,
                )
                .bind(limit)
                .fetch_all(self.pool)
                .await?
            }
        };

        let answers = rows
            .into_iter()
            .filter_map(|row| match Answer::try_from(row) {
                Ok(answer) => Some(answer),
                Err(row) => {
                    tracing::error!("skipping answer with invalid timestamp `{}`", row.created);
                    None
                }
            })
            .collect();

        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory SQLite");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to migrate database");

        pool
    }

    fn answer(seed: &str) -> NewAnswer {
        NewAnswer {
            seed: seed.to_string(),
            real: "0".to_string(),
            fake: "1".to_string(),
            country: "France".to_string(),
            side: "Neither".to_string(),
            age: "30".to_string(),
        }
    }

    #[test]
    fn out_of_range_cursors_clamp_by_sign() {
        let early: DateTime<Utc> = "1600-01-01T00:00:00Z".parse().unwrap();
        let late: DateTime<Utc> = "2300-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(cursor_nanos(&early), i64::MIN);
        assert_eq!(cursor_nanos(&late), i64::MAX);
    }

    #[tokio::test]
    async fn rows_with_negative_timestamps_are_skipped() {
        let pool = pool().await;
        let repo = AnswerRepository::new(&pool);

        sqlx::query(
            "INSERT INTO answers (created, seed, real, fake, country, side, age) \
             VALUES (-1, 'broken', '', '', 'France', 'Neither', '30')",
        )
        .execute(&pool)
        .await
        .unwrap();
        repo.insert(&answer("first")).await.unwrap();
        repo.insert(&answer("second")).await.unwrap();

        let page = repo.page_after(10, None).await.unwrap();
        let seeds: Vec<&str> = page.iter().map(|a| a.seed.as_str()).collect();
        assert_eq!(seeds, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn early_cursor_returns_everything() {
        let pool = pool().await;
        let repo = AnswerRepository::new(&pool);
        repo.insert(&answer("only")).await.unwrap();

        let early: DateTime<Utc> = "1600-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(repo.page_after(10, Some(early)).await.unwrap().len(), 1);

        let late: DateTime<Utc> = "2300-01-01T00:00:00Z".parse().unwrap();
        assert!(repo.page_after(10, Some(late)).await.unwrap().is_empty());
    }
}
