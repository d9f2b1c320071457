// src/repository/question.rs

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::question::Question;

/// Rows per INSERT statement, keeping bind counts well under SQLite's limit.
const INSERT_CHUNK: usize = 500;

pub struct QuestionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> QuestionRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> sqlx::Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(self.pool)
            .await?;

        Ok(count.max(0) as usize)
    }

    /// The whole bank, ascending by id.
    pub async fn list_all(&self) -> sqlx::Result<Vec<Question>> {
        sqlx::query_as::<_, Question>(
            "SELECT id, question, claims, fake FROM questions ORDER BY id",
        )
        .fetch_all(self.pool)
        .await
    }

    /// Distinct rows for the given ids, ascending by id. Unknown ids are ignored.
    pub async fn find_by_ids(&self, ids: &[i64]) -> sqlx::Result<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT id, question, claims, fake FROM questions WHERE id IN (");

        let mut separated = query_builder.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        query_builder.build_query_as().fetch_all(self.pool).await
    }

    /// Replaces the entire bank in one transaction.
    ///
    /// Any failure, including a short insert count, rolls everything back.
    pub async fn replace_all(&self, questions: &[Question]) -> sqlx::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM questions").execute(&mut *tx).await?;

        let mut inserted = 0;
        for chunk in questions.chunks(INSERT_CHUNK) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("INSERT INTO questions (id, question, claims, fake) ");
            builder.push_values(chunk, |mut row, q| {
                row.push_bind(q.id)
                    .push_bind(q.question.clone())
                    .push_bind(q.claims.as_token())
                    .push_bind(q.fake);
            });

            inserted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        if inserted != questions.len() as u64 {
            tx.rollback().await?;
            return Err(sqlx::Error::Protocol(format!(
                "inserted {} of {} questions",
                inserted,
                questions.len()
            )));
        }

        tx.commit().await
    }
}
