// src/handlers/quiz.rs

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    error::AppError,
    models::answer::QuizSubmission,
    quiz::{QuizDraw, Seed, score},
    repository::{AnswerRepository, QuestionRepository},
    state::QuestionCount,
    views,
};

/// Serves a fresh quiz.
///
/// * Draws a random seed and selects up to `questions_per_quiz` distinct questions.
/// * Shuffles them with the same seeded generator before rendering.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(question_count): State<QuestionCount>,
) -> Result<impl IntoResponse, AppError> {
    let mut draw = QuizDraw::new(
        Seed::random(),
        question_count.get(),
        config.questions_per_quiz,
    );

    let repo = QuestionRepository::new(&pool);
    let mut questions = if draw.whole_bank {
        repo.list_all().await
    } else {
        repo.find_by_ids(&draw.ids).await
    }
    .map_err(|e| AppError::store("Failed to read questions", e))?;

    // Rows come back in id order
    draw.shuffle(&mut questions);

    Ok(Html(
        views::quiz_page(&draw.seed.to_string(), &questions).into_string(),
    ))
}

/// Records a quiz submission and renders the scored results.
///
/// * Validates every field against the current bank size; any failure stores nothing.
/// * Appends the answer, then scores the listed ids against the stored truth.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    State(question_count): State<QuestionCount>,
    form: Result<Form<QuizSubmission>, FormRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Form(submission) = form.map_err(|e| AppError::InvalidSubmission(e.body_text()))?;

    let validated = submission.validate(question_count.get())?;

    AnswerRepository::new(&pool)
        .insert(&validated.answer)
        .await
        .map_err(|e| AppError::store("Failed to save answers", e))?;

    let ids: Vec<i64> = validated
        .real_ids
        .iter()
        .chain(&validated.fake_ids)
        .copied()
        .collect();

    let questions = QuestionRepository::new(&pool)
        .find_by_ids(&ids)
        .await
        .map_err(|e| AppError::store("Failed to read questions", e))?;

    let scorecard = score(&questions, &validated.real_ids, &validated.fake_ids);

    Ok((
        StatusCode::ACCEPTED,
        Html(
            views::results_page(&validated.answer.seed, scorecard.correct, &scorecard.replies)
                .into_string(),
        ),
    ))
}
