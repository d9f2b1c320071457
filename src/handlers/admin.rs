// src/handlers/admin.rs

use axum::{
    extract::{Multipart, Query, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        answer::parse_cursor,
        question::{parse_question_bank, question_bank_csv},
    },
    repository::{AnswerRepository, QuestionRepository},
    state::QuestionCount,
    views,
};

/// Rows returned per export request.
pub const ANSWERS_PAGE_SIZE: i64 = 4000;

/// Lists the whole question bank.
/// Admin only.
pub async fn management_page(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let questions = QuestionRepository::new(&pool)
        .list_all()
        .await
        .map_err(|e| AppError::store("Failed to read questions", e))?;

    Ok(Html(views::admin_page(&questions, ANSWERS_PAGE_SIZE).into_string()))
}

/// Downloads the whole bank in the upload format.
/// Admin only.
pub async fn download_questions(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let questions = QuestionRepository::new(&pool)
        .list_all()
        .await
        .map_err(|e| AppError::store("Failed to read questions", e))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"questions.csv\""),
        ],
        question_bank_csv(&questions),
    ))
}

/// Replaces the question bank from the multipart field `file`.
/// Admin only.
pub async fn upload_questions(
    State(pool): State<SqlitePool>,
    State(question_count): State<QuestionCount>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart =
        multipart.map_err(|e| AppError::upload("Invalid form submission", e.body_text()))?;

    let mut content = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::upload("Invalid form submission", e.body_text()))?
    {
        if field.name() == Some("file") {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::upload("Failed to read input file", e.body_text()))?;
            content = Some(text);
            break;
        }
    }

    let content =
        content.ok_or_else(|| AppError::upload("Invalid form submission", "missing `file` field"))?;

    let questions = parse_question_bank(&content)?;
    if questions.is_empty() {
        return Err(AppError::upload(
            "Failed to update questions",
            "upload contains no question rows",
        ));
    }

    QuestionRepository::new(&pool)
        .replace_all(&questions)
        .await
        .map_err(|e| AppError::upload("Failed to update questions", e.to_string()))?;

    question_count.set(questions.len());
    tracing::info!("Question bank replaced with {} questions", questions.len());

    Ok(StatusCode::OK)
}

/// Query parameters for the answer export.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// RFC 3339 timestamp; only answers created strictly after it are returned.
    pub created: Option<String>,
}

/// Exports one page of answers as delimited text.
/// Admin only. An unparsable cursor starts from the beginning.
pub async fn export_answers(
    State(pool): State<SqlitePool>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let cursor = params.created.as_deref().and_then(|raw| {
        let parsed = parse_cursor(raw);
        if parsed.is_none() {
            tracing::warn!("Ignoring unparsable export cursor `{}`", raw);
        }
        parsed
    });

    let answers = AnswerRepository::new(&pool)
        .page_after(ANSWERS_PAGE_SIZE, cursor)
        .await
        .map_err(|e| AppError::store("Failed to read answers", e))?;

    let body: String = answers.iter().map(|a| a.to_export_line()).collect();

    Ok((StatusCode::OK, body))
}
