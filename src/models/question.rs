// src/models/question.rs

use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::{error::AppError, utils::html::clean_html};

/// Which group a statement is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Claims {
    Group1,
    Group2,
}

impl Claims {
    pub const GROUP1_TOKEN: &'static str = "group1";
    pub const GROUP2_TOKEN: &'static str = "group2";

    /// Anything other than the exact Group2 token falls back to Group1.
    pub fn from_token(token: &str) -> Self {
        if token == Self::GROUP2_TOKEN {
            Claims::Group2
        } else {
            Claims::Group1
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Claims::Group1 => Self::GROUP1_TOKEN,
            Claims::Group2 => Self::GROUP2_TOKEN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Claims::Group1 => "Group 1",
            Claims::Group2 => "Group 2",
        }
    }
}

impl From<String> for Claims {
    fn from(token: String) -> Self {
        Claims::from_token(&token)
    }
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Question {
    pub id: i64,

    /// Statement text, already sanitized.
    pub question: String,

    #[sqlx(try_from = "String")]
    pub claims: Claims,

    /// Ground truth: `true` when the statement is fabricated.
    pub fake: bool,
}

impl Question {
    /// Header of the bank download, skipped again on upload.
    pub const CSV_HEADER: &'static str = "ID,claims,fake,question\n";

    /// One row in the upload format, `id,claims,real|fake,"text"`.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},\"{}\"\n",
            self.id,
            self.claims.as_token(),
            if self.fake { "fake" } else { "real" },
            self.question
        )
    }
}

/// Renders the whole bank as an uploadable file.
pub fn question_bank_csv(questions: &[Question]) -> String {
    let mut csv = String::from(Question::CSV_HEADER);
    for question in questions {
        csv.push_str(&question.to_csv_line());
    }
    csv
}

/// One scored pairing of a question with the respondent's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub question: String,
    pub claims: Claims,
    pub fake: bool,
    pub answered_fake: bool,
}

impl Reply {
    pub fn is_correct(&self) -> bool {
        self.fake == self.answered_fake
    }
}

/// Parses an uploaded question bank.
///
/// Rows look like `ID,ClaimsGroup,real|fake,QuestionText`. The text keeps its commas
/// and loses at most one wrapping double quote on each side. Rows with fewer than
/// three commas are skipped, as is a leading header row starting with `ID`.
/// A single bad ID rejects the whole upload.
pub fn parse_question_bank(content: &str) -> Result<Vec<Question>, AppError> {
    let mut questions = Vec::new();

    for (i, line) in content.split('\n').enumerate() {
        let row = line.strip_suffix('\r').unwrap_or(line);

        if i == 0 && row.starts_with("ID") {
            continue;
        }

        if row.matches(',').count() < 3 {
            continue;
        }

        let mut columns = row.splitn(4, ',');
        let (Some(id_col), Some(claims_col), Some(truth_col), Some(text)) =
            (columns.next(), columns.next(), columns.next(), columns.next())
        else {
            continue;
        };

        let id = id_col
            .parse::<i64>()
            .ok()
            .filter(|id| *id >= 0)
            .ok_or_else(|| {
                AppError::upload(
                    "Failed to validate question IDs",
                    format!("bad ID in row `{}`", row.chars().take(1024).collect::<String>()),
                )
            })?;

        let text = text.strip_prefix('"').unwrap_or(text);
        let text = text.strip_suffix('"').unwrap_or(text);

        questions.push(Question {
            id,
            question: clean_html(text),
            claims: Claims::from_token(claims_col),
            fake: truth_col != "real",
        });
    }

    Ok(questions)
}
