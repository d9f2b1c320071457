// src/models/answer.rs

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::{
    error::AppError,
    models::options::{is_country, is_side},
    utils::html::clean_html,
};

pub const SEED_MAX_LEN: usize = 64;
pub const ID_LIST_MAX_LEN: usize = 256;
pub const COUNTRY_MAX_LEN: usize = 256;
pub const SIDE_MAX_LEN: usize = 64;
pub const AGE_MAX_LEN: usize = 64;

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 120;

/// Raw quiz form as posted by the browser. Missing fields decode as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuizSubmission {
    pub seed: String,
    pub real: String,
    pub fake: String,
    pub country: String,
    pub side: String,
    pub age: String,
}

/// An answer ready to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewAnswer {
    pub seed: String,
    /// Comma-separated IDs the respondent called real.
    pub real: String,
    /// Comma-separated IDs the respondent called fake.
    pub fake: String,
    #[validate(custom(function = validate_country))]
    pub country: String,
    #[validate(custom(function = validate_side))]
    pub side: String,
    #[validate(custom(function = validate_age))]
    pub age: String,
}

/// A validated submission together with the parsed ID lists used for scoring.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub answer: NewAnswer,
    pub real_ids: Vec<i64>,
    pub fake_ids: Vec<i64>,
}

impl QuizSubmission {
    /// Truncates, validates and sanitizes the submission against the current bank size.
    ///
    /// Every rule is checked; any failure rejects the whole submission.
    pub fn validate(self, question_count: usize) -> Result<ValidatedSubmission, AppError> {
        let answer = NewAnswer {
            seed: first_n(&self.seed, SEED_MAX_LEN),
            real: first_n(&self.real, ID_LIST_MAX_LEN),
            fake: first_n(&self.fake, ID_LIST_MAX_LEN),
            country: first_n(&self.country, COUNTRY_MAX_LEN),
            side: first_n(&self.side, SIDE_MAX_LEN),
            age: first_n(&self.age, AGE_MAX_LEN),
        };

        let mut problems = Vec::new();

        let real_ids = match parse_id_list(&answer.real, question_count) {
            Ok(ids) => ids,
            Err(e) => {
                problems.push(format!("invalid real question ID: {}", e));
                Vec::new()
            }
        };
        let fake_ids = match parse_id_list(&answer.fake, question_count) {
            Ok(ids) => ids,
            Err(e) => {
                problems.push(format!("invalid fake question ID: {}", e));
                Vec::new()
            }
        };

        if let Err(errors) = answer.validate() {
            problems.push(errors.to_string());
        }

        if !problems.is_empty() {
            return Err(AppError::InvalidSubmission(problems.join("; ")));
        }

        Ok(ValidatedSubmission {
            answer: answer.sanitized(),
            real_ids,
            fake_ids,
        })
    }
}

impl NewAnswer {
    fn sanitized(self) -> Self {
        Self {
            seed: clean_html(&self.seed),
            real: clean_html(&self.real),
            fake: clean_html(&self.fake),
            country: clean_html(&self.country),
            side: clean_html(&self.side),
            age: clean_html(&self.age),
        }
    }
}

/// Parses a comma-separated list of question IDs, each in `[0, question_count)`.
/// An empty string is an empty list.
pub fn parse_id_list(raw: &str, question_count: usize) -> Result<Vec<i64>, String> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|token| {
            let id = token
                .parse::<i64>()
                .map_err(|e| format!("not a number: `{}`: {}", token, e))?;
            if id < 0 || id as u64 >= question_count as u64 {
                return Err(format!("{} must be in [0, {})", id, question_count));
            }
            Ok(id)
        })
        .collect()
}

fn validate_country(country: &str) -> Result<(), ValidationError> {
    if !is_country(country) {
        return Err(ValidationError::new("invalid_country"));
    }
    Ok(())
}

fn validate_side(side: &str) -> Result<(), ValidationError> {
    if !is_side(side) {
        return Err(ValidationError::new("invalid_side"));
    }
    Ok(())
}

fn validate_age(age: &str) -> Result<(), ValidationError> {
    match age.parse::<i64>() {
        Ok(age) if (MIN_AGE..=MAX_AGE).contains(&age) => Ok(()),
        Ok(_) => Err(ValidationError::new("age_out_of_range")),
        Err(_) => Err(ValidationError::new("age_not_a_number")),
    }
}

/// Keeps the first `n` characters of `s`.
pub fn first_n(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Represents one row of the 'answers' table.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerRow {
    /// Unix nanoseconds.
    pub created: i64,
    pub seed: String,
    pub real: String,
    pub fake: String,
    pub country: String,
    pub side: String,
    pub age: String,
}

/// A stored answer with a decoded creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub created: DateTime<Utc>,
    pub seed: String,
    pub real: String,
    pub fake: String,
    pub country: String,
    pub side: String,
    pub age: String,
}

impl TryFrom<AnswerRow> for Answer {
    type Error = AnswerRow;

    /// Fails, handing the row back, when the stored timestamp is negative.
    fn try_from(row: AnswerRow) -> Result<Self, Self::Error> {
        if row.created < 0 {
            return Err(row);
        }

        Ok(Answer {
            created: DateTime::from_timestamp_nanos(row.created),
            seed: row.seed,
            real: row.real,
            fake: row.fake,
            country: row.country,
            side: row.side,
            age: row.age,
        })
    }
}

impl Answer {
    /// `timestamp,seed,"country",side,age,"fake_ids","real_ids"` with a trailing newline.
    pub fn to_export_line(&self) -> String {
        format!(
            "{},{},\"{}\",{},{},\"{}\",\"{}\"\n",
            format_cursor(&self.created),
            self.seed,
            self.country,
            self.side,
            self.age,
            self.fake,
            self.real
        )
    }
}

/// RFC 3339 with nanoseconds, the format accepted back as an export cursor.
pub fn format_cursor(created: &DateTime<Utc>) -> String {
    created.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_cursor(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(age: &str) -> QuizSubmission {
        QuizSubmission {
            seed: "12345".into(),
            real: "0,2".into(),
            fake: "1".into(),
            country: "Germany".into(),
            side: "Neither".into(),
            age: age.into(),
        }
    }

    #[test]
    fn age_bounds() {
        assert!(submission("17").validate(3).is_err());
        assert!(submission("121").validate(3).is_err());
        assert!(submission("18").validate(3).is_ok());
        assert!(submission("120").validate(3).is_ok());
        assert!(submission("twenty").validate(3).is_err());
    }

    #[test]
    fn country_must_be_listed() {
        let mut bad = submission("30");
        bad.country = "Atlantis".into();
        assert!(bad.validate(3).is_err());

        for country in crate::models::options::COUNTRIES {
            let mut ok = submission("30");
            ok.country = country.to_string();
            assert!(ok.validate(3).is_ok(), "{} rejected", country);
        }
    }

    #[test]
    fn side_must_be_listed() {
        let mut bad = submission("30");
        bad.side = "Everyone".into();
        assert!(bad.validate(3).is_err());
    }

    #[test]
    fn ids_must_be_in_range() {
        let mut bad = submission("30");
        bad.real = "0,3".into();
        assert!(bad.validate(3).is_err());

        let mut bad = submission("30");
        bad.fake = "1,,2".into();
        assert!(bad.validate(3).is_err());

        let mut bad = submission("30");
        bad.fake = "-1".into();
        assert!(bad.validate(3).is_err());

        let mut empty = submission("30");
        empty.real = String::new();
        empty.fake = String::new();
        let validated = empty.validate(0).unwrap();
        assert!(validated.real_ids.is_empty());
        assert!(validated.fake_ids.is_empty());
    }

    #[test]
    fn validated_ids_are_parsed() {
        let validated = submission("42").validate(3).unwrap();
        assert_eq!(validated.real_ids, vec![0, 2]);
        assert_eq!(validated.fake_ids, vec![1]);
        assert_eq!(validated.answer.age, "42");
    }

    #[test]
    fn fields_are_truncated_before_validation() {
        let mut long = submission("30");
        long.seed = "9".repeat(100);
        let validated = long.validate(3).unwrap();
        assert_eq!(validated.answer.seed.len(), SEED_MAX_LEN);

        // the age field keeps 64 characters, which still fails to parse
        let mut long_age = submission("30");
        long_age.age = "3".repeat(200);
        assert!(long_age.validate(3).is_err());
    }

    #[test]
    fn seed_is_sanitized() {
        let mut markup = submission("30");
        markup.seed = "<b onclick=\"x()\">7</b>".into();
        let validated = markup.validate(3).unwrap();
        assert_eq!(validated.answer.seed, "<b>7</b>");
    }

    #[test]
    fn first_n_counts_characters() {
        assert_eq!(first_n("ääää", 2), "ää");
        assert_eq!(first_n("ab", 5), "ab");
    }

    #[test]
    fn negative_timestamps_are_rejected() {
        let row = AnswerRow {
            created: -5,
            seed: String::new(),
            real: String::new(),
            fake: String::new(),
            country: String::new(),
            side: String::new(),
            age: String::new(),
        };
        assert!(Answer::try_from(row).is_err());
    }

    #[test]
    fn export_line_and_cursor() {
        let answer = Answer {
            created: DateTime::from_timestamp_nanos(1_700_000_000_123_456_789),
            seed: "42".into(),
            real: "1,2".into(),
            fake: "3".into(),
            country: "France".into(),
            side: "Group 1".into(),
            age: "33".into(),
        };

        let line = answer.to_export_line();
        assert_eq!(
            line,
            "2023-11-14T22:13:20.123456789Z,42,\"France\",Group 1,33,\"3\",\"1,2\"\n"
        );

        let cursor = parse_cursor("2023-11-14T22:13:20.123456789Z").unwrap();
        assert_eq!(cursor, answer.created);
        assert!(parse_cursor("yesterday").is_none());
    }
}
