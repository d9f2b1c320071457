// src/quiz/mod.rs

pub mod scoring;
pub mod selector;

pub use scoring::{Scorecard, score};
pub use selector::{QuizDraw, Seed};
