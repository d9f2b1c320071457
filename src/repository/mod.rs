// src/repository/mod.rs

pub mod answer;
pub mod question;

pub use answer::AnswerRepository;
pub use question::QuestionRepository;
