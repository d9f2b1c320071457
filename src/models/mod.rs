// src/models/mod.rs

pub mod answer;
pub mod options;
pub mod question;
