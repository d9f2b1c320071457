// src/state.rs

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::config::Config;

/// Number of questions currently in the bank.
///
/// Handlers take one snapshot per request. An upload stores the new size after its
/// transaction commits, so a request racing an upload may see the old count.
#[derive(Debug, Clone, Default)]
pub struct QuestionCount(Arc<AtomicUsize>);

impl QuestionCount {
    pub fn new(count: usize) -> Self {
        Self(Arc::new(AtomicUsize::new(count)))
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, count: usize) {
        self.0.store(count, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub question_count: QuestionCount,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for QuestionCount {
    fn from_ref(state: &AppState) -> Self {
        state.question_count.clone()
    }
}
