// src/quiz/selector.rs

//! Seeded quiz selection.
//!
//! One generator, seeded from the public seed, first draws the question ids and
//! then shuffles the fetched rows, so a seed pins down both the set and the order.

use std::{collections::HashSet, fmt, num::ParseIntError, str::FromStr};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Publicly exposed quiz seed. Not a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64);

impl Seed {
    pub fn random() -> Self {
        Seed(rand::random())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Seed {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Seed)
    }
}

/// Draws up to `per_quiz` distinct ids in `[0, question_count)`.
///
/// When the bank is not larger than the quiz every id is used and the generator is
/// left untouched.
pub fn select_ids<R: Rng>(rng: &mut R, question_count: usize, per_quiz: usize) -> Vec<i64> {
    if question_count <= per_quiz {
        return (0..question_count as i64).collect();
    }

    let mut seen = HashSet::with_capacity(per_quiz);
    let mut ids = Vec::with_capacity(per_quiz);
    while ids.len() < per_quiz {
        let candidate = (rng.r#gen::<u64>() % question_count as u64) as i64;
        if seen.insert(candidate) {
            ids.push(candidate);
        }
    }

    ids
}

/// One quiz selection, holding the generator for the follow-up shuffle.
#[derive(Debug)]
pub struct QuizDraw {
    pub seed: Seed,
    pub ids: Vec<i64>,
    /// Set when the quiz covers the whole bank, in which case the caller should load
    /// every question rather than look ids up.
    pub whole_bank: bool,
    rng: StdRng,
}

impl QuizDraw {
    pub fn new(seed: Seed, question_count: usize, per_quiz: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed.0);
        let ids = select_ids(&mut rng, question_count, per_quiz);

        Self {
            seed,
            ids,
            whole_bank: question_count <= per_quiz,
            rng,
        }
    }

    /// Fisher-Yates shuffle driven by the same generator that drew the ids.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
