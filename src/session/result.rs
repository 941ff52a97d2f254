use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::engine::scoring::{self, ScoreTier};
use crate::session::runner::PassRunner;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp, bumped past the previous id so two results
/// compiled in the same millisecond still differ.
fn next_id(now_ms: i64) -> i64 {
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now_ms.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

/// Summary of one finished quiz, as stored in history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: i64,
    pub date: String,
    pub category: String,
    #[serde(alias = "count")]
    pub question_count: usize,
    pub score: usize,
    #[serde(alias = "pct")]
    pub percentage: u32,
    pub wrong_count: usize,
    #[serde(default)]
    pub review_score: usize,
    #[serde(default)]
    pub review_total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
}

impl QuizResult {
    pub fn compile(
        primary: &PassRunner,
        review: Option<&PassRunner>,
        category_label: &str,
        now: DateTime<Local>,
        date_format: &str,
    ) -> Self {
        let question_count = primary.total();
        let score = primary.score();
        let wrong_count = primary.wrong_answers().len();
        let (review_score, review_total) = match review {
            Some(pass) if wrong_count > 0 => (pass.score(), wrong_count),
            _ => (0, 0),
        };

        Self {
            id: next_id(now.timestamp_millis()),
            date: now.format(date_format).to_string(),
            category: category_label.to_string(),
            question_count,
            score,
            percentage: scoring::percentage(score, question_count),
            wrong_count,
            review_score,
            review_total,
        }
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_percentage(self.percentage)
    }

    /// `None` when no review round ran.
    pub fn review(&self) -> Option<ReviewOutcome> {
        if self.review_total == 0 {
            return None;
        }
        Some(ReviewOutcome {
            score: self.review_score,
            total: self.review_total,
            percentage: scoring::percentage(self.review_score, self.review_total),
        })
    }

    pub fn score_text(&self) -> String {
        format!("{}/{}", self.score, self.question_count)
    }

    pub fn review_text(&self) -> String {
        match self.review() {
            Some(r) => format!("{}/{}", r.score, r.total),
            None => "\u{2014}".to_string(),
        }
    }
}
