//! Fuzzy lookup of a user question against the knowledge base.

use tracing::debug;

use crate::table::{InterviewRecord, KnowledgeBase};

/// Scores must be strictly above this for a cached answer to be used.
pub const DEFAULT_THRESHOLD: u8 = 70;

/// Case-insensitive similarity between two strings, from 0 to 100.
///
/// Normalized Levenshtein distance over Unicode scalar values, rounded to
/// the nearest integer. Two empty strings score 100.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let ratio = strsim::normalized_levenshtein(&a, &b);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    /// A stored question was similar enough.
    Hit {
        record: &'a InterviewRecord,
        score: u8,
    },
    /// Nothing scored above the threshold. `best` is `None` for an empty
    /// knowledge base.
    Miss { best: Option<u8> },
}

impl MatchOutcome<'_> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// The formatted answer for a hit.
    pub fn answer(&self) -> Option<String> {
        match self {
            Self::Hit { record, .. } => Some(record.format_answer()),
            Self::Miss { .. } => None,
        }
    }
}

/// Picks the best-scoring stored question for a query.
#[derive(Debug, Clone, Copy)]
pub struct QuestionMatcher {
    threshold: u8,
}

impl Default for QuestionMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl QuestionMatcher {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Scan the whole knowledge base and return the best match, if it clears
    /// the threshold. Ties keep the first-seen record.
    pub fn find<'a>(&self, question: &str, kb: &'a KnowledgeBase) -> MatchOutcome<'a> {
        let mut best: Option<(&'a InterviewRecord, u8)> = None;

        for record in kb.iter() {
            let score = similarity(question, &record.question);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((record, score));
            }
        }

        match best {
            Some((record, score)) if score > self.threshold => {
                debug!(score, matched = %record.question, "knowledge base hit");
                MatchOutcome::Hit { record, score }
            }
            Some((record, score)) => {
                debug!(score, closest = %record.question, "no stored question above threshold");
                MatchOutcome::Miss { best: Some(score) }
            }
            None => MatchOutcome::Miss { best: None },
        }
    }
}
