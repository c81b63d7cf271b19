//! Response ledger: the student's answers, keyed by question id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::QuestionItem;

/// An agreement score on the 1–5 Likert scale.
///
/// Out-of-range values are rejected when the score is built, so a ledger can
/// only ever hold valid answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertScore(u8);

impl LikertScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::ScoreOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Scale anchor shown under the answer buttons, if this point has one.
    pub fn anchor_label(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("No Way!"),
            3 => Some("Maybe"),
            5 => Some("Yes!!"),
            _ => None,
        }
    }
}

impl TryFrom<u8> for LikertScore {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LikertScore> for u8 {
    fn from(score: LikertScore) -> Self {
        score.0
    }
}

impl fmt::Display for LikertScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Answers accumulated across all questionnaire pages.
///
/// Entries are only ever inserted or overwritten, never removed; the ledger
/// lives exactly as long as the session that owns it. Serializes as the
/// `{ "<id>": score }` mapping the scoring service expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseLedger {
    entries: BTreeMap<u32, LikertScore>,
}

impl ResponseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the answer for `item_id`.
    pub fn record(&mut self, item_id: u32, score: LikertScore) {
        self.entries.insert(item_id, score);
    }

    pub fn get(&self, item_id: u32) -> Option<LikertScore> {
        self.entries.get(&item_id).copied()
    }

    /// `true` iff every item in `items` has an answer.
    pub fn is_complete(&self, items: &[QuestionItem]) -> bool {
        items.iter().all(|q| self.entries.contains_key(&q.id))
    }

    /// Number of items in `items` still without an answer.
    pub fn missing(&self, items: &[QuestionItem]) -> usize {
        items
            .iter()
            .filter(|q| !self.entries.contains_key(&q.id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, LikertScore)> + '_ {
        self.entries.iter().map(|(id, score)| (*id, *score))
    }
}
