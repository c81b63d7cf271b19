//! Core data model types for streamwise.
//!
//! These are the values that flow through an assessment session: the
//! question set, the student's registration profile, and the scored result
//! returned by the remote scoring service.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{QuestionSetError, ValidationError};

/// A single Likert-scale statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    /// Stable identifier, also the key used in submitted responses.
    pub id: u32,
    /// The statement shown to the student.
    pub text: String,
}

/// An ordered, immutable battery of assessment items.
///
/// Display order is insertion order. Construction rejects empty sets,
/// duplicate ids, and blank statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    items: Vec<QuestionItem>,
}

impl QuestionSet {
    pub fn new(items: Vec<QuestionItem>) -> Result<Self, QuestionSetError> {
        if items.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(QuestionSetError::DuplicateId(item.id));
            }
            if item.text.trim().is_empty() {
                return Err(QuestionSetError::BlankText(item.id));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&QuestionItem> {
        self.items.iter().find(|q| q.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }
}

/// School examination board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Board {
    #[default]
    Sslc,
    Cbse,
    Icse,
}

impl Board {
    pub const ALL: [Board; 3] = [Board::Sslc, Board::Cbse, Board::Icse];

    /// Label shown in the registration picker.
    pub fn label(&self) -> &'static str {
        match self {
            Board::Sslc => "SSLC (Karnataka)",
            Board::Cbse => "CBSE",
            Board::Icse => "ICSE",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Board::Sslc => write!(f, "SSLC"),
            Board::Cbse => write!(f, "CBSE"),
            Board::Icse => write!(f, "ICSE"),
        }
    }
}

impl FromStr for Board {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SSLC" => Ok(Board::Sslc),
            "CBSE" => Ok(Board::Cbse),
            "ICSE" => Ok(Board::Icse),
            other => Err(ValidationError::UnknownBoard(other.to_string())),
        }
    }
}

/// Student details collected at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationProfile {
    pub name: String,
    pub school: String,
    pub district: String,
    pub mobile: String,
    #[serde(default)]
    pub board: Board,
    #[serde(default)]
    pub consent: bool,
}

impl RegistrationProfile {
    /// Check that every required field is filled in and consent is given.
    ///
    /// Fields are checked in form order so the first missing one is reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("name", &self.name),
            ("school", &self.school),
            ("district", &self.district),
            ("mobile", &self.mobile),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        if !self.consent {
            return Err(ValidationError::ConsentRequired);
        }
        Ok(())
    }
}

/// Opaque identifier for a stored report.
///
/// The scoring service may hand back either a number or a string; both are
/// kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ReportId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => ReportId(n.to_string()),
            RawId::Text(s) => ReportId(s),
        })
    }
}

/// Result produced by the remote scoring service for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Identifier for retrieving the report document later.
    #[serde(rename = "id")]
    pub report_id: ReportId,
    /// Trait name to percentage in `[0, 100]`.
    pub scores: BTreeMap<String, f64>,
    /// Highest-scoring trait as decided by the service.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dominant_trait: String,
    /// Recommended stream (e.g. "Science").
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggested_stream: String,
}

/// Accept `null` where a string is expected.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
