//! Question bank parser.
//!
//! Loads question sets from JSON files (an array of `{ "id", "text" }`
//! objects) and checks them for problems the constructor does not reject.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{QuestionItem, QuestionSet};
use crate::pagination::Paginator;

const BUNDLED_QUESTIONS: &str = include_str!("../data/questions.json");

/// Statements longer than this are flagged; they wrap badly on phones.
const MAX_STATEMENT_CHARS: usize = 160;

/// Parse a question bank file.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse question bank JSON (useful for testing).
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let items: Vec<QuestionItem> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    QuestionSet::new(items)
        .with_context(|| format!("invalid question bank: {}", source_path.display()))
}

/// The 60-item RIASEC bank shipped with streamwise.
pub fn bundled_question_set() -> Result<QuestionSet> {
    parse_question_set_str(BUNDLED_QUESTIONS, Path::new("<bundled>"))
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item the warning is about, if any.
    pub item_id: Option<u32>,
    pub message: String,
}

/// Check a question set for non-fatal problems.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // The scoring service groups items by id, so gaps usually mean a
    // mis-numbered bank.
    let expected: HashSet<u32> = (1..=set.len() as u32).collect();
    let actual: HashSet<u32> = set.items().iter().map(|q| q.id).collect();
    if expected != actual {
        warnings.push(ValidationWarning {
            item_id: None,
            message: format!("ids are not exactly 1..={}", set.len()),
        });
    }

    let mut seen_text = HashSet::new();
    for item in set.items() {
        let normalized = item.text.trim().to_lowercase();
        if !seen_text.insert(normalized) {
            warnings.push(ValidationWarning {
                item_id: Some(item.id),
                message: "duplicate statement text".into(),
            });
        }
    }

    for item in set.items() {
        let len = item.text.chars().count();
        if len > MAX_STATEMENT_CHARS {
            warnings.push(ValidationWarning {
                item_id: Some(item.id),
                message: format!("statement is {len} characters (max {MAX_STATEMENT_CHARS})"),
            });
        }
    }

    warnings
}

/// Items per page for `set` split into pages of `page_size`.
pub fn page_layout(set: &QuestionSet, page_size: usize) -> Result<Vec<usize>> {
    let pager = Paginator::new(std::sync::Arc::new(set.clone()), page_size)?;
    Ok((0..pager.page_count())
        .map(|n| pager.questions_for_page(n).len())
        .collect())
}
