pub mod admin;
pub mod assess;
pub mod init;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use streamwise_core::parser;
use streamwise_core::QuestionSet;

/// Load the question bank at `path`, or the bundled one.
pub fn load_questions(path: Option<&Path>) -> Result<QuestionSet> {
    match path {
        Some(p) => parser::parse_question_set(p),
        None => parser::bundled_question_set(),
    }
}
