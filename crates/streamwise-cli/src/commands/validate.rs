//! The `streamwise validate` command.

use std::path::PathBuf;

use anyhow::Result;

use streamwise_core::parser;

use super::load_questions;

pub fn execute(questions_path: Option<PathBuf>, page_size: usize) -> Result<()> {
    let set = load_questions(questions_path.as_deref())?;
    let layout = parser::page_layout(&set, page_size)?;

    let source = questions_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "bundled".to_string());
    println!(
        "Question bank ({source}): {} items, {} pages",
        set.len(),
        layout.len()
    );

    let warnings = parser::validate_question_set(&set);
    for w in &warnings {
        let prefix = w
            .item_id
            .map(|id| format!("  [Q{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
