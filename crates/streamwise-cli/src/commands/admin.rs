//! The `streamwise admin` commands.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use streamwise_client::config::load_config_from;
use streamwise_core::parser;
use streamwise_core::session::{Session, SessionState};
use streamwise_core::traits::{AdminService, ScoringService, StudentRecord};
use streamwise_core::{ReportId, SessionError};

use crate::AdminCommand;

pub async fn execute(
    command: AdminCommand,
    password: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    // The admin branch never touches questions; the bundled bank keeps a
    // broken `questions_path` from locking administrators out.
    let questions = parser::bundled_question_set()?;
    let mut session = Session::new(Arc::new(questions), config.page_size)?;

    let admin = config.admin_client();
    match password
        .or_else(|| config.admin_password.clone())
        .filter(|p| !p.is_empty())
    {
        Some(p) => login(&mut session, &admin, &p).await?,
        None => {
            let stdin = std::io::stdin();
            login_interactive(&mut session, &admin, &mut stdin.lock(), &mut std::io::stderr())
                .await?
        }
    }

    match command {
        AdminCommand::Students => {
            let students = session.fetch_students(&admin).await?;
            println!("{}", students_table(&students));
        }
        AdminCommand::Export { output } => {
            let csv = admin.export_csv().await.context("CSV export failed")?;
            write_file(&output, &csv)?;
            eprintln!("Exported {} bytes to: {}", csv.len(), output.display());
        }
        AdminCommand::Report { id, output } => {
            let scoring = config.scoring_client();
            let report_id = ReportId::new(id);
            let bytes = scoring
                .download_report(&report_id)
                .await
                .with_context(|| format!("failed to download report {report_id}"))?;
            write_file(&output, &bytes)?;
            eprintln!("Report saved to: {}", output.display());
        }
    }

    session.logout()?;
    Ok(())
}

/// Enter the admin branch and authenticate.
async fn login(session: &mut Session, admin: &dyn AdminService, password: &str) -> Result<()> {
    session.enter_admin()?;
    if let Err(e) = session.authenticate(admin, password).await {
        anyhow::bail!("{} ({e})", e.user_notice());
    }
    Ok(())
}

/// Enter the admin branch and prompt until a password is accepted.
///
/// A rejected password re-prompts with the session's notice; running out of
/// input or a service failure ends the attempt.
async fn login_interactive<R: BufRead, W: Write>(
    session: &mut Session,
    admin: &dyn AdminService,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    session.enter_admin()?;
    loop {
        let Some(password) = read_password(input, out)? else {
            anyhow::bail!("no admin password given");
        };
        if password.is_empty() {
            continue;
        }
        match session.authenticate(admin, &password).await {
            Ok(()) => return Ok(()),
            Err(SessionError::InvalidCredential(_)) => {
                if let SessionState::AdminAuthenticating {
                    last_error: Some(notice),
                } = session.state()
                {
                    writeln!(out, "{notice}")?;
                }
            }
            Err(e) => anyhow::bail!("{} ({e})", e.user_notice()),
        }
    }
}

/// Prompt for one password line; `None` at end of input.
fn read_password<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<String>> {
    write!(out, "Admin password: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Render the dashboard listing.
fn students_table(students: &[StudentRecord]) -> String {
    if students.is_empty() {
        return "No students have taken the assessment yet.".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "School",
        "District",
        "Mobile",
        "Board",
        "Dominant Trait",
    ]);
    for s in students {
        table.add_row(vec![
            Cell::new(&s.id),
            Cell::new(&s.name),
            Cell::new(&s.school),
            Cell::new(&s.district),
            Cell::new(&s.mobile),
            Cell::new(&s.board),
            Cell::new(&s.trait_dominance),
        ]);
    }
    format!("Managing {} future leaders\n{table}", students.len())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
