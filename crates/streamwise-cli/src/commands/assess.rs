//! The `streamwise assess` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use streamwise_client::config::load_config_from;
use streamwise_core::ledger::LikertScore;
use streamwise_core::pagination::PageStatus;
use streamwise_core::presenter::ResultView;
use streamwise_core::session::Session;
use streamwise_core::traits::ScoringService;
use streamwise_core::{Board, RegistrationProfile};

use super::load_questions;

/// How an interactive run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Results were received and shown.
    Completed,
    /// The student quit or input ran out first.
    Quit,
}

pub async fn execute(
    questions_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    report_out: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let questions = load_questions(questions_path.as_deref().or(config.questions_path.as_deref()))?;

    let client = config.scoring_client();
    let mut session = Session::new(Arc::new(questions), config.page_size)?
        .with_submission_timeout(config.timeout());
    info!(session = %session.id(), api = %config.api_base_url, "assessment started");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();

    let outcome = run_interactive(&mut session, &client, &mut input, &mut out).await?;

    if let (Outcome::Completed, Some(path)) = (outcome, report_out) {
        if let Some(view) = session.result() {
            let bytes = client
                .download_report(view.report_id())
                .await
                .context("failed to download report")?;
            std::fs::write(&path, &bytes)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            eprintln!("Report saved to: {}", path.display());
        }
    }

    Ok(())
}

/// Drive a session from registration to results over line-based I/O.
pub async fn run_interactive<R: BufRead, W: Write>(
    session: &mut Session,
    service: &dyn ScoringService,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    writeln!(out, "Discover Your Natural Talents")?;
    writeln!(out)?;

    if !register(session, input, out)? {
        return Ok(Outcome::Quit);
    }

    let mut shown_page = None;
    loop {
        let Some(questionnaire) = session.questionnaire() else {
            anyhow::bail!("session left the questionnaire unexpectedly");
        };
        let paginator = questionnaire.paginator();
        let page = paginator.current_page();

        if shown_page != Some(page) {
            print_page_header(paginator.timeline(), page, out)?;
            shown_page = Some(page);
        }

        let pending = paginator
            .current_questions()
            .iter()
            .find(|q| questionnaire.ledger().get(q.id).is_none())
            .cloned();
        let is_last = paginator.is_last_page();

        match &pending {
            Some(q) => {
                writeln!(out, "Q{}. {}", q.id, q.text)?;
                write!(out, "  1-5 (n next, p back, s submit, q quit): ")?;
            }
            None if is_last => {
                write!(out, "All done here. [s]ubmit, [p]revious, or <id>=<1-5> to change: ")?;
            }
            None => {
                write!(out, "Page complete. [n]ext, [p]revious, or <id>=<1-5> to change: ")?;
            }
        }
        out.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(out)?;
            return Ok(Outcome::Quit);
        };

        match line.as_str() {
            "q" => return Ok(Outcome::Quit),
            "n" => {
                if !session.advance()? {
                    if is_last {
                        writeln!(out, "This is the last page. Press s to submit.")?;
                    } else {
                        writeln!(out, "Please answer every question on this page first.")?;
                    }
                }
            }
            "p" => {
                if !session.retreat()? {
                    writeln!(out, "Already on the first page.")?;
                }
            }
            "s" => {
                if !session.can_submit() {
                    let missing = session
                        .questionnaire()
                        .map(|q| q.paginator().missing(q.ledger()))
                        .unwrap_or(0);
                    writeln!(out, "{missing} question(s) still unanswered.")?;
                    continue;
                }
                writeln!(out, "Calculating your future...")?;
                match session.submit(service).await {
                    Ok(view) => {
                        print_results(view, &service.report_url(view.report_id()), out)?;
                        return Ok(Outcome::Completed);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "submission failed");
                        writeln!(out, "{}", e.user_notice())?;
                    }
                }
            }
            other => {
                let answer = match (other.split_once('='), &pending) {
                    (Some((id, score)), _) => id
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .zip(score.trim().parse::<u8>().ok()),
                    (None, Some(q)) => other.parse::<u8>().ok().map(|s| (q.id, s)),
                    (None, None) => None,
                };
                match answer {
                    Some((id, score)) => {
                        if let Err(e) = session.record(id, score) {
                            writeln!(out, "{e}")?;
                        }
                    }
                    None => writeln!(out, "Unrecognized input: {other}")?,
                }
            }
        }
    }
}

/// Collect the registration form until it validates. Returns `false` on EOF.
fn register<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    loop {
        let Some(name) = prompt(input, out, "Full name: ")? else {
            return Ok(false);
        };
        let Some(school) = prompt(input, out, "School: ")? else {
            return Ok(false);
        };
        let Some(district) = prompt(input, out, "District: ")? else {
            return Ok(false);
        };
        let Some(mobile) = prompt(input, out, "Mobile number: ")? else {
            return Ok(false);
        };

        let choices: Vec<String> = Board::ALL
            .iter()
            .enumerate()
            .map(|(i, b)| format!("{}) {}", i + 1, b.label()))
            .collect();
        let Some(board_input) = prompt(
            input,
            out,
            &format!("Board [{}] (default 1): ", choices.join(", ")),
        )?
        else {
            return Ok(false);
        };
        let board = match parse_board(&board_input) {
            Some(b) => b,
            None => {
                writeln!(out, "Unknown board: {board_input}")?;
                continue;
            }
        };

        let Some(consent) = prompt(
            input,
            out,
            "I agree to share these details for my assessment (y/n): ",
        )?
        else {
            return Ok(false);
        };

        let profile = RegistrationProfile {
            name,
            school,
            district,
            mobile,
            board,
            consent: matches!(consent.to_lowercase().as_str(), "y" | "yes"),
        };

        match session.register(profile) {
            Ok(()) => {
                writeln!(out)?;
                writeln!(
                    out,
                    "Scale: 1 = {}  3 = {}  5 = {}",
                    anchor(1),
                    anchor(3),
                    anchor(5)
                )?;
                return Ok(true);
            }
            Err(e) => {
                writeln!(out, "{}", e.user_notice())?;
                writeln!(out)?;
            }
        }
    }
}

fn parse_board(s: &str) -> Option<Board> {
    if s.is_empty() {
        return Some(Board::default());
    }
    if let Ok(n) = s.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| Board::ALL.get(i)).copied();
    }
    s.parse().ok()
}

fn anchor(value: u8) -> &'static str {
    LikertScore::new(value)
        .ok()
        .and_then(|s| s.anchor_label())
        .unwrap_or_default()
}

fn print_page_header<W: Write>(timeline: Vec<PageStatus>, page: usize, out: &mut W) -> Result<()> {
    let marks: String = timeline
        .iter()
        .map(|status| match status {
            PageStatus::Completed => "[x]",
            PageStatus::Current => "[>]",
            PageStatus::Upcoming => "[ ]",
        })
        .collect();
    writeln!(out)?;
    writeln!(out, "Page {} of {}  {marks}", page + 1, timeline.len())?;
    Ok(())
}

fn print_results<W: Write>(view: &ResultView, report_url: &str, out: &mut W) -> Result<()> {
    let page = view.render();

    writeln!(out)?;
    writeln!(out, "{}", page.greeting)?;
    writeln!(out, "Your natural path: {}", page.stream_name)?;
    writeln!(out, "{}", page.stream_blurb)?;
    writeln!(out)?;
    writeln!(out, "Dominant trait: {} ({})", page.dominant_trait, page.icon)?;
    writeln!(out, "{}", page.description)?;
    writeln!(out, "Tip: {}", page.suggestion)?;
    writeln!(out)?;
    for score in &page.scores {
        let bar = "#".repeat((score.percent / 5.0).round() as usize);
        writeln!(out, "  {:<14} {:>4}  {bar}", score.trait_name, score.display)?;
    }
    writeln!(out)?;
    writeln!(out, "Full report: {report_url}")?;
    Ok(())
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    read_line(input)
}

/// Read one trimmed line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
