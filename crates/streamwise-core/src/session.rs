//! Assessment session state machine.
//!
//! ```text
//! Registering -> Answering -> Submitting -> ShowingResults
//!                    ^             |
//!                    +-- failure --+
//!
//! (any state except Submitting) -> AdminAuthenticating -> AdminViewing -> Registering
//! ```
//!
//! The session owns the student's profile, response ledger, and scored
//! result for its whole lifetime. Only [`Session::reset`] clears them; a
//! failed submission returns to `Answering` with every answer intact.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{QuestionSetError, ServiceError, SessionError};
use crate::ledger::{LikertScore, ResponseLedger};
use crate::model::{QuestionSet, RegistrationProfile, ScoredResult};
use crate::pagination::Paginator;
use crate::presenter::ResultView;
use crate::traits::{AdminService, ScoringService, StudentRecord, SubmissionRequest};
use crate::ValidationError;

/// Registration details plus questionnaire progress, carried through
/// `Answering` and `Submitting`.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    profile: RegistrationProfile,
    ledger: ResponseLedger,
    paginator: Paginator,
}

impl Questionnaire {
    pub fn profile(&self) -> &RegistrationProfile {
        &self.profile
    }

    pub fn ledger(&self) -> &ResponseLedger {
        &self.ledger
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn can_advance(&self) -> bool {
        self.paginator.can_advance(&self.ledger)
    }

    pub fn can_submit(&self) -> bool {
        self.paginator.can_submit(&self.ledger)
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Registering,
    Answering(Questionnaire),
    /// A scoring request is in flight; navigation and resubmission are locked.
    Submitting(Questionnaire),
    ShowingResults(Box<ResultView>),
    AdminAuthenticating {
        /// Notice from the last rejected attempt, kept for the re-prompt.
        last_error: Option<String>,
    },
    AdminViewing,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Registering => "registering",
            SessionState::Answering(_) => "answering",
            SessionState::Submitting(_) => "submitting",
            SessionState::ShowingResults(_) => "showing results",
            SessionState::AdminAuthenticating { .. } => "admin authenticating",
            SessionState::AdminViewing => "admin viewing",
        }
    }
}

/// One student's (or administrator's) pass through the flow.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    /// Page-0 paginator cloned into each new questionnaire.
    pages: Paginator,
    submission_timeout: Option<Duration>,
    state: SessionState,
}

impl Session {
    /// Start a session in `Registering`.
    pub fn new(questions: Arc<QuestionSet>, page_size: usize) -> Result<Self, QuestionSetError> {
        let pages = Paginator::new(questions, page_size)?;
        let id = Uuid::new_v4();
        debug!(session = %id, items = pages.questions().len(), page_size, "session created");
        Ok(Self {
            id,
            pages,
            submission_timeout: None,
            state: SessionState::Registering,
        })
    }

    /// Bound every scoring exchange; expiry counts as a submission failure.
    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.submission_timeout = Some(timeout);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn questions(&self) -> &QuestionSet {
        self.pages.questions()
    }

    /// Questionnaire progress while answering or submitting.
    pub fn questionnaire(&self) -> Option<&Questionnaire> {
        match &self.state {
            SessionState::Answering(q) | SessionState::Submitting(q) => Some(q),
            _ => None,
        }
    }

    /// The pinned result once scoring has succeeded.
    pub fn result(&self) -> Option<&ResultView> {
        match &self.state {
            SessionState::ShowingResults(view) => Some(&**view),
            _ => None,
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    fn answering_mut(&mut self, action: &'static str) -> Result<&mut Questionnaire, SessionError> {
        let state = self.state.name();
        match &mut self.state {
            SessionState::Answering(q) => Ok(q),
            _ => Err(SessionError::InvalidTransition { action, state }),
        }
    }

    // ── Registration ─────────────────────────────────────────────────

    /// `Registering --submit(profile)--> Answering`.
    pub fn register(&mut self, profile: RegistrationProfile) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Registering) {
            return Err(self.invalid("register"));
        }
        profile.validate()?;

        let paginator = self.pages.clone();
        info!(session = %self.id, board = %profile.board, "student registered");
        self.state = SessionState::Answering(Questionnaire {
            profile,
            ledger: ResponseLedger::new(),
            paginator,
        });
        Ok(())
    }

    // ── Questionnaire ────────────────────────────────────────────────

    /// Record (or change) the answer to one item.
    pub fn record(&mut self, item_id: u32, score: u8) -> Result<(), SessionError> {
        let score = LikertScore::new(score)?;
        if !self.pages.questions().contains(item_id) {
            return Err(ValidationError::UnknownItem(item_id).into());
        }
        let questionnaire = self.answering_mut("record an answer")?;
        questionnaire.ledger.record(item_id, score);
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        match &self.state {
            SessionState::Answering(q) => q.can_advance(),
            _ => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        match &self.state {
            SessionState::Answering(q) => q.can_submit(),
            _ => false,
        }
    }

    /// Next page; `Ok(false)` when gated or already on the last page.
    pub fn advance(&mut self) -> Result<bool, SessionError> {
        let q = self.answering_mut("advance")?;
        Ok(q.paginator.advance(&q.ledger))
    }

    /// Previous page; `Ok(false)` on the first page.
    pub fn retreat(&mut self) -> Result<bool, SessionError> {
        let q = self.answering_mut("go back")?;
        Ok(q.paginator.retreat())
    }

    // ── Submission ───────────────────────────────────────────────────

    /// `Answering --completeAll--> Submitting`, returning the request to send.
    ///
    /// Rejected while a submission is already in flight.
    pub fn begin_submission(&mut self) -> Result<SubmissionRequest, SessionError> {
        let missing = match &self.state {
            SessionState::Answering(q) => q.paginator.missing(&q.ledger),
            _ => return Err(self.invalid("submit")),
        };
        if missing > 0 {
            return Err(SessionError::Incomplete { missing });
        }

        let SessionState::Answering(q) =
            std::mem::replace(&mut self.state, SessionState::Registering)
        else {
            unreachable!("state checked above");
        };
        let request = SubmissionRequest {
            student_info: q.profile.clone(),
            responses: q.ledger.clone(),
        };
        debug!(session = %self.id, answers = q.ledger.len(), "submission started");
        self.state = SessionState::Submitting(q);
        Ok(request)
    }

    /// Apply the outcome of the in-flight submission.
    ///
    /// Success pins the result (drawing its narrative variation from `rng`)
    /// and moves to `ShowingResults`. Failure moves back to `Answering` with
    /// the ledger and current page untouched and returns the error.
    pub fn complete_submission<R: Rng + ?Sized>(
        &mut self,
        outcome: Result<ScoredResult, ServiceError>,
        rng: &mut R,
    ) -> Result<&ResultView, SessionError> {
        if !matches!(self.state, SessionState::Submitting(_)) {
            return Err(self.invalid("complete a submission"));
        }
        let SessionState::Submitting(q) =
            std::mem::replace(&mut self.state, SessionState::Registering)
        else {
            unreachable!("state checked above");
        };

        match outcome {
            Ok(scored) => {
                info!(
                    session = %self.id,
                    report_id = %scored.report_id,
                    dominant_trait = %scored.dominant_trait,
                    stream = %scored.suggested_stream,
                    "submission scored"
                );
                let view = ResultView::new(q.profile, scored, rng);
                self.state = SessionState::ShowingResults(Box::new(view));
                match &self.state {
                    SessionState::ShowingResults(view) => Ok(&**view),
                    _ => unreachable!("state just set"),
                }
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "submission failed, back to questionnaire");
                self.state = SessionState::Answering(q);
                Err(SessionError::Submission(err))
            }
        }
    }

    /// Run a whole submission against `service`.
    pub async fn submit(
        &mut self,
        service: &dyn ScoringService,
    ) -> Result<&ResultView, SessionError> {
        let mut rng = StdRng::from_entropy();
        self.submit_with_rng(service, &mut rng).await
    }

    /// [`Session::submit`] with a caller-supplied RNG for the variation draw.
    pub async fn submit_with_rng<R: Rng + Send + ?Sized>(
        &mut self,
        service: &dyn ScoringService,
        rng: &mut R,
    ) -> Result<&ResultView, SessionError> {
        let request = self.begin_submission()?;
        debug!(session = %self.id, service = service.name(), "sending to scoring service");

        let outcome = match self.submission_timeout {
            Some(limit) => tokio::time::timeout(limit, service.submit(&request))
                .await
                .unwrap_or(Err(ServiceError::timeout(limit))),
            None => service.submit(&request).await,
        };
        self.complete_submission(outcome, rng)
    }

    // ── Admin branch ─────────────────────────────────────────────────

    /// Enter the admin branch. Any student progress is dropped.
    pub fn enter_admin(&mut self) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Submitting(_)) {
            return Err(self.invalid("enter admin"));
        }
        if !matches!(
            self.state,
            SessionState::Registering | SessionState::AdminAuthenticating { .. }
        ) {
            debug!(session = %self.id, from = self.state.name(), "leaving student flow for admin");
        }
        self.state = SessionState::AdminAuthenticating { last_error: None };
        Ok(())
    }

    /// Apply a login outcome while in `AdminAuthenticating`.
    pub fn complete_authentication(
        &mut self,
        outcome: Result<(), ServiceError>,
    ) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::AdminAuthenticating { .. }) {
            return Err(self.invalid("authenticate"));
        }
        match outcome {
            Ok(()) => {
                info!(session = %self.id, "admin authenticated");
                self.state = SessionState::AdminViewing;
                Ok(())
            }
            Err(err) => {
                let error = if err.is_credential_rejection() {
                    SessionError::InvalidCredential(err.to_string())
                } else {
                    SessionError::Admin(err)
                };
                warn!(session = %self.id, error = %error, "admin login failed");
                self.state = SessionState::AdminAuthenticating {
                    last_error: Some(error.user_notice().to_string()),
                };
                Err(error)
            }
        }
    }

    /// Check `password` against `service`.
    pub async fn authenticate(
        &mut self,
        service: &dyn AdminService,
        password: &str,
    ) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::AdminAuthenticating { .. }) {
            return Err(self.invalid("authenticate"));
        }
        let outcome = service.login(password).await;
        self.complete_authentication(outcome)
    }

    /// Read the persisted records; only available while `AdminViewing`.
    pub async fn fetch_students(
        &self,
        service: &dyn AdminService,
    ) -> Result<Vec<StudentRecord>, SessionError> {
        if !matches!(self.state, SessionState::AdminViewing) {
            return Err(self.invalid("list students"));
        }
        service.list_students().await.map_err(SessionError::Admin)
    }

    /// `AdminViewing --logout--> Registering`.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::AdminViewing) {
            return Err(self.invalid("log out"));
        }
        info!(session = %self.id, "admin logged out");
        self.state = SessionState::Registering;
        Ok(())
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Drop all per-session data and start over in `Registering`.
    pub fn reset(&mut self) {
        let previous = self.id;
        self.id = Uuid::new_v4();
        self.state = SessionState::Registering;
        debug!(previous = %previous, session = %self.id, "session reset");
    }
}
