//! Error types for the assessment flow.
//!
//! Nothing here is fatal to a session: every variant describes a failure the
//! state machine recovers from by staying in, or returning to, a valid state.

use std::time::Duration;

use thiserror::Error;

/// Registration or answer input rejected before it reaches the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required registration field was empty or whitespace.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The consent box was not ticked.
    #[error("consent is required to start the assessment")]
    ConsentRequired,

    /// A Likert answer outside 1..=5.
    #[error("score {0} is outside the 1-5 scale")]
    ScoreOutOfRange(u8),

    /// An answer for an item that is not in the question set.
    #[error("unknown question id: {0}")]
    UnknownItem(u32),

    /// A board name that is not SSLC, CBSE or ICSE.
    #[error("unknown board: {0}")]
    UnknownBoard(String),
}

/// Failure talking to the remote scoring or admin service.
///
/// Every transport, timeout, or server-reported failure collapses into one of
/// these; there is no partial outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The exchange did not finish within the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered 2xx but the body did not match the contract.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The service rejected the supplied credential (HTTP 401/403).
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl ServiceError {
    /// Timeout for an exchange limited to `limit`, in whole seconds rounded up.
    pub fn timeout(limit: Duration) -> Self {
        let secs = limit.as_secs() + u64::from(limit.subsec_nanos() > 0);
        ServiceError::Timeout(secs)
    }

    /// Returns `true` if the service rejected the credential itself, as
    /// opposed to failing to answer.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, ServiceError::Unauthorized(_))
    }
}

/// Failure building a question set or its pagination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionSetError {
    #[error("question set is empty")]
    Empty,

    #[error("duplicate question id: {0}")]
    DuplicateId(u32),

    #[error("question {0} has no text")]
    BlankText(u32),

    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Errors surfaced by [`crate::session::Session`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The action is not defined for the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Submission attempted with unanswered items.
    #[error("{missing} question(s) still unanswered")]
    Incomplete { missing: usize },

    /// The scoring exchange failed; the session is back in `Answering`.
    #[error("submission failed: {0}")]
    Submission(#[source] ServiceError),

    /// The admin credential was rejected; the session stays in
    /// `AdminAuthenticating`.
    #[error("invalid admin credential: {0}")]
    InvalidCredential(String),

    /// The admin service could not be reached or failed.
    #[error("admin service error: {0}")]
    Admin(#[source] ServiceError),
}

impl SessionError {
    /// Short notice suitable for showing to the student or administrator.
    pub fn user_notice(&self) -> &'static str {
        match self {
            SessionError::Submission(_) => "Oops! Our cosmic connection failed. Please try again.",
            SessionError::InvalidCredential(_) => "Invalid password. Access denied.",
            SessionError::Admin(_) => "Could not reach the admin service. Please try again.",
            SessionError::Validation(ValidationError::ConsentRequired) => {
                "Please tick the consent box to continue."
            }
            SessionError::Validation(_) => "Please fill in all the required details.",
            SessionError::Incomplete { .. } => "Please answer every question before submitting.",
            SessionError::InvalidTransition { .. } => "That action is not available right now.",
        }
    }
}
