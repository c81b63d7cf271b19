//! Session state machine, pagination, and result presentation for streamwise.
//!
//! This crate defines the data model, the response ledger, page gating, the
//! session state machine, and the result presenter that the rest of
//! streamwise builds on. It performs no network I/O itself; remote scoring
//! and admin access go through the traits in [`traits`].

pub mod content;
pub mod error;
pub mod ledger;
pub mod model;
pub mod pagination;
pub mod parser;
pub mod presenter;
pub mod session;
pub mod traits;

pub use error::{QuestionSetError, ServiceError, SessionError, ValidationError};
pub use ledger::{LikertScore, ResponseLedger};
pub use model::{Board, QuestionItem, QuestionSet, RegistrationProfile, ReportId, ScoredResult};
pub use pagination::Paginator;
pub use session::{Session, SessionState};
