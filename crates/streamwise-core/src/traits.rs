//! Service traits for the remote collaborators.
//!
//! The scoring service and the admin service are owned elsewhere; the core
//! only talks to them through these async traits, implemented over HTTP in
//! `streamwise-client`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::ledger::ResponseLedger;
use crate::model::{RegistrationProfile, ReportId};
use crate::ScoredResult;

// ---------------------------------------------------------------------------
// Scoring service
// ---------------------------------------------------------------------------

/// Remote service that scores a completed questionnaire.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Human-readable backend name, for logs.
    fn name(&self) -> &str;

    /// Score one submission. Exactly one outcome per call.
    async fn submit(&self, request: &SubmissionRequest) -> Result<ScoredResult, ServiceError>;

    /// Link to the downloadable report document.
    fn report_url(&self, report_id: &ReportId) -> String;

    /// Fetch the report document bytes.
    async fn download_report(&self, report_id: &ReportId) -> Result<Vec<u8>, ServiceError>;
}

/// Body of a scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub student_info: RegistrationProfile,
    pub responses: ResponseLedger,
}

// ---------------------------------------------------------------------------
// Admin service
// ---------------------------------------------------------------------------

/// Remote service holding submitted records, behind an admin credential.
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Check the admin password. `ServiceError::Unauthorized` on rejection.
    async fn login(&self, password: &str) -> Result<(), ServiceError>;

    /// All persisted student records, in server order.
    async fn list_students(&self) -> Result<Vec<StudentRecord>, ServiceError>;

    /// Link to the CSV export.
    fn export_csv_url(&self) -> String;

    /// Fetch the CSV export bytes.
    async fn export_csv(&self) -> Result<Vec<u8>, ServiceError>;
}

/// A persisted submission as listed on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: ReportId,
    pub name: String,
    pub school: String,
    pub district: String,
    pub mobile: String,
    pub board: String,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
    /// Dominant trait recorded at scoring time.
    #[serde(default)]
    pub trait_dominance: String,
}
