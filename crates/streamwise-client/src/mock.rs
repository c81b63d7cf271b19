//! Mock services for testing.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use streamwise_core::traits::{AdminService, ScoringService, StudentRecord, SubmissionRequest};
use streamwise_core::{ReportId, ScoredResult, ServiceError};

/// A mock scoring service for exercising sessions without a network.
///
/// Queued outcomes are returned in order; once the queue is empty every call
/// succeeds with the default result.
pub struct MockScoringService {
    queued: Mutex<VecDeque<Result<ScoredResult, ServiceError>>>,
    default_result: ScoredResult,
    call_count: AtomicU32,
    last_request: Mutex<Option<SubmissionRequest>>,
}

impl MockScoringService {
    /// Create a mock that always succeeds with `result`.
    pub fn with_result(result: ScoredResult) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            default_result: result,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Queue a one-off outcome ahead of the default.
    pub fn then(self, outcome: Result<ScoredResult, ServiceError>) -> Self {
        self.queued.lock().unwrap().push_back(outcome);
        self
    }

    /// Queue a one-off failure ahead of the default.
    pub fn then_fail(self, error: ServiceError) -> Self {
        self.then(Err(error))
    }

    /// Get the number of calls made to this service.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this service.
    pub fn last_request(&self) -> Option<SubmissionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockScoringService {
    fn default() -> Self {
        let mut scores = BTreeMap::new();
        scores.insert("Realistic".to_string(), 50.0);
        scores.insert("Investigative".to_string(), 80.0);
        scores.insert("Artistic".to_string(), 40.0);
        scores.insert("Social".to_string(), 60.0);
        scores.insert("Enterprising".to_string(), 30.0);
        scores.insert("Conventional".to_string(), 20.0);
        Self::with_result(ScoredResult {
            report_id: ReportId::new("1"),
            scores,
            dominant_trait: "Investigative".into(),
            suggested_stream: "Science".into(),
        })
    }
}

#[async_trait]
impl ScoringService for MockScoringService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, request: &SubmissionRequest) -> Result<ScoredResult, ServiceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_result.clone()))
    }

    fn report_url(&self, report_id: &ReportId) -> String {
        format!("mock://report/{report_id}")
    }

    async fn download_report(&self, report_id: &ReportId) -> Result<Vec<u8>, ServiceError> {
        Ok(format!("report {report_id}").into_bytes())
    }
}

/// A mock admin service with a fixed password and record list.
pub struct MockAdminService {
    password: String,
    students: Vec<StudentRecord>,
}

impl MockAdminService {
    pub fn new(password: &str, students: Vec<StudentRecord>) -> Self {
        Self {
            password: password.to_string(),
            students,
        }
    }
}

#[async_trait]
impl AdminService for MockAdminService {
    async fn login(&self, password: &str) -> Result<(), ServiceError> {
        if password == self.password {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized("Invalid password".into()))
        }
    }

    async fn list_students(&self) -> Result<Vec<StudentRecord>, ServiceError> {
        Ok(self.students.clone())
    }

    fn export_csv_url(&self) -> String {
        "mock://export-csv".into()
    }

    async fn export_csv(&self) -> Result<Vec<u8>, ServiceError> {
        let mut csv = String::from("ID,Name,School,District,Mobile,Board,Dominant Trait\n");
        for s in &self.students {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                s.id, s.name, s.school, s.district, s.mobile, s.board, s.trait_dominance
            ));
        }
        Ok(csv.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamwise_core::ledger::ResponseLedger;
    use streamwise_core::model::{Board, RegistrationProfile};

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            student_info: RegistrationProfile {
                name: "Asha".into(),
                school: "X".into(),
                district: "Y".into(),
                mobile: "999".into(),
                board: Board::Sslc,
                consent: true,
            },
            responses: ResponseLedger::new(),
        }
    }

    #[tokio::test]
    async fn queued_outcomes_then_default() {
        let service = MockScoringService::default().then_fail(ServiceError::Timeout(30));

        assert_eq!(
            service.submit(&request()).await,
            Err(ServiceError::Timeout(30))
        );
        let scored = service.submit(&request()).await.unwrap();
        assert_eq!(scored.dominant_trait, "Investigative");
        assert_eq!(service.call_count(), 2);
        assert_eq!(service.last_request().unwrap().student_info.name, "Asha");
    }

    #[tokio::test]
    async fn admin_password_check() {
        let admin = MockAdminService::new("pw", vec![]);
        assert!(admin.login("pw").await.is_ok());
        assert!(admin
            .login("nope")
            .await
            .unwrap_err()
            .is_credential_rejection());
        let csv = admin.export_csv().await.unwrap();
        assert!(String::from_utf8(csv).unwrap().starts_with("ID,Name"));
    }
}
