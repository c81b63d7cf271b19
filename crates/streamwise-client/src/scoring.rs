//! HTTP client for the remote scoring service.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use streamwise_core::traits::{ScoringService, SubmissionRequest};
use streamwise_core::{ReportId, ScoredResult, ServiceError};

use crate::transport::Transport;

/// Scoring service reached over HTTP.
///
/// `POST /api/submit` scores a questionnaire; `GET /api/report/{id}` serves
/// the report document.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    transport: Transport,
}

impl HttpScoringClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            transport: Transport::new(base_url, timeout),
        }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(answers = request.responses.len()))]
    async fn submit(&self, request: &SubmissionRequest) -> Result<ScoredResult, ServiceError> {
        let response = self
            .transport
            .send(
                self.transport
                    .client()
                    .post(self.transport.url("/api/submit"))
                    .json(request),
            )
            .await?;

        let scored: ScoredResult = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse(format!("failed to parse score: {e}")))?;

        debug!(report_id = %scored.report_id, traits = scored.scores.len(), "scored");
        Ok(scored)
    }

    fn report_url(&self, report_id: &ReportId) -> String {
        self.transport.url(&format!("/api/report/{report_id}"))
    }

    #[instrument(skip(self), fields(report_id = %report_id))]
    async fn download_report(&self, report_id: &ReportId) -> Result<Vec<u8>, ServiceError> {
        let response = self
            .transport
            .send(self.transport.client().get(self.report_url(report_id)))
            .await?;
        self.transport.bytes(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamwise_core::ledger::{LikertScore, ResponseLedger};
    use streamwise_core::model::{Board, RegistrationProfile};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> SubmissionRequest {
        let mut responses = ResponseLedger::new();
        for id in 1..=3 {
            responses.record(id, LikertScore::new(4).unwrap());
        }
        SubmissionRequest {
            student_info: RegistrationProfile {
                name: "Asha".into(),
                school: "X".into(),
                district: "Y".into(),
                mobile: "999".into(),
                board: Board::Cbse,
                consent: true,
            },
            responses,
        }
    }

    fn client(server: &MockServer) -> HttpScoringClient {
        HttpScoringClient::new(&server.uri(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn successful_submission() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "id": 12,
            "scores": {"Realistic": 60.0, "Social": 82.0},
            "dominant_trait": "Social",
            "suggested_stream": "Arts"
        });

        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .and(body_partial_json(serde_json::json!({
                "student_info": {"name": "Asha", "board": "CBSE"},
                "responses": {"1": 4, "2": 4, "3": 4}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let scored = client(&server).submit(&request()).await.unwrap();
        assert_eq!(scored.report_id.as_str(), "12");
        assert_eq!(scored.dominant_trait, "Social");
        assert_eq!(scored.scores["Social"], 82.0);
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({"detail": "db locked"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Api {
                status: 500,
                message: "db locked".into()
            }
        );
    }

    #[tokio::test]
    async fn null_names_still_score() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 13,
                "scores": {"Social": 50.0},
                "dominant_trait": null,
                "suggested_stream": null
            })))
            .mount(&server)
            .await;

        let scored = client(&server).submit(&request()).await.unwrap();
        assert_eq!(scored.report_id.as_str(), "13");
        assert!(scored.dominant_trait.is_empty());
        assert!(scored.suggested_stream.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).submit(&request()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = HttpScoringClient::new(&server.uri(), Duration::from_millis(200));
        let err = client.submit(&request()).await.unwrap_err();
        assert_eq!(err, ServiceError::Timeout(1));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let client = HttpScoringClient::new("http://127.0.0.1:9", Duration::from_secs(2));
        let err = client.submit(&request()).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::Network(_) | ServiceError::Timeout(_)),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn report_download() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/report/12"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(b"%PDF-1.4 fake".to_vec()),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let id = ReportId::new("12");
        assert_eq!(client.report_url(&id), format!("{}/api/report/12", server.uri()));
        let bytes = client.download_report(&id).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn missing_report_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/report/99"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "Student not found"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .download_report(&ReportId::new("99"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Api {
                status: 404,
                message: "Student not found".into()
            }
        );
    }
}
