//! End-to-end session scenarios: the state machine driven against the HTTP
//! client and a mocked backend.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use streamwise_client::mock::{MockAdminService, MockScoringService};
use streamwise_client::{HttpAdminClient, HttpScoringClient};
use streamwise_core::content::{self, DEFAULT_TRAIT};
use streamwise_core::model::{Board, QuestionItem, QuestionSet, RegistrationProfile};
use streamwise_core::session::{Session, SessionState};
use streamwise_core::{ReportId, ScoredResult, ServiceError, SessionError};

fn question_set(n: u32) -> Arc<QuestionSet> {
    let items = (1..=n)
        .map(|id| QuestionItem {
            id,
            text: format!("statement {id}"),
        })
        .collect();
    Arc::new(QuestionSet::new(items).unwrap())
}

fn asha() -> RegistrationProfile {
    RegistrationProfile {
        name: "Asha".into(),
        school: "X".into(),
        district: "Y".into(),
        mobile: "999".into(),
        board: Board::Cbse,
        consent: true,
    }
}

fn answer_all(session: &mut Session) {
    let ids: Vec<u32> = session.questions().items().iter().map(|q| q.id).collect();
    for id in ids {
        session.record(id, (id % 5 + 1) as u8).unwrap();
    }
}

fn scored_body(id: u64, dominant: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "scores": {
            "Realistic": 62.0, "Investigative": 88.0, "Artistic": 40.0,
            "Social": 54.0, "Enterprising": 36.0, "Conventional": 48.0
        },
        "dominant_trait": dominant,
        "suggested_stream": "Science"
    })
}

#[test]
fn scenario_a_page_gating_on_23_items() {
    let mut session = Session::new(question_set(23), 10).unwrap();
    session.register(asha()).unwrap();

    let pages = session.questionnaire().unwrap().paginator().page_count();
    assert_eq!(pages, 3);

    for id in 1..=9 {
        session.record(id, 3).unwrap();
    }
    assert!(!session.can_advance());

    session.record(10, 3).unwrap();
    assert!(session.can_advance());
    assert_eq!(session.advance(), Ok(true));

    let last_page = session
        .questionnaire()
        .unwrap()
        .paginator()
        .questions_for_page(2)
        .len();
    assert_eq!(last_page, 3);
}

#[tokio::test]
async fn scenario_b_successful_submission_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scored_body(57, "Investigative")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpScoringClient::new(&server.uri(), Duration::from_secs(5));
    let mut session = Session::new(question_set(23), 10).unwrap();
    session.register(asha()).unwrap();
    answer_all(&mut session);
    assert!(session.can_submit());

    let view = session.submit(&client).await.unwrap();
    assert_eq!(view.report_id(), &ReportId::new("57"));
    assert_eq!(view.profile().board, Board::Cbse);
    assert!(matches!(session.state(), SessionState::ShowingResults(_)));

    let page = session.result().unwrap().render();
    assert_eq!(page.trait_name, "Investigative");
    assert_eq!(page.scores[1].display, "88%");
}

#[tokio::test]
async fn scenario_c_network_failure_then_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scored_body(58, "Social")))
        .mount(&server)
        .await;

    let client = HttpScoringClient::new(&server.uri(), Duration::from_secs(5));
    let mut session = Session::new(question_set(23), 10).unwrap();
    session.register(asha()).unwrap();
    answer_all(&mut session);
    let before = session.questionnaire().unwrap().ledger().clone();

    let err = session.submit(&client).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Submission(ServiceError::Api { status: 503, .. })
    ));
    assert!(matches!(session.state(), SessionState::Answering(_)));
    assert!(session.can_submit());
    assert_eq!(session.questionnaire().unwrap().ledger(), &before);

    let view = session.submit(&client).await.unwrap();
    assert_eq!(view.report_id().as_str(), "58");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn scenario_c_transport_failure_keeps_ledger() {
    // Nothing listens on the discard port.
    let client = HttpScoringClient::new("http://127.0.0.1:9", Duration::from_secs(2));
    let mut session = Session::new(question_set(5), 10).unwrap();
    session.register(asha()).unwrap();
    answer_all(&mut session);

    let err = session.submit(&client).await.unwrap_err();
    assert!(matches!(err, SessionError::Submission(_)));
    assert!(session.can_submit());

    let retry = MockScoringService::default();
    session.submit(&retry).await.unwrap();
    assert_eq!(retry.call_count(), 1);
    assert_eq!(retry.last_request().unwrap().responses.len(), 5);
}

#[tokio::test]
async fn scenario_d_unknown_trait_degrades_to_default() {
    let service = MockScoringService::with_result(ScoredResult {
        report_id: ReportId::new("9"),
        scores: Default::default(),
        dominant_trait: "Unknown".into(),
        suggested_stream: "Underwater Basket Weaving".into(),
    });
    let mut session = Session::new(question_set(4), 10).unwrap();
    session.register(asha()).unwrap();
    answer_all(&mut session);

    let mut rng = StdRng::seed_from_u64(2024);
    let view = session.submit_with_rng(&service, &mut rng).await.unwrap();
    let page = view.render();

    let default = content::lookup(DEFAULT_TRAIT).unwrap();
    assert_eq!(page.icon, default.icon);
    assert!(default.variations.contains(view.variation()));
    assert_eq!(page.stream.key(), "commerce");
    assert_eq!(view.render(), page);
}

#[tokio::test]
async fn admin_branch_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Invalid password"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "success"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/admin/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let admin = HttpAdminClient::new(&server.uri(), Duration::from_secs(5));
    let mut session = Session::new(question_set(4), 10).unwrap();
    session.enter_admin().unwrap();

    let err = session.authenticate(&admin, "guess").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidCredential(_)));
    assert!(matches!(
        session.state(),
        SessionState::AdminAuthenticating { last_error: Some(_) }
    ));

    session.authenticate(&admin, "right").await.unwrap();
    assert!(session.fetch_students(&admin).await.unwrap().is_empty());
    session.logout().unwrap();
    assert!(matches!(session.state(), SessionState::Registering));
}

#[tokio::test]
async fn admin_entry_discards_student_progress() {
    let admin = MockAdminService::new("pw", vec![]);
    let mut session = Session::new(question_set(4), 10).unwrap();
    session.register(asha()).unwrap();
    session.record(1, 5).unwrap();

    session.enter_admin().unwrap();
    session.authenticate(&admin, "pw").await.unwrap();
    session.logout().unwrap();

    session.register(asha()).unwrap();
    assert!(session.questionnaire().unwrap().ledger().is_empty());
}
