mod common;

use assert_matches::assert_matches;
use axum::http::Method;
use serde_json::json;

use legalease_client::detail::{ActionFailure, DetailState, DocumentDetail};
use legalease_core::abstract_view::{SectionKind, NO_DATA_PENDING, NO_DATA_TITLE};
use legalease_core::export::ExportFormat;
use legalease_core::session::LOGIN_ROUTE;

use common::{completed_document_json, document_json, signed_in, signed_out, MockBackend};

async fn loaded(mock: &MockBackend, id: &str) -> DocumentDetail {
    let mut detail = DocumentDetail::new(mock.api(), signed_in(), id);
    assert_matches!(detail.load().await, DetailState::Loaded(_));
    detail
}

// ---------------------------------------------------------------------------
// Test: fetch-by-id outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completed_document_renders_sections() {
    let mock = MockBackend::start().await;
    mock.respond_json(Method::GET, "/documents/doc-1", 200, completed_document_json("doc-1"));

    let detail = loaded(&mock, "doc-1").await;
    let view = detail.view().unwrap();

    assert_eq!(
        view.section_kinds(),
        [
            SectionKind::Parties,
            SectionKind::LeaseTerm,
            SectionKind::Rent,
            SectionKind::Options,
            SectionKind::PermittedUse
        ]
    );
    assert_eq!(
        view.summary.as_deref(),
        Some("Ten-year office lease with two renewal options.")
    );
    let text = view.to_string();
    assert!(text.contains("Acme Properties LLC"));
    assert!(text.contains("General office use"));
    assert!(!text.contains(NO_DATA_TITLE));
}

#[tokio::test]
async fn processing_document_without_data_shows_pending_notice() {
    let mock = MockBackend::start().await;
    mock.respond_json(
        Method::GET,
        "/documents/doc-2",
        200,
        document_json("doc-2", "processing", "2024-03-01T10:00:00"),
    );

    let detail = loaded(&mock, "doc-2").await;
    let view = detail.view().unwrap();

    assert!(view.sections.is_empty());
    let text = view.to_string();
    assert!(text.contains(NO_DATA_TITLE));
    assert!(text.contains(NO_DATA_PENDING));
}

#[tokio::test]
async fn unauthorized_fetch_redirects_to_login() {
    let mock = MockBackend::start().await;
    mock.fail(Method::GET, "/documents/doc-1", 401, "Could not validate credentials");

    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "doc-1");
    assert_eq!(detail.load().await, &DetailState::RedirectToLogin(LOGIN_ROUTE));
}

#[tokio::test]
async fn missing_token_redirects_without_a_call() {
    let mock = MockBackend::start().await;

    let mut detail = DocumentDetail::new(mock.api(), signed_out(), "doc-1");
    assert_matches!(detail.load().await, DetailState::RedirectToLogin("/login"));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn other_failures_show_status_code() {
    let mock = MockBackend::start().await;
    mock.fail(Method::GET, "/documents/missing", 404, "Document not found");

    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "missing");
    assert_matches!(
        detail.load().await,
        DetailState::Unavailable { message } if message == "Failed to fetch document: 404"
    );
    assert!(detail.view().is_none());
}

#[tokio::test]
async fn malformed_body_is_caught() {
    let mock = MockBackend::start().await;
    mock.respond_json(Method::GET, "/documents/doc-1", 200, json!({"unexpected": true}));

    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "doc-1");
    assert_matches!(detail.load().await, DetailState::Unavailable { .. });
}

// ---------------------------------------------------------------------------
// Test: feedback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn thumbs_up_posts_positive_feedback_and_sets_notice() {
    let mock = MockBackend::start().await;
    mock.respond_json(Method::GET, "/documents/doc-1", 200, completed_document_json("doc-1"));
    mock.respond_json(
        Method::POST,
        "/documents/doc-1/feedback",
        200,
        json!({"message": "Thank you for your feedback!"}),
    );

    let mut detail = loaded(&mock, "doc-1").await;
    detail.thumbs_up().await.unwrap();

    let sent = mock.calls_to(Method::POST, "/documents/doc-1/feedback");
    assert_eq!(sent[0].json(), json!({"type": "thumbs_up", "is_positive": true}));
    assert_eq!(
        detail.notice().map(|n| n.message.as_str()),
        Some("Thank you for your feedback!")
    );
}

#[tokio::test]
async fn thumbs_down_posts_negative_feedback() {
    let mock = MockBackend::start().await;
    mock.respond_json(
        Method::POST,
        "/documents/doc-1/feedback",
        200,
        json!({"message": "Thanks"}),
    );

    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "doc-1");
    detail.thumbs_down().await.unwrap();

    let sent = mock.calls_to(Method::POST, "/documents/doc-1/feedback");
    assert_eq!(sent[0].json(), json!({"type": "thumbs_down", "is_positive": false}));
}

#[tokio::test]
async fn error_report_sends_comment() {
    let mock = MockBackend::start().await;
    mock.respond_json(
        Method::POST,
        "/documents/doc-1/feedback",
        200,
        json!({"message": "Error report received"}),
    );

    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "doc-1");
    assert!(detail.report_error(Some("Tenant name is wrong")).await.unwrap());

    let sent = mock.calls_to(Method::POST, "/documents/doc-1/feedback");
    assert_eq!(
        sent[0].json(),
        json!({"type": "error_report", "comment": "Tenant name is wrong"})
    );
    assert!(detail.notice().is_some());
}

#[tokio::test]
async fn empty_error_report_makes_no_call() {
    let mock = MockBackend::start().await;

    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "doc-1");
    assert!(!detail.report_error(Some("")).await.unwrap());
    assert!(!detail.report_error(None).await.unwrap());

    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn feedback_failures_alert_by_kind() {
    let mock = MockBackend::start().await;
    mock.fail(Method::POST, "/documents/doc-1/feedback", 500, "boom");

    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "doc-1");

    let err = detail.thumbs_up().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to submit feedback. Please try again.");
    assert_matches!(err.source, ActionFailure::Api(_));

    let err = detail.report_error(Some("wrong date")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to submit error report. Please try again.");
    assert!(detail.notice().is_none());
}

// ---------------------------------------------------------------------------
// Test: export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exports_are_saved_under_document_filename() {
    let mock = MockBackend::start().await;
    mock.respond_json(Method::GET, "/documents/doc-1", 200, completed_document_json("doc-1"));
    mock.respond_bytes(Method::GET, "/documents/doc-1/download/pdf", 200, b"%PDF-1.7 abstract");
    mock.respond_bytes(Method::GET, "/documents/doc-1/download/markdown", 200, b"# Lease Abstract");

    let dir = tempfile::tempdir().unwrap();
    let mut detail = loaded(&mock, "doc-1").await;

    detail.toggle_menu();
    let pdf = detail.export(ExportFormat::Pdf, dir.path()).await.unwrap();
    assert!(!detail.menu().is_open());
    let md = detail.export(ExportFormat::Markdown, dir.path()).await.unwrap();

    assert_eq!(pdf, dir.path().join("doc-1.pdf.pdf"));
    assert_eq!(md, dir.path().join("doc-1.pdf.md"));
    assert_eq!(std::fs::read(&pdf).unwrap(), b"%PDF-1.7 abstract");
    assert_eq!(std::fs::read(&md).unwrap(), b"# Lease Abstract");
}

#[tokio::test]
async fn export_name_cannot_leave_the_export_directory() {
    let outside = tempfile::tempdir().unwrap();
    let absolute = outside.path().join("escaped").to_string_lossy().into_owned();

    for filename in [absolute.as_str(), "../escaped", "/abs/escaped"] {
        let mock = MockBackend::start().await;
        let mut doc = completed_document_json("doc-1");
        doc["filename"] = json!(filename);
        mock.respond_json(Method::GET, "/documents/doc-1", 200, doc);
        mock.respond_bytes(Method::GET, "/documents/doc-1/download/pdf", 200, b"%PDF-1.7");

        let dir = tempfile::tempdir().unwrap();
        let mut detail = loaded(&mock, "doc-1").await;
        let path = detail.export(ExportFormat::Pdf, dir.path()).await.unwrap();

        assert_eq!(path, dir.path().join("escaped.pdf"), "filename {filename}");
        assert!(path.exists());
    }
    assert!(!outside.path().join("escaped.pdf").exists());
}

#[tokio::test]
async fn export_without_loaded_document_uses_default_name() {
    let mock = MockBackend::start().await;
    let id = uuid::Uuid::new_v4().to_string();
    mock.respond_bytes(
        Method::GET,
        &format!("/documents/{id}/download/markdown"),
        200,
        b"# Abstract",
    );

    let dir = tempfile::tempdir().unwrap();
    let mut detail = DocumentDetail::new(mock.api(), signed_in(), id);
    let path = detail.export(ExportFormat::Markdown, dir.path()).await.unwrap();

    assert_eq!(path, dir.path().join("lease-abstract.md"));
}

#[tokio::test]
async fn failed_export_alerts_and_writes_nothing() {
    let mock = MockBackend::start().await;
    mock.fail(Method::GET, "/documents/doc-1/download/pdf", 500, "renderer crashed");

    let dir = tempfile::tempdir().unwrap();
    let mut detail = DocumentDetail::new(mock.api(), signed_in(), "doc-1");
    let err = detail.export(ExportFormat::Pdf, dir.path()).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to download PDF. Please try again.");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
