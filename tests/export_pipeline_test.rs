//! Export pipeline and audit trail over real collections

mod helpers;

use assert_matches::assert_matches;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use community_portal::database::ExportHistoryStore;
use community_portal::models::{AdminRole, Collection, ExportRecord, ExportStatus, Registration};
use community_portal::services::{ClientInfo, ExportOptions};
use community_portal::utils::errors::{ExportError, PortalError};
use helpers::*;
use serde_json::{json, Map};
use std::io::Cursor;

fn options(format: &str, export_type: &str, role: AdminRole, fields: &[&str]) -> ExportOptions {
    ExportOptions {
        format: format.to_string(),
        filename: format!("{}_report", export_type),
        selected_fields: fields.iter().map(|f| f.to_string()).collect(),
        export_type: export_type.to_string(),
        title: Some(format!("{} report", export_type)),
        acting_admin: principal(role),
        filters: Map::new(),
        client: ClientInfo {
            ip_address: Some("10.0.0.7".to_string()),
            user_agent: Some("integration-test".to_string()),
        },
    }
}

async fn registration_records(ctx: &TestContext) -> Vec<ExportRecord> {
    let event = ctx.create_event("Intro to Rust", 10, standard_form_config()).await;
    let workflow = &ctx.services().registration_workflow;

    workflow
        .register_for_event(event.id, submission("Asha", "asha@college.test", "2"), &event.form_config)
        .await
        .unwrap();

    workflow
        .event_registrations(event.id)
        .await
        .unwrap()
        .iter()
        .map(Registration::to_record)
        .collect()
}

#[tokio::test]
async fn test_registration_csv_uses_display_years() {
    let ctx = TestContext::new();
    let records = registration_records(&ctx).await;

    let artifact = ctx
        .services()
        .export_service
        .export_with_history(&records, options("csv", "registrations", AdminRole::Admin, &["name", "year"]))
        .await
        .unwrap();

    let csv = String::from_utf8(artifact.bytes).unwrap();
    assert_eq!(csv, "\"Name\",\"Year\"\n\"Asha\",\"2nd Year\"");
    assert_eq!(artifact.filename, "registrations_report.csv");
    assert_eq!(artifact.record_count, 1);
}

#[tokio::test]
async fn test_feedback_html_is_escaped_and_audited() {
    let ctx = TestContext::new();
    let submissions = &ctx.services().submission_service;
    submissions
        .submit_feedback(feedback_document("<b>Mallory</b>", "mallory@college.test"))
        .await
        .unwrap();
    let records = submissions.documents(Collection::Feedback).await.unwrap();

    let artifact = ctx
        .services()
        .export_service
        .export_with_history(
            &records,
            options("html", "feedback", AdminRole::Moderator, &["fullName", "ratings", "timestamp"]),
        )
        .await
        .unwrap();

    let html = String::from_utf8(artifact.bytes.clone()).unwrap();
    assert!(html.contains("&lt;b&gt;Mallory&lt;/b&gt;"));
    assert!(!html.contains("<b>Mallory</b>"));
    assert!(html.contains("content: 5, speaker: 4"));
    assert!(html.contains("<title>feedback report</title>"));

    let history = ExportHistoryStore::list_all(ctx.store.as_ref(), None).await.unwrap();
    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.export_id, artifact.export_id);
    assert_eq!(entry.status, ExportStatus::Success);
    assert_eq!(entry.admin_role, "moderator");
    assert_eq!(entry.export_format, "html");
    assert_eq!(entry.ip_address, "10.0.0.7");
    assert_eq!(entry.user_agent, "integration-test");
    assert_eq!(entry.selected_fields, vec!["fullName", "ratings", "timestamp"]);
}

#[tokio::test]
async fn test_every_attempt_leaves_one_entry() {
    let ctx = TestContext::new();
    let records = registration_records(&ctx).await;
    let exports = &ctx.services().export_service;

    exports
        .export_with_history(&records, options("excel", "registrations", AdminRole::Admin, &[]))
        .await
        .unwrap();
    let unsupported = exports
        .export_with_history(&records, options("pdf", "registrations", AdminRole::Admin, &[]))
        .await;
    let empty = exports
        .export_with_history(&[], options("csv", "registrations", AdminRole::Admin, &[]))
        .await;

    assert_matches!(unsupported, Err(ExportError::UnsupportedFormat(_)));
    assert_matches!(empty, Err(ExportError::EmptyInput));

    let history = ExportHistoryStore::list_all(ctx.store.as_ref(), None).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.iter().filter(|e| e.status == ExportStatus::Failed).count(), 2);
    assert!(history
        .iter()
        .filter(|e| e.status == ExportStatus::Failed)
        .all(|e| e.export_size == 0 && e.error_message.is_some()));
}

#[tokio::test]
async fn test_history_access_follows_roles() {
    let ctx = TestContext::new();
    let records = registration_records(&ctx).await;
    let exports = &ctx.services().export_service;

    for role in [AdminRole::Admin, AdminRole::Admin, AdminRole::SuperAdmin] {
        exports
            .export_with_history(&records, options("csv", "registrations", role, &["name"]))
            .await
            .unwrap();
    }

    let admin = principal(AdminRole::Admin);
    let root = principal(AdminRole::SuperAdmin);

    let own = exports.history_for_admin(&admin, &admin.id, None).await.unwrap();
    assert_eq!(own.len(), 2);

    let other = exports.history_for_admin(&admin, &root.id, None).await;
    assert_matches!(other, Err(PortalError::PermissionDenied(_)));
    assert_matches!(exports.all_history(&admin, None).await, Err(PortalError::PermissionDenied(_)));
    assert_matches!(exports.statistics(&admin).await, Err(PortalError::PermissionDenied(_)));

    assert_eq!(exports.history_for_admin(&root, &admin.id, Some(1)).await.unwrap().len(), 1);
    assert_eq!(exports.all_history(&root, None).await.unwrap().len(), 3);

    let stats = exports.statistics(&root).await.unwrap();
    assert_eq!(stats.total_exports, 3);
    assert_eq!(stats.successful_exports, 3);
    assert_eq!(stats.exports_by_format["csv"], 3);
    assert_eq!(stats.exports_by_user[&admin.email], 2);
    assert_eq!(stats.total_records_exported, 3);
}

#[tokio::test]
async fn test_spreadsheet_export_is_a_zip_container() {
    let ctx = TestContext::new();
    let records: Vec<ExportRecord> = [json!({"fullName": "Asha", "score": 9, "active": true})]
        .into_iter()
        .map(as_map)
        .collect();

    let artifact = ctx
        .services()
        .export_service
        .export_with_history(&records, options("xlsx", "custom", AdminRole::SuperAdmin, &[]))
        .await
        .unwrap();

    assert_eq!(&artifact.bytes[..2], b"PK");
    assert_eq!(artifact.fields, vec!["fullName", "score", "active"]);
    assert_eq!(
        artifact.content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[tokio::test]
async fn test_spreadsheet_follows_selected_field_order() {
    let ctx = TestContext::new();
    let records: Vec<ExportRecord> = vec![
        feedback_document("Asha", "asha@college.test"),
        feedback_document("Ravi", "ravi@college.test"),
    ];

    let artifact = ctx
        .services()
        .export_service
        .export_with_history(
            &records,
            options("excel", "feedback", AdminRole::Admin, &["ratings", "email", "fullName"]),
        )
        .await
        .unwrap();

    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(artifact.bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Data".to_string()]);

    let range = workbook.worksheet_range("Data").unwrap();
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(Data::to_string).collect())
        .collect();

    assert_eq!(
        rows,
        vec![
            vec!["ratings", "email", "fullName"],
            vec!["content: 5, speaker: 4", "asha@college.test", "Asha"],
            vec!["content: 5, speaker: 4", "ravi@college.test", "Ravi"],
        ]
    );
}
