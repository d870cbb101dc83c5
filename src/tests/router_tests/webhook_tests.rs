use crate::db::requisitions::{find_by_code, list_requisitions};
use crate::domain::RequisitionStatus;
use crate::ledger::fixtures::{purchase, workbook, Value};
use crate::router::{dispatch, handle};
use crate::tests::utils::{body_json, post_json, test_app, test_app_with_failing_mailer, BASE_URL};
use rust_decimal::Decimal;

fn ledger() -> Vec<u8> {
    workbook(&[
        purchase(
            Some(Value::Date(2024, 1, 15)),
            "267 Johan Svensson",
            Some("A-100"),
            Some("Varseljacka"),
            Some("stl L"),
            Some(1.0),
            Some(899.5),
        ),
        purchase(None, "ZZ123456 Anna Lind/300", None, Some("Skor"), None, None, Some(150.5)),
        purchase(
            Some(Value::Date(2024, 2, 1)),
            "267 Johan Svensson 0701234567",
            Some("B-2"),
            Some("Handskar"),
            None,
            Some(2.0),
            Some(100.0),
        ),
    ])
}

#[test]
fn webhook_creates_requisition_and_mails_approver() {
    let t = test_app().with_ledger(ledger());

    let req = post_json("/webhook", r#"{"namn": "Johan Svensson", "vill_kopa": "Regnjacka"}"#);
    let resp = handle(req, &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let json = body_json(resp);
    assert_eq!(json["status"], "success");
    assert_eq!(json["person"], "Johan Svensson");
    assert_eq!(json["purchase_count"], 2);
    assert_eq!(json["email_id"], "test-1");
    let code = json["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);

    let stored = t
        .app
        .db
        .with_conn(|conn| find_by_code(conn, &code))
        .unwrap()
        .expect("requisition persisted");
    assert_eq!(stored.status, RequisitionStatus::Pending);
    assert_eq!(stored.requested_item.as_deref(), Some("Regnjacka"));
    assert_eq!(stored.approver_email, "chef@example.com");

    let sent = t.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "chef@example.com");
    assert!(sent[0].html.contains(&format!("{BASE_URL}approve/{code}")));
    assert!(sent[0].html.contains(&format!("{BASE_URL}reject/{code}")));
    assert!(sent[0].html.contains("Varseljacka stl L"));
    assert!(sent[0].html.contains("Handskar"));
    assert!(sent[0].html.contains("999,50 kr"));
    assert!(!sent[0].html.contains("Skor"));
}

#[test]
fn webhook_reads_name_and_approver_from_mail_body() {
    let t = test_app().with_ledger(ledger());

    let body = serde_json::json!({
        "email_body": "<p>Namn: Anna Lind</p><p>Chef: Lisa Berg</p><p>Vill köpa: Skyddsskor</p>"
    })
    .to_string();
    let resp = handle(post_json("/webhook", &body), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp)["purchase_count"], 1);

    let sent = t.sent();
    assert_eq!(sent[0].to, "lisa@example.se");
    assert!(sent[0].html.contains("Skyddsskor"));
}

#[test]
fn explicit_approver_email_wins() {
    let t = test_app().with_ledger(ledger());
    let body = r#"{"namn": "Anna Lind", "chef": "Lisa Berg", "chef_email": "other@example.se"}"#;
    handle(post_json("/webhook", body), &t.app).expect("Handler failed");
    assert_eq!(t.sent()[0].to, "other@example.se");
}

#[test]
fn invalid_json_is_bad_request() {
    let t = test_app().with_ledger(ledger());
    let err = handle(post_json("/webhook", "{not json"), &t.app).unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn missing_name_lists_received_keys() {
    let t = test_app().with_ledger(ledger());
    let resp = dispatch(
        post_json("/webhook", r#"{"vill_kopa": "Jacka", "email_body": "Hej!"}"#),
        &t.app,
    );
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.headers()["Content-Type"], "application/json");

    let json = body_json(resp);
    assert_eq!(json["status"], "error");
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("email_body"));
    assert!(message.contains("vill_kopa"));
    assert!(t.sent().is_empty());
}

#[test]
fn no_ledger_is_not_found() {
    let t = test_app();
    let err = handle(post_json("/webhook", r#"{"namn": "Johan Svensson"}"#), &t.app).unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn malformed_ledger_is_unprocessable() {
    let t = test_app().with_ledger(b"this is not a workbook".to_vec());
    let err = handle(post_json("/webhook", r#"{"namn": "Johan Svensson"}"#), &t.app).unwrap_err();
    assert_eq!(err.status(), 422);
}

#[test]
fn person_without_purchases_creates_nothing() {
    let t = test_app().with_ledger(ledger());
    let err = handle(post_json("/webhook", r#"{"namn": "Okänd Person"}"#), &t.app).unwrap_err();
    assert_eq!(err.status(), 404);

    let rows = t.app.db.with_conn(|conn| list_requisitions(conn)).unwrap();
    assert!(rows.is_empty());
    assert!(t.sent().is_empty());
}

#[test]
fn mail_failure_is_bad_gateway_but_requisition_is_kept() {
    let t = test_app_with_failing_mailer().with_ledger(ledger());
    let resp = dispatch(post_json("/webhook", r#"{"namn": "Johan Svensson"}"#), &t.app);
    assert_eq!(resp.status(), 502);

    let rows = t.app.db.with_conn(|conn| list_requisitions(conn)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, RequisitionStatus::Pending);
}

#[test]
fn test_route_returns_report_json() {
    let t = test_app().with_ledger(ledger());
    let resp = handle(crate::tests::utils::get("/test/Johan%20Svensson"), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let json = body_json(resp);
    assert_eq!(json["name"], "Johan Svensson");
    assert_eq!(json["records"].as_array().unwrap().len(), 2);
    assert_eq!(json["records"][0]["date"], "2024-01-15");
    assert_eq!(json["records"][1]["quantity"], 2);
    let total: Decimal = json["total_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, "999.5".parse::<Decimal>().unwrap());

    // No requisition, no mail.
    assert!(t.sent().is_empty());
}
