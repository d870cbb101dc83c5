use crate::db::ledger_store::load_ledger;
use crate::ledger::fixtures::{purchase, workbook};
use crate::ledger::read_rows;
use crate::router::{dispatch, handle};
use crate::tests::utils::{body_bytes, body_json, get, test_app, UPLOAD_TOKEN};
use astra::Body;
use http::{Method, Request};

fn ledger_for(reference: &str) -> Vec<u8> {
    workbook(&[purchase(None, reference, Some("A-1"), Some("Jacka"), None, Some(1.0), Some(500.0))])
}

fn upload(bytes: Vec<u8>, token: Option<&str>, filename: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/ledger");
    if let Some(token) = token {
        builder = builder.header("x-upload-token", token);
    }
    if let Some(name) = filename {
        builder = builder.header("x-filename", name);
    }
    builder.body(Body::from(bytes)).unwrap()
}

#[test]
fn upload_replaces_ledger() {
    let t = test_app();

    let resp = handle(
        upload(ledger_for("12 Eva Ek"), Some(UPLOAD_TOKEN), Some("januari.xlsx")),
        &t.app,
    )
    .expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let json = body_json(resp);
    assert_eq!(json["filename"], "januari.xlsx");
    assert_eq!(json["rows"], 1);

    let resp = handle(upload(ledger_for("13 Per Persson"), Some(UPLOAD_TOKEN), None), &t.app)
        .expect("Handler failed");
    assert_eq!(resp.status(), 200);

    // Last upload wins.
    let eva = body_json(handle(get("/test/Eva%20Ek"), &t.app).unwrap());
    assert!(eva["records"].as_array().unwrap().is_empty());
    let per = body_json(handle(get("/test/Per%20Persson"), &t.app).unwrap());
    assert_eq!(per["records"].as_array().unwrap().len(), 1);
}

#[test]
fn upload_requires_the_right_token() {
    let t = test_app();

    let missing = dispatch(upload(ledger_for("12 Eva Ek"), None, None), &t.app);
    assert_eq!(missing.status(), 401);

    let wrong = dispatch(upload(ledger_for("12 Eva Ek"), Some("guess"), None), &t.app);
    assert_eq!(wrong.status(), 401);
    assert_eq!(wrong.headers()["Content-Type"], "application/json");

    let stored = t.app.db.with_conn(|conn| load_ledger(conn)).unwrap();
    assert!(stored.is_none());
}

#[test]
fn upload_refused_without_configured_token() {
    let mut t = test_app();
    t.app.config.upload_token = None;
    let err = handle(upload(ledger_for("12 Eva Ek"), Some(UPLOAD_TOKEN), None), &t.app).unwrap_err();
    assert_eq!(err.status(), 401);
}

#[test]
fn unreadable_upload_keeps_previous_ledger() {
    let t = test_app().with_ledger(ledger_for("12 Eva Ek"));

    let err = handle(upload(b"garbage".to_vec(), Some(UPLOAD_TOKEN), None), &t.app).unwrap_err();
    assert_eq!(err.status(), 400);

    let err = handle(upload(Vec::new(), Some(UPLOAD_TOKEN), None), &t.app).unwrap_err();
    assert_eq!(err.status(), 400);

    let eva = body_json(handle(get("/test/Eva%20Ek"), &t.app).unwrap());
    assert_eq!(eva["records"].as_array().unwrap().len(), 1);
}

#[test]
fn test_route_without_ledger_is_json_not_found() {
    let t = test_app();
    let resp = dispatch(get("/test/Eva%20Ek"), &t.app);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["status"], "error");
}

#[test]
fn report_download_is_xlsx() {
    let t = test_app().with_ledger(ledger_for("12 Eva Ek"));

    let resp = handle(get("/report/Eva%20Ek.xlsx"), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["Content-Type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        resp.headers()["Content-Disposition"],
        "attachment; filename=\"kophistorik_Eva_Ek.xlsx\""
    );

    let rows = read_rows(&body_bytes(resp)).unwrap();
    // Header, one purchase, total.
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][2].text().as_deref(), Some("Jacka"));
}

#[test]
fn report_for_unknown_person_is_not_found() {
    let t = test_app().with_ledger(ledger_for("12 Eva Ek"));
    let err = handle(get("/report/Nobody.xlsx"), &t.app).unwrap_err();
    assert_eq!(err.status(), 404);
}
