use crate::domain::NewRequisition;
use crate::ledger::fixtures::{purchase, workbook};
use crate::router::{dispatch, handle};
use crate::tests::utils::{body_string, get, post_json, test_app};
use chrono::Utc;
use rand::rngs::OsRng;

#[test]
fn home_page_without_ledger() {
    let t = test_app();
    let resp = handle(get("/"), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
    assert!(body_string(resp).contains("Ingen reskontra"));
}

#[test]
fn home_page_shows_current_ledger() {
    let t = test_app().with_ledger(workbook(&[purchase(None, "1 Eva Ek", None, None, None, None, None)]));
    let body = body_string(handle(get("/"), &t.app).expect("Handler failed"));
    assert!(body.contains("test.xlsx"));
}

#[test]
fn requisitions_page_lists_newest_first() {
    let t = test_app();
    let earlier = Utc::now() - chrono::Duration::hours(1);
    let codes: Vec<String> = ["Eva Ek", "Per Persson"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            t.app
                .db
                .with_conn(|conn| {
                    t.app.requisitions.create(
                        conn,
                        &mut OsRng,
                        NewRequisition {
                            employee_name: name.to_string(),
                            ..Default::default()
                        },
                        earlier + chrono::Duration::minutes(i as i64),
                    )
                })
                .unwrap()
                .code
        })
        .collect();

    let body = body_string(handle(get("/requisitions"), &t.app).expect("Handler failed"));
    let first = body.find(&codes[1]).unwrap();
    let second = body.find(&codes[0]).unwrap();
    assert!(first < second);
    assert!(body.contains("Väntar"));
}

#[test]
fn unknown_routes_are_html_not_found() {
    let t = test_app();
    let resp = dispatch(get("/nope"), &t.app);
    assert_eq!(resp.status(), 404);
    assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");

    assert_eq!(handle(post_json("/", "{}"), &t.app).unwrap_err().status(), 404);
    assert_eq!(handle(get("/approve/"), &t.app).unwrap_err().status(), 404);
    assert_eq!(handle(get("/test/a/b"), &t.app).unwrap_err().status(), 404);
}
