use crate::db::requisitions::find_by_code;
use crate::domain::{Decision, DecisionResult, NewRequisition, RequisitionStatus};
use crate::router::{dispatch, handle};
use crate::tests::utils::{body_string, get, test_app, TestApp};
use chrono::Utc;
use rand::rngs::OsRng;
use std::sync::Barrier;
use std::thread;

fn pending(t: &TestApp) -> String {
    t.app
        .db
        .with_conn(|conn| {
            t.app.requisitions.create(
                conn,
                &mut OsRng,
                NewRequisition {
                    employee_name: "Eva Ek".into(),
                    requested_item: Some("Varseljacka".into()),
                    ..Default::default()
                },
                Utc::now(),
            )
        })
        .expect("Failed to create requisition")
        .code
}

fn status_of(t: &TestApp, code: &str) -> RequisitionStatus {
    t.app
        .db
        .with_conn(|conn| find_by_code(conn, code))
        .unwrap()
        .unwrap()
        .status
}

#[test]
fn approve_link_approves() {
    let t = test_app();
    let code = pending(&t);

    let resp = handle(get(&format!("/approve/{code}")), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("godkänd"));
    assert!(body.contains(&code));
    assert!(body.contains("Varseljacka"));
    assert_eq!(status_of(&t, &code), RequisitionStatus::Approved);
}

#[test]
fn approved_is_final() {
    let t = test_app();
    let code = pending(&t);
    handle(get(&format!("/approve/{code}")), &t.app).expect("Handler failed");

    let resp = handle(get(&format!("/reject/{code}")), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("redan"));
    assert_eq!(status_of(&t, &code), RequisitionStatus::Approved);
}

#[test]
fn rejected_can_still_be_approved() {
    let t = test_app();
    let code = pending(&t);

    let resp = handle(get(&format!("/reject/{code}")), &t.app).expect("Handler failed");
    assert!(body_string(resp).contains("nekad"));
    assert_eq!(status_of(&t, &code), RequisitionStatus::Rejected);

    handle(get(&format!("/approve/{code}")), &t.app).expect("Handler failed");
    assert_eq!(status_of(&t, &code), RequisitionStatus::Approved);
}

#[test]
fn codes_are_case_insensitive() {
    let t = test_app();
    let code = pending(&t);
    let resp = handle(get(&format!("/approve/{}", code.to_lowercase())), &t.app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(status_of(&t, &code), RequisitionStatus::Approved);
}

#[test]
fn unknown_code_is_not_found_page() {
    let t = test_app();
    let resp = dispatch(get("/approve/ZZZZ2345"), &t.app);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Okänd kod"));
}

#[test]
fn simultaneous_approvals_have_one_winner() {
    const WORKERS: usize = 8;
    let t = test_app();
    let code = pending(&t);
    let barrier = Barrier::new(WORKERS);

    // Each thread opens its own connection to the same database file.
    let results: Vec<DecisionResult> = thread::scope(|s| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    t.app
                        .db
                        .with_conn(|conn| {
                            t.app.requisitions.decide(conn, &code, Decision::Approve, Utc::now())
                        })
                        .expect("decide failed")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = results
        .iter()
        .filter(|r| matches!(r, DecisionResult::Decided(_)))
        .count();
    let losers = results
        .iter()
        .filter(|r| matches!(r, DecisionResult::AlreadyDecided(_)))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(losers, WORKERS - 1);
    assert_eq!(status_of(&t, &code), RequisitionStatus::Approved);
}
