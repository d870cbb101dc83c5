// src/tests/utils.rs
use astra::{Body, Request, Response};
use chrono::Utc;
use http::Method;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::app::App;
use crate::config::AppConfig;
use crate::db::{init_db, ledger_store, Database};
use crate::mailer::{Mailer, MailerError, OutgoingMail};

pub const UPLOAD_TOKEN: &str = "test-upload-token";
pub const BASE_URL: &str = "http://klader.test/";

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh database file per test, schema applied.
pub fn make_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "klader_test_{}_{}_{}.sqlite",
        std::process::id(),
        DB_COUNTER.fetch_add(1, Ordering::SeqCst),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db).expect("Failed to initialize DB");
    db
}

/// Keeps every mail instead of sending it.
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail: bool,
}

impl Mailer for RecordingMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<String, MailerError> {
        if self.fail {
            return Err(MailerError::ApiError("503 - provider down".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(mail.clone());
        Ok(format!("test-{}", sent.len()))
    }
}

pub struct TestApp {
    pub app: App,
    pub sent: Arc<Mutex<Vec<OutgoingMail>>>,
}

impl TestApp {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Stores a ledger directly, bypassing the upload route.
    pub fn with_ledger(self, bytes: Vec<u8>) -> Self {
        self.app
            .db
            .with_conn(|conn| ledger_store::replace_ledger(conn, Some("test.xlsx"), &bytes, Utc::now()))
            .expect("Failed to store ledger");
        self
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.public_base_url = Url::parse(BASE_URL).unwrap();
    config.upload_token = Some(UPLOAD_TOKEN.to_string());
    config
        .approvers
        .insert("Lisa Berg".to_string(), "lisa@example.se".to_string());
    config
}

fn build(failing_mailer: bool) -> TestApp {
    let db = make_db();
    let sent = Arc::new(Mutex::new(Vec::new()));
    let mailer = RecordingMailer {
        sent: Arc::clone(&sent),
        fail: failing_mailer,
    };
    let mut config = test_config();
    config.database_path = db.path().to_string();
    let app = App::new(config, Box::new(mailer)).expect("Failed to build app");
    TestApp { app, sent }
}

pub fn test_app() -> TestApp {
    build(false)
}

pub fn test_app_with_failing_mailer() -> TestApp {
    build(true)
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, json: &str) -> Request {
    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut buf = Vec::new();
    resp.into_body().reader().read_to_end(&mut buf).unwrap();
    buf
}

pub fn body_string(resp: Response) -> String {
    String::from_utf8(body_bytes(resp)).unwrap()
}

pub fn body_json(resp: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(resp)).unwrap()
}
