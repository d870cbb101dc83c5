// src/router.rs
use astra::{Request, Response};
use chrono::Utc;
use rand::rngs::OsRng;
use serde::Serialize;
use std::io::Read;
use tracing::{info, warn};

use crate::app::App;
use crate::auth::verify_upload_token;
use crate::db::{ledger_store, requisitions as db_req};
use crate::domain::{Decision, DecisionResult, PersonPurchaseReport};
use crate::errors::ServerError;
use crate::intake::WebhookPayload;
use crate::ledger;
use crate::responses::{
    error_to_response, html_response, html_response_with_status, json_response, xlsx_response,
    ErrorFormat, ResultResp,
};
use crate::spreadsheets::{export_report_xlsx, report_filename};
use crate::templates::emails::{purchase_report_mail, DecisionLinks};
use crate::templates::pages;

/// Routes a request and turns any error into a response in the format the
/// caller expects (JSON for API routes, HTML for browser routes).
pub fn dispatch(req: Request, app: &App) -> Response {
    let format = error_format(req.uri().path());
    match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err, format),
    }
}

fn error_format(path: &str) -> ErrorFormat {
    if path == "/webhook" || path == "/ledger" || path.starts_with("/test/") {
        ErrorFormat::Json
    } else {
        ErrorFormat::Html
    }
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => {
            let info = app.db.with_conn(|conn| ledger_store::ledger_info(conn))?;
            html_response(pages::home_page(info.as_ref()))
        }
        ("POST", "/webhook") => webhook(req, app),
        ("POST", "/ledger") => upload_ledger(req, app),
        ("GET", "/requisitions") => {
            let rows = app.db.with_conn(|conn| db_req::list_requisitions(conn))?;
            html_response(pages::requisitions_page(&rows))
        }
        ("GET", p) => {
            if let Some(name) = p.strip_prefix("/test/") {
                let report = person_report(app, &segment(name)?)?;
                json_response(200, &report)
            } else if let Some(name) = p
                .strip_prefix("/report/")
                .and_then(|rest| rest.strip_suffix(".xlsx"))
            {
                let name = segment(name)?;
                let report = person_report(app, &name)?;
                if report.is_empty() {
                    return Err(ServerError::NotFoundMsg(format!("no purchases found for {name}")));
                }
                xlsx_response(export_report_xlsx(&report)?, &report_filename(&name))
            } else if let Some(code) = p.strip_prefix("/approve/") {
                decide(app, code, Decision::Approve)
            } else if let Some(code) = p.strip_prefix("/reject/") {
                decide(app, code, Decision::Reject)
            } else {
                Err(ServerError::NotFound)
            }
        }
        _ => Err(ServerError::NotFound),
    }
}

/// Percent-decodes one path segment. Empty or nested segments are not routes.
fn segment(raw: &str) -> Result<String, ServerError> {
    if raw.is_empty() || raw.contains('/') {
        return Err(ServerError::NotFound);
    }
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|_| ServerError::BadRequest("path is not valid UTF-8".into()))
}

fn read_body(req: Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.into_body()
        .reader()
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("could not read request body: {e}")))?;
    Ok(buf)
}

fn header(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Report for `name` from the stored ledger. 404 without a ledger.
fn person_report(app: &App, name: &str) -> Result<PersonPurchaseReport, ServerError> {
    let stored = app
        .db
        .with_conn(|conn| ledger_store::load_ledger(conn))?
        .ok_or_else(|| ServerError::NotFoundMsg("no ledger has been uploaded".into()))?;
    let report = ledger::extract(&stored.bytes, name)?;
    info!(
        person = %name,
        records = report.records.len(),
        ledger = stored.filename.as_deref().unwrap_or("-"),
        uploaded_at = %stored.uploaded_at,
        "purchase report built"
    );
    Ok(report)
}

#[derive(Serialize)]
struct WebhookResponse<'a> {
    status: &'a str,
    message: String,
    person: &'a str,
    purchase_count: usize,
    code: &'a str,
    email_id: String,
}

fn webhook(req: Request, app: &App) -> ResultResp {
    let body = read_body(req)?;
    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))?;

    let keys = payload.received_keys();
    let new = payload.into_request().ok_or_else(|| {
        ServerError::BadRequest(format!(
            "no employee name found, received keys: [{}]",
            keys.join(", ")
        ))
    })?;

    let report = person_report(app, &new.employee_name)?;
    if report.is_empty() {
        return Err(ServerError::NotFoundMsg(format!(
            "no purchases found for {}",
            new.employee_name
        )));
    }

    let requisition = app.db.with_conn(|conn| {
        app.requisitions
            .create(conn, &mut OsRng, new, Utc::now())
    })?;

    let links = DecisionLinks::for_code(&app.config.server.public_base_url, &requisition.code)?;
    let mail = purchase_report_mail(&report, &requisition, &links);
    let email_id = app.mailer.send(&mail).map_err(|e| {
        warn!(code = %requisition.code, to = %mail.to, error = %e, "approval mail failed");
        ServerError::from(e)
    })?;

    info!(
        code = %requisition.code,
        person = %requisition.employee_name,
        records = report.records.len(),
        "approval mail sent"
    );

    json_response(
        200,
        &WebhookResponse {
            status: "success",
            message: format!("Köphistorik skickad till {}", requisition.approver_email),
            person: &requisition.employee_name,
            purchase_count: report.records.len(),
            code: &requisition.code,
            email_id,
        },
    )
}

#[derive(Serialize)]
struct UploadResponse<'a> {
    status: &'a str,
    filename: Option<&'a str>,
    size: usize,
    rows: usize,
}

fn upload_ledger(req: Request, app: &App) -> ResultResp {
    let token = header(&req, "x-upload-token");
    verify_upload_token(app.config.upload_token.as_deref(), token.as_deref())?;

    let filename = header(&req, "x-filename")
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    let bytes = read_body(req)?;
    if bytes.is_empty() {
        return Err(ServerError::BadRequest("empty ledger upload".into()));
    }

    // The old ledger stays in place unless the new one is readable.
    let rows = ledger::read_rows(&bytes)
        .map_err(|e| ServerError::BadRequest(format!("ledger rejected: {e}")))?;

    app.db.with_conn(|conn| {
        ledger_store::replace_ledger(conn, filename.as_deref(), &bytes, Utc::now())
    })?;
    info!(filename = ?filename, size = bytes.len(), rows = rows.len(), "ledger replaced");

    json_response(
        200,
        &UploadResponse {
            status: "success",
            filename: filename.as_deref(),
            size: bytes.len(),
            rows: rows.len().saturating_sub(1),
        },
    )
}

fn decide(app: &App, raw_code: &str, decision: Decision) -> ResultResp {
    let code = segment(raw_code)?;
    let result = app
        .db
        .with_conn(|conn| app.requisitions.decide(conn, &code, decision, Utc::now()))?;
    let status = match result {
        DecisionResult::NotFound => 404,
        _ => 200,
    };
    html_response_with_status(status, pages::decision_page(&result))
}
