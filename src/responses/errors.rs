// src/responses/errors.rs
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;
use tracing::{error, warn};

use crate::errors::ServerError;
use crate::templates::components::error::error_page;

pub type ResultResp = Result<Response, ServerError>;

/// How a failed request should be answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorFormat {
    Html,
    Json,
}

/// Convert a ServerError into a response in the format the client expects.
pub fn error_to_response(err: ServerError, format: ErrorFormat) -> Response {
    let status = err.status();
    if status >= 500 {
        error!(status, error = %err, "request failed");
    } else {
        warn!(status, error = %err, "request rejected");
    }

    // Internal details stay in the log.
    let message = match &err {
        ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => {
            "Internal Server Error".to_string()
        }
        other => other.to_string(),
    };

    match format {
        ErrorFormat::Html => html_error_response(status, &message),
        ErrorFormat::Json => json_error_response(status, &message),
    }
}

/// Build an HTML error page
pub fn html_error_response(status: u16, message: &str) -> Response {
    let body = error_page(status, message).into_string();
    fallback(
        ResponseBuilder::new()
            .status(status)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(Body::from(body)),
        status,
    )
}

pub fn json_error_response(status: u16, message: &str) -> Response {
    let body = json!({ "status": "error", "message": message }).to_string();
    fallback(
        ResponseBuilder::new()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body)),
        status,
    )
}

fn fallback(built: Result<Response, http::Error>, status: u16) -> Response {
    built.unwrap_or_else(|e| {
        error!(status, error = %e, "could not build error response");
        let mut resp = Response::new(Body::from("Internal Server Error"));
        *resp.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}
