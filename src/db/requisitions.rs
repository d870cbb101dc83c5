// src/db/requisitions.rs
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Requisition, RequisitionStatus};
use crate::errors::ServerError;

impl ToSql for RequisitionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RequisitionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

const COLUMNS: &str = "code, employee_name, approver_name, approver_email, requested_item,
     status, request_date, created_at, decided_at";

fn map_row(r: &Row<'_>) -> rusqlite::Result<Requisition> {
    Ok(Requisition {
        code: r.get(0)?,
        employee_name: r.get(1)?,
        approver_name: r.get(2)?,
        approver_email: r.get(3)?,
        requested_item: r.get(4)?,
        status: r.get(5)?,
        request_date: r.get(6)?,
        created_at: r.get(7)?,
        decided_at: r.get(8)?,
    })
}

/// Codes are stored upper-case; lookups fold the caller's input the same way.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub fn code_exists(conn: &Connection, code: &str) -> Result<bool, ServerError> {
    let found: Option<i64> = conn
        .query_row(
            "select 1 from requisitions where code = ?",
            params![canonical_code(code)],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("code lookup failed: {e}")))?;
    Ok(found.is_some())
}

pub fn insert_requisition(conn: &Connection, req: &Requisition) -> Result<(), ServerError> {
    conn.execute(
        "insert into requisitions
           (code, employee_name, approver_name, approver_email, requested_item,
            status, request_date, created_at, decided_at)
         values (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            req.code,
            req.employee_name,
            req.approver_name,
            req.approver_email,
            req.requested_item,
            req.status,
            req.request_date,
            req.created_at,
            req.decided_at,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert requisition failed: {e}")))?;
    Ok(())
}

pub fn find_by_code(conn: &Connection, code: &str) -> Result<Option<Requisition>, ServerError> {
    conn.query_row(
        &format!("select {COLUMNS} from requisitions where code = ?"),
        params![canonical_code(code)],
        map_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select requisition failed: {e}")))
}

/// Moves a requisition to `status` unless it is already approved.
/// `decided_at` keeps the time of the first decision.
/// Returns the number of rows changed (0 or 1).
pub fn apply_decision(
    conn: &Connection,
    code: &str,
    status: RequisitionStatus,
    now: DateTime<Utc>,
) -> Result<usize, ServerError> {
    conn.execute(
        "update requisitions
            set status = ?, decided_at = coalesce(decided_at, ?)
          where code = ? and status <> 'approved'",
        params![status, now, canonical_code(code)],
    )
    .map_err(|e| ServerError::DbError(format!("update requisition status failed: {e}")))
}

/// All requisitions, newest first.
pub fn list_requisitions(conn: &Connection) -> Result<Vec<Requisition>, ServerError> {
    let mut stmt = conn
        .prepare(&format!(
            "select {COLUMNS} from requisitions order by created_at desc, code"
        ))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], map_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}
