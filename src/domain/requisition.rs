// src/domain/requisition.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequisitionStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequisitionStatus {
    /// Lowercase form stored in the `requisitions.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequisitionStatus::Pending => "pending",
            RequisitionStatus::Approved => "approved",
            RequisitionStatus::Rejected => "rejected",
        }
    }

    /// Swedish label used on pages and in mail.
    pub fn label(&self) -> &'static str {
        match self {
            RequisitionStatus::Pending => "Väntar",
            RequisitionStatus::Approved => "Godkänd",
            RequisitionStatus::Rejected => "Nekad",
        }
    }
}

impl fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequisitionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequisitionStatus::Pending),
            "approved" => Ok(RequisitionStatus::Approved),
            "rejected" => Ok(RequisitionStatus::Rejected),
            other => Err(format!("unknown requisition status `{other}`")),
        }
    }
}

/// The two outcomes a manager can pick from the decision links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(&self) -> RequisitionStatus {
        match self {
            Decision::Approve => RequisitionStatus::Approved,
            Decision::Reject => RequisitionStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requisition {
    pub code: String,
    pub employee_name: String,
    pub approver_name: Option<String>,
    pub approver_email: String,
    pub requested_item: Option<String>,
    pub status: RequisitionStatus,
    pub request_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// Input for creating a requisition, as handed over by the intake parser.
#[derive(Debug, Clone, Default)]
pub struct NewRequisition {
    pub employee_name: String,
    pub approver_name: Option<String>,
    pub approver_email: Option<String>,
    pub requested_item: Option<String>,
}

/// Outcome of a decision call. None of these are errors: the boundary renders
/// each one as its own page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionResult {
    NotFound,
    AlreadyDecided(Requisition),
    Decided(Requisition),
}
