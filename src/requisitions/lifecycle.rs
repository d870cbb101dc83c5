// src/requisitions/lifecycle.rs
use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

use super::approvers::ApproverDirectory;
use super::codes::CodeAlphabet;
use crate::db::requisitions as db_req;
use crate::domain::{Decision, DecisionResult, NewRequisition, Requisition, RequisitionStatus};
use crate::errors::ServerError;

/// Lookup tables the lifecycle needs, fixed at start-up.
#[derive(Debug, Clone, Default)]
pub struct RequisitionConfig {
    pub alphabet: CodeAlphabet,
    pub approvers: ApproverDirectory,
}

/// Owns the requisition rules: code issuance and the
/// Pending → Approved / Rejected decision.
pub struct RequisitionService {
    cfg: RequisitionConfig,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RequisitionService {
    pub fn new(cfg: RequisitionConfig) -> Self {
        Self { cfg }
    }

    /// A code not yet present in `requisitions`.
    pub fn issue_code<R: Rng>(&self, conn: &Connection, rng: &mut R) -> Result<String, ServerError> {
        self.cfg
            .alphabet
            .issue(rng, |candidate| db_req::code_exists(conn, candidate))
    }

    /// Creates a pending requisition.
    ///
    /// Only called once the ledger showed at least one purchase for the
    /// employee; that check belongs to the caller. Code issuance and insert
    /// share one immediate transaction so a concurrent create cannot take the
    /// same code in between.
    pub fn create<R: Rng>(
        &self,
        conn: &mut Connection,
        rng: &mut R,
        new: NewRequisition,
        now: DateTime<Utc>,
    ) -> Result<Requisition, ServerError> {
        let employee_name = new.employee_name.trim().to_string();
        if employee_name.is_empty() {
            return Err(ServerError::BadRequest("employee name is required".into()));
        }
        let approver_name = clean(new.approver_name);
        let approver_email = self
            .cfg
            .approvers
            .resolve(approver_name.as_deref(), new.approver_email.as_deref());

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

        let code = self.issue_code(&tx, rng)?;
        let requisition = Requisition {
            code,
            employee_name,
            approver_name,
            approver_email,
            requested_item: clean(new.requested_item),
            status: RequisitionStatus::Pending,
            request_date: now.date_naive(),
            created_at: now,
            decided_at: None,
        };
        db_req::insert_requisition(&tx, &requisition)?;

        tx.commit()
            .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

        info!(
            code = %requisition.code,
            employee = %requisition.employee_name,
            approver = %requisition.approver_email,
            "requisition created"
        );
        Ok(requisition)
    }

    /// Applies a manager's decision.
    ///
    /// Approved is sticky: once approved, both approve and reject calls get
    /// `AlreadyDecided`. Rejected is not sticky, a later approval (or a
    /// repeated rejection) still goes through as `Decided`. That asymmetry is
    /// kept as the system has always behaved and is awaiting product-owner
    /// confirmation.
    pub fn decide(
        &self,
        conn: &mut Connection,
        code: &str,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Result<DecisionResult, ServerError> {
        // Immediate: the read and the conditional update run under the write
        // lock, so two simultaneous calls cannot both be first.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

        let Some(current) = db_req::find_by_code(&tx, code)? else {
            tx.rollback().ok();
            return Ok(DecisionResult::NotFound);
        };

        if current.status == RequisitionStatus::Approved {
            tx.rollback().ok();
            info!(code = %current.code, "decision ignored, already approved");
            return Ok(DecisionResult::AlreadyDecided(current));
        }

        let target = decision.target_status();
        let updated = db_req::apply_decision(&tx, &current.code, target, now)?;
        if updated != 1 {
            tx.rollback().ok();
            return Ok(DecisionResult::AlreadyDecided(current));
        }

        let decided = db_req::find_by_code(&tx, &current.code)?.ok_or(ServerError::InternalError)?;
        tx.commit()
            .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

        info!(
            code = %decided.code,
            from = %current.status,
            to = %decided.status,
            "requisition decided"
        );
        Ok(DecisionResult::Decided(decided))
    }
}
