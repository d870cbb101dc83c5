pub mod report;
pub mod requisition;

pub use report::{LedgerDate, PersonPurchaseReport, PurchaseRecord};
pub use requisition::{Decision, DecisionResult, NewRequisition, Requisition, RequisitionStatus};
