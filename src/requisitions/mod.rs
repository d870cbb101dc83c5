pub mod approvers;
pub mod codes;
pub mod lifecycle;

pub use approvers::ApproverDirectory;
pub use codes::{CodeAlphabet, CodeAlphabetError};
pub use lifecycle::{RequisitionConfig, RequisitionService};
