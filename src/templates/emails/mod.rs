pub mod purchase_report;

pub use purchase_report::{purchase_report_mail, DecisionLinks};
