pub mod connection;
pub mod ledger_store;
pub mod requisitions;

pub use connection::{init_db, Database};
