pub mod card;
pub mod error;
pub mod purchase_table;

pub use card::card;
pub use purchase_table::{format_amount, purchase_table};
