// src/domain/report.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// The invoice-date cell of a ledger row.
/// Real dates are kept as calendar dates; anything else the bookkeeper typed
/// into the cell is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LedgerDate {
    Date(NaiveDate),
    Text(String),
}

impl fmt::Display for LedgerDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            LedgerDate::Text(t) => write!(f, "{t}"),
        }
    }
}

/// One ledger line item belonging to a person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseRecord {
    pub date: Option<LedgerDate>,
    pub item_number: Option<String>,
    pub description: String,
    pub quantity: i64,
    pub amount: Decimal,
}

/// Every purchase found for one person in the current ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPurchaseReport {
    /// Name as the caller supplied it.
    pub name: String,
    pub total_amount: Decimal,
    pub records: Vec<PurchaseRecord>,
}

impl PersonPurchaseReport {
    /// Builds a report, deriving `total_amount` from the records.
    pub fn new(name: impl Into<String>, records: Vec<PurchaseRecord>) -> Self {
        let total_amount = total_of(&records);
        Self {
            name: name.into(),
            total_amount,
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sum of the record amounts, rounded to öre.
pub fn total_of(records: &[PurchaseRecord]) -> Decimal {
    records
        .iter()
        .map(|r| r.amount)
        .sum::<Decimal>()
        .round_dp(2)
}
