// src/ledger/mod.rs
//! Extraction of one person's purchases from the uploaded ledger workbook.
pub mod cell;
pub mod coerce;
pub mod columns;
pub mod normalize;

use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use crate::domain::{PersonPurchaseReport, PurchaseRecord};
use cell::Cell;
use columns::{LedgerColumn, LedgerRow};

use normalize::reference_matches;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger is not a readable spreadsheet: {0}")]
    Malformed(String),
    #[error("ledger workbook has no worksheet")]
    NoWorksheet,
}

/// Reads the first worksheet of a workbook held in memory.
/// Returns every row, header included.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, LedgerError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| LedgerError::Malformed(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LedgerError::NoWorksheet)?
        .map_err(|e| LedgerError::Malformed(e.to_string()))?;

    // The range only spans used cells; pad so positions are absolute columns.
    let first_col = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    Ok(range
        .rows()
        .map(|row| {
            std::iter::repeat(Cell::Empty)
                .take(first_col)
                .chain(row.iter().map(Cell::from))
                .collect()
        })
        .collect())
}

/// Builds the purchase report for `person_name` from raw ledger bytes.
///
/// The first row is a header. A name with no matching rows gives an empty
/// report; only an unreadable blob is an error.
pub fn extract(bytes: &[u8], person_name: &str) -> Result<PersonPurchaseReport, LedgerError> {
    let rows = read_rows(bytes)?;
    Ok(extract_from_rows(&rows, person_name))
}

pub fn extract_from_rows(rows: &[Vec<Cell>], person_name: &str) -> PersonPurchaseReport {
    let records: Vec<PurchaseRecord> = rows
        .iter()
        .skip(1)
        .map(|cells| LedgerRow::new(cells))
        .filter(|row| {
            row.text(LedgerColumn::Reference)
                .is_some_and(|reference| reference_matches(&reference, person_name))
        })
        .map(|row| purchase_from_row(&row))
        .collect();

    debug!(person = person_name, records = records.len(), "ledger extracted");
    PersonPurchaseReport::new(person_name, records)
}

fn purchase_from_row(row: &LedgerRow<'_>) -> PurchaseRecord {
    let description = [
        row.text(LedgerColumn::Description1),
        row.text(LedgerColumn::Description2),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .trim()
    .to_string();

    PurchaseRecord {
        date: coerce::invoice_date(row.get(LedgerColumn::InvoiceDate)),
        item_number: row.text(LedgerColumn::ItemNumber),
        description,
        quantity: coerce::quantity(row.get(LedgerColumn::Quantity)),
        amount: coerce::amount(row.get(LedgerColumn::Amount)),
    }
}
