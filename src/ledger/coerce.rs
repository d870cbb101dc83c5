// src/ledger/coerce.rs
//! Cell → field coercion. A cell that is missing or does not parse yields the
//! field's default; it never fails the row.
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use super::cell::{parse_iso, Cell};
use crate::domain::LedgerDate;

pub const DEFAULT_QUANTITY: i64 = 1;

/// Runs `parse` on the cell and substitutes `default` when it yields nothing.
/// Non-blank cells that fail to parse are logged.
pub fn coerce_or<T, F>(cell: &Cell, field: &'static str, default: T, parse: F) -> T
where
    F: FnOnce(&Cell) -> Option<T>,
{
    if cell.is_blank() {
        return default;
    }
    match parse(cell) {
        Some(v) => v,
        None => {
            debug!(field, cell = ?cell, "ledger cell not coercible, using default");
            default
        }
    }
}

pub fn quantity(cell: &Cell) -> i64 {
    coerce_or(cell, "quantity", DEFAULT_QUANTITY, parse_quantity)
}

pub fn amount(cell: &Cell) -> Decimal {
    coerce_or(cell, "amount", Decimal::ZERO, parse_amount)
}

pub fn invoice_date(cell: &Cell) -> Option<LedgerDate> {
    coerce_or(cell, "invoice_date", None, |c| Some(parse_date(c)))
}

fn parse_quantity(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Int(i) => Some(*i),
        Cell::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Cell::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| parse_decimal_text(s).and_then(|d| d.trunc().to_i64()))
        }
        _ => None,
    }
}

fn parse_amount(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Int(i) => Some(Decimal::from(*i)),
        Cell::Float(f) if f.is_finite() => Decimal::from_f64(*f),
        Cell::Text(s) => parse_decimal_text(s),
        _ => None,
    }
}

fn parse_date(cell: &Cell) -> Option<LedgerDate> {
    match cell {
        Cell::DateTime(dt) => Some(LedgerDate::Date(dt.date())),
        Cell::Text(s) => match parse_iso(s) {
            Some(dt) => Some(LedgerDate::Date(dt.date())),
            None => cell.text().map(LedgerDate::Text),
        },
        other => other.text().map(LedgerDate::Text),
    }
}

/// Accepts `1234.5`, `1234,5`, `1 234,50` and `1.234,50`.
fn parse_decimal_text(raw: &str) -> Option<Decimal> {
    let mut s: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .collect();
    if s.contains(',') {
        if s.contains('.') {
            s = s.replace('.', "");
        }
        s = s.replace(',', ".");
    }
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(&s).ok()
}
