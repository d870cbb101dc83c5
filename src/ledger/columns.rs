// src/ledger/columns.rs
use super::cell::Cell;

/// Roles of the ledger columns the extractor reads.
/// The positions follow the current accounting export; a layout change is an
/// edit to `position` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerColumn {
    InvoiceDate,
    InvoiceNumber,
    Reference,
    ItemNumber,
    Description1,
    Description2,
    Quantity,
    Amount,
}

impl LedgerColumn {
    pub const fn position(self) -> usize {
        match self {
            LedgerColumn::InvoiceDate => 0,
            LedgerColumn::InvoiceNumber => 1,
            LedgerColumn::Reference => 2,
            LedgerColumn::ItemNumber => 3,
            LedgerColumn::Description1 => 4,
            LedgerColumn::Description2 => 5,
            LedgerColumn::Quantity => 6,
            LedgerColumn::Amount => 7,
        }
    }
}

static EMPTY: Cell = Cell::Empty;

/// Typed view over one data row. Short rows read as empty cells.
#[derive(Debug, Clone, Copy)]
pub struct LedgerRow<'a> {
    cells: &'a [Cell],
}

impl<'a> LedgerRow<'a> {
    pub fn new(cells: &'a [Cell]) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: LedgerColumn) -> &'a Cell {
        self.cells.get(column.position()).unwrap_or(&EMPTY)
    }

    pub fn text(&self, column: LedgerColumn) -> Option<String> {
        self.get(column).text()
    }
}
