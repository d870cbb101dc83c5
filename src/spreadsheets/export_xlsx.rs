// src/spreadsheets/export_xlsx.rs
use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use crate::domain::{LedgerDate, PersonPurchaseReport};
use crate::errors::ServerError;

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// Excel dates only cover 1900 to 9999; anything else is written as text.
fn excel_date(d: &NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(d.year()).ok().filter(|y| (1900..=9999).contains(y))?;
    ExcelDateTime::from_ymd(year, d.month() as u8, d.day() as u8).ok()
}

/// `Eva Ek` → `kophistorik_Eva_Ek.xlsx`.
pub fn report_filename(name: &str) -> String {
    let stem: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("kophistorik_{stem}.xlsx")
}

/// One sheet with the person's purchases and a total row.
pub fn export_report_xlsx(report: &PersonPurchaseReport) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let money = Format::new().set_num_format("#,##0.00");
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Köphistorik")
        .map_err(xlsx_err("sheet name"))?;

    let headers = ["Datum", "Artikelnr", "Benämning", "Antal", "Belopp"];
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err("header"))?;
    }

    for (i, record) in report.records.iter().enumerate() {
        let r = (i + 1) as u32;

        match &record.date {
            Some(LedgerDate::Date(d)) => match excel_date(d) {
                Some(dt) => {
                    worksheet
                        .write_datetime_with_format(r, 0, &dt, &date_format)
                        .map_err(xlsx_err("date"))?;
                }
                None => {
                    worksheet
                        .write_string(r, 0, d.format("%Y-%m-%d").to_string())
                        .map_err(xlsx_err("date"))?;
                }
            },
            Some(LedgerDate::Text(t)) => {
                worksheet.write_string(r, 0, t).map_err(xlsx_err("date"))?;
            }
            None => {}
        }

        if let Some(item) = &record.item_number {
            worksheet.write_string(r, 1, item).map_err(xlsx_err("item number"))?;
        }
        worksheet
            .write_string(r, 2, &record.description)
            .map_err(xlsx_err("description"))?;
        worksheet
            .write_number(r, 3, record.quantity as f64)
            .map_err(xlsx_err("quantity"))?;
        worksheet
            .write_number_with_format(r, 4, record.amount.to_f64().unwrap_or(0.0), &money)
            .map_err(xlsx_err("amount"))?;
    }

    let total_row = (report.records.len() + 1) as u32;
    worksheet
        .write_string_with_format(total_row, 0, "Totalt", &bold)
        .map_err(xlsx_err("total"))?;
    worksheet
        .write_number_with_format(
            total_row,
            4,
            report.total_amount.to_f64().unwrap_or(0.0),
            &money,
        )
        .map_err(xlsx_err("total"))?;

    worksheet.set_column_width(2, 40).map_err(xlsx_err("column width"))?;

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}
