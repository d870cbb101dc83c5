// src/templates/components/purchase_table.rs
use maud::{html, Markup};
use rust_decimal::Decimal;

use crate::domain::PersonPurchaseReport;

/// `1234.5` → `1 234,50 kr`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let text = format!("{abs:.2}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part} kr")
}

/// Purchase rows plus a total line. Inline styles, since the table is also
/// embedded in mail.
pub fn purchase_table(report: &PersonPurchaseReport) -> Markup {
    let cell = "border:1px solid #ddd;padding:6px 8px;";
    let num = "border:1px solid #ddd;padding:6px 8px;text-align:right;";
    html! {
        table style="border-collapse:collapse;width:100%;" {
            thead {
                tr {
                    th style=(cell) { "Datum" }
                    th style=(cell) { "Artikelnr" }
                    th style=(cell) { "Benämning" }
                    th style=(num) { "Antal" }
                    th style=(num) { "Belopp" }
                }
            }
            tbody {
                @for r in &report.records {
                    tr {
                        td style=(cell) {
                            @if let Some(date) = &r.date { (date) }
                        }
                        td style=(cell) { (r.item_number.as_deref().unwrap_or("")) }
                        td style=(cell) { (r.description) }
                        td style=(num) { (r.quantity) }
                        td style=(num) { (format_amount(r.amount)) }
                    }
                }
            }
            tfoot {
                tr {
                    td style=(cell) colspan="4" { strong { "Totalt" } }
                    td style=(num) { strong { (format_amount(report.total_amount)) } }
                }
            }
        }
    }
}
