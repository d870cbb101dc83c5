// src/templates/pages/requisitions.rs
use maud::{html, Markup};

use crate::domain::Requisition;
use crate::templates::desktop_layout;

pub fn requisitions_page(rows: &[Requisition]) -> Markup {
    desktop_layout(
        "Rekvisitioner",
        html! {
            h1 { "Rekvisitioner" }
            @if rows.is_empty() {
                p { "Inga förfrågningar ännu." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Kod" }
                            th { "Datum" }
                            th { "Anställd" }
                            th { "Önskat köp" }
                            th { "Chef" }
                            th { "Status" }
                            th { "Beslutad" }
                        }
                    }
                    tbody {
                        @for r in rows {
                            tr {
                                td { code { (r.code) } }
                                td { (r.request_date.format("%Y-%m-%d")) }
                                td { (r.employee_name) }
                                td { (r.requested_item.as_deref().unwrap_or("")) }
                                td { (r.approver_name.as_deref().unwrap_or(&r.approver_email)) }
                                td class=(format!("status-{}", r.status.as_str())) { (r.status.label()) }
                                td {
                                    @if let Some(at) = r.decided_at {
                                        (at.format("%Y-%m-%d %H:%M"))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
