// src/templates/pages/home.rs
use maud::{html, Markup};

use crate::db::ledger_store::LedgerInfo;
use crate::templates::{components::card, desktop_layout};

pub fn home_page(ledger: Option<&LedgerInfo>) -> Markup {
    desktop_layout(
        "Start",
        html! {
            h1 { "Klädsystem" }
            p { "Tar emot inköpsförfrågningar för arbetskläder och skickar köphistoriken till ansvarig chef." }

            (card("Aktuell reskontra", html! {
                @match ledger {
                    Some(info) => {
                        p {
                            "Fil: " strong { (info.filename.as_deref().unwrap_or("(namnlös)")) }
                        }
                        p { "Uppladdad: " (info.uploaded_at.format("%Y-%m-%d %H:%M UTC")) }
                        p { "Storlek: " (info.size) " byte" }
                    }
                    None => {
                        p { "Ingen reskontra är uppladdad ännu." }
                    }
                }
            }))

            (card("Endpoints", html! {
                ul {
                    li { code { "POST /webhook" } " tar emot förfrågningar" }
                    li { code { "POST /ledger" } " laddar upp en ny reskontra" }
                    li { code { "GET /test/{namn}" } " visar köphistorik som JSON" }
                    li { code { "GET /report/{namn}.xlsx" } " laddar ner köphistorik" }
                }
            }))
        },
    )
}
