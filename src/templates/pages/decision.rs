// src/templates/pages/decision.rs
use maud::{html, Markup};

use crate::domain::{DecisionResult, Requisition};
use crate::templates::desktop_layout;

fn summary(r: &Requisition) -> Markup {
    html! {
        dl {
            dt { "Kod" } dd { code { (r.code) } }
            dt { "Anställd" } dd { (r.employee_name) }
            @if let Some(item) = &r.requested_item {
                dt { "Önskat köp" } dd { (item) }
            }
            dt { "Status" }
            dd class=(format!("status-{}", r.status.as_str())) { (r.status.label()) }
        }
    }
}

/// Confirmation page after an approve/reject link was followed.
pub fn decision_page(result: &DecisionResult) -> Markup {
    let (title, body) = match result {
        DecisionResult::Decided(r) => (
            "Beslut registrerat",
            html! {
                h1 { "Tack! Förfrågan är nu " (r.status.label().to_lowercase()) "." }
                (summary(r))
            },
        ),
        DecisionResult::AlreadyDecided(r) => (
            "Redan beslutad",
            html! {
                h1 { "Förfrågan är redan " (r.status.label().to_lowercase()) "." }
                p { "Inget har ändrats." }
                (summary(r))
            },
        ),
        DecisionResult::NotFound => (
            "Okänd kod",
            html! {
                h1 { "Okänd kod" }
                p { "Ingen förfrågan hittades för koden. Kontrollera länken i mejlet." }
            },
        ),
    };
    desktop_layout(title, html! { main { (body) } })
}
