// src/templates/emails/purchase_report.rs
//! The mail a manager receives for a new requisition.
use maud::{html, Markup, DOCTYPE};
use url::Url;

use crate::domain::{PersonPurchaseReport, Requisition};
use crate::errors::ServerError;
use crate::mailer::OutgoingMail;
use crate::templates::components::{format_amount, purchase_table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionLinks {
    pub approve: Url,
    pub reject: Url,
}

impl DecisionLinks {
    /// `base` must end with `/` for its path to be kept.
    pub fn for_code(base: &Url, code: &str) -> Result<Self, ServerError> {
        let join = |path: String| {
            base.join(&path)
                .map_err(|e| ServerError::BadRequest(format!("cannot build link: {e}")))
        };
        Ok(Self {
            approve: join(format!("approve/{code}"))?,
            reject: join(format!("reject/{code}"))?,
        })
    }
}

fn body(report: &PersonPurchaseReport, requisition: &Requisition, links: &DecisionLinks) -> Markup {
    let button = "display:inline-block;padding:10px 18px;border-radius:6px;color:#fff;text-decoration:none;font-weight:bold;margin-right:8px;";
    html! {
        (DOCTYPE)
        html lang="sv" {
            head { meta charset="utf-8"; }
            body style="font-family:Arial,sans-serif;color:#222;" {
                h2 { "Inköpsförfrågan från " (requisition.employee_name) }
                @if let Some(item) = &requisition.requested_item {
                    p { "Vill köpa: " strong { (item) } }
                }
                p { "Referenskod: " code { (requisition.code) } }

                h3 { "Tidigare köp (" (report.records.len()) " rader)" }
                (purchase_table(report))
                p { "Totalt hittills: " strong { (format_amount(report.total_amount)) } }

                p style="margin-top:24px;" {
                    a href=(links.approve.as_str()) style=(format!("{button}background:#047857;")) { "Godkänn" }
                    a href=(links.reject.as_str()) style=(format!("{button}background:#b91c1c;")) { "Avslå" }
                }
            }
        }
    }
}

pub fn purchase_report_mail(
    report: &PersonPurchaseReport,
    requisition: &Requisition,
    links: &DecisionLinks,
) -> OutgoingMail {
    OutgoingMail {
        to: requisition.approver_email.clone(),
        subject: format!(
            "Inköpsförfrågan: {} ({})",
            requisition.employee_name, requisition.code
        ),
        html: body(report, requisition, links).into_string(),
    }
}
