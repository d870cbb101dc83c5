// src/intake.rs
//! Reading a purchase request out of the webhook payload. Power Automate
//! forwards either a plain `namn` or the whole mail body.
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::domain::NewRequisition;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Namn:\s*([A-Za-zÅÄÖåäöÉé\s\-]+?)(?:\s*Vill|\s*Chef|\s*$|\n|\r)").unwrap()
});
// Stops at the next field label since stripped HTML puts every field on one line.
static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Vill\s*köpa:\s*([^\n\r]+?)(?:\s*Chef:|\s*Namn:|\s*$|\n|\r)").unwrap()
});
static APPROVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Chef:\s*([A-Za-zÅÄÖåäöÉé\s\-]+?)(?:\s*Namn|\s*Vill|\s*$|\n|\r)").unwrap()
});

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    pub namn: Option<String>,
    pub email_body: Option<String>,
    pub vill_kopa: Option<String>,
    pub chef: Option<String>,
    pub chef_email: Option<String>,
    /// Keys this intake does not read, kept for error messages.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Collapses runs of whitespace to single spaces.
fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(squash).filter(|v| !v.is_empty())
}

/// Text content of an HTML fragment, one space between text nodes.
/// Line breaks inside text nodes are kept so the field patterns can stop at them.
pub fn strip_html(body: &str) -> String {
    let fragment = Html::parse_fragment(body);
    fragment.root_element().text().collect::<Vec<_>>().join(" ")
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| squash(m.as_str()))
        .filter(|v| !v.is_empty())
}

pub fn name_from_body(body: &str) -> Option<String> {
    capture(&NAME_RE, &strip_html(body))
}

pub fn item_from_body(body: &str) -> Option<String> {
    capture(&ITEM_RE, &strip_html(body))
}

pub fn approver_from_body(body: &str) -> Option<String> {
    capture(&APPROVER_RE, &strip_html(body))
}

impl WebhookPayload {
    /// Every key present in the payload, known fields first, for error responses.
    pub fn received_keys(&self) -> Vec<String> {
        let known = [
            ("namn", self.namn.is_some()),
            ("email_body", self.email_body.is_some()),
            ("vill_kopa", self.vill_kopa.is_some()),
            ("chef", self.chef.is_some()),
            ("chef_email", self.chef_email.is_some()),
        ]
        .into_iter()
        .filter_map(|(k, present)| present.then(|| k.to_string()));
        known.chain(self.extra.keys().cloned()).collect()
    }

    /// Resolves the request. Explicit fields win over anything parsed from the
    /// mail body. `None` when no employee name can be found.
    pub fn into_request(self) -> Option<NewRequisition> {
        let body = self.email_body.as_deref().unwrap_or("");

        let employee_name =
            non_blank(self.namn.as_deref()).or_else(|| name_from_body(body))?;

        let requested_item =
            non_blank(self.vill_kopa.as_deref()).or_else(|| item_from_body(body));
        let approver_name = non_blank(self.chef.as_deref()).or_else(|| approver_from_body(body));

        Some(NewRequisition {
            employee_name,
            approver_name,
            approver_email: non_blank(self.chef_email.as_deref()),
            requested_item,
        })
    }
}
