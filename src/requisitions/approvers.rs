// src/requisitions/approvers.rs
use std::collections::HashMap;

/// Static approver name → email lookup with a fallback address.
#[derive(Debug, Clone, Default)]
pub struct ApproverDirectory {
    by_name: HashMap<String, String>,
    default_email: String,
}

fn key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

impl ApproverDirectory {
    pub fn new<I, K, V>(entries: I, default_email: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            by_name: entries
                .into_iter()
                .map(|(k, v)| (key(k.as_ref()), v.into()))
                .collect(),
            default_email: default_email.into(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.by_name.get(&key(name)).map(String::as_str)
    }

    /// An explicit address wins, then the directory entry for the name, then
    /// the default.
    pub fn resolve(&self, approver_name: Option<&str>, explicit_email: Option<&str>) -> String {
        if let Some(email) = explicit_email.map(str::trim).filter(|e| !e.is_empty()) {
            return email.to_string();
        }
        approver_name
            .and_then(|n| self.lookup(n))
            .unwrap_or(&self.default_email)
            .to_string()
    }
}
