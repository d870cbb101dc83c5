// src/ledger/normalize.rs
//! Turning a free-text ledger reference such as `"ZZ123456 Anna Lind/300"`
//! into the bare name `"Anna Lind"`, and matching it against a searched name.
use regex::Regex;
use std::sync::LazyLock;

/// Employee-code prefix: up to two capitals, digits, whitespace. Repeated
/// prefixes are stripped together so normalizing twice changes nothing.
static CODE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]{0,2}[0-9]+\s+)+").unwrap());

/// Department or account suffix like `/300` or ` 4711`.
static NUMERIC_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\s][0-9]{3,}").unwrap());

/// Phone-number-like trailing token, optionally with a two-letter prefix.
static PHONE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[A-Z]{0,2}[0-9]{6,}").unwrap());

/// Reduces a reference field to the person name it carries.
pub fn normalize_reference(raw: &str) -> String {
    let s = CODE_PREFIX_RE.replace(raw.trim(), "");
    let s = cut_at(&s, &NUMERIC_SUFFIX_RE);
    let s = cut_at(s, &PHONE_SUFFIX_RE);
    s.trim().to_string()
}

/// Everything before the first match of `re`.
fn cut_at<'a>(s: &'a str, re: &Regex) -> &'a str {
    match re.find(s) {
        Some(m) => &s[..m.start()],
        None => s,
    }
}

/// Case-insensitive substring match of `person` inside the normalized
/// reference. Short names over-match ("ANN" is found in "JOHANNA"); that is
/// the accepted behaviour of the lookup.
pub fn reference_matches(raw_reference: &str, person: &str) -> bool {
    let target = person.trim().to_uppercase();
    if target.is_empty() {
        return false;
    }
    let name = normalize_reference(raw_reference).to_uppercase();
    !name.is_empty() && name.contains(&target)
}
