use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{CompanyRecord, RawCompany};

/// Evidence text longer than this is cut and marked with [`ELLIPSIS`].
pub const MAX_EVIDENCE_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NAME_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-.()]").unwrap());
static SCHEME_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").unwrap());
static WWW_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^www\.").unwrap());
static NOT_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.]").unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Reasons a raw record cannot be brought into canonical form
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CleanError {
    #[error("revenue {0} is negative")]
    NegativeRevenue(f64),

    #[error("revenue is not a finite number")]
    NonFiniteRevenue,
}

/// Result of cleaning one raw record
#[derive(Debug, Clone)]
pub enum CleanOutcome {
    Kept(CompanyRecord),
    Dropped { name: String, reason: CleanError },
}

/// Aggregate of a cleaning pass
#[derive(Debug, Default)]
pub struct CleanReport {
    pub records: Vec<CompanyRecord>,
    pub dropped: Vec<(String, CleanError)>,
}

/// Digits only; anything but 10 or 12 digits becomes empty.
pub fn clean_tax_id(tax_id: &str) -> String {
    let digits = NON_DIGITS.replace_all(tax_id, "");
    match digits.len() {
        10 | 12 => digits.into_owned(),
        _ => String::new(),
    }
}

pub fn clean_name(name: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(name.trim(), " ");
    NAME_DISALLOWED
        .replace_all(&collapsed, "")
        .trim()
        .to_string()
}

/// Lowercase, drop the `http(s)://` scheme and a leading `www.`.
pub fn clean_site(site: &str) -> String {
    let lowered = site.trim().to_lowercase();
    let without_scheme = SCHEME_PREFIX.replace(&lowered, "");
    WWW_PREFIX.replace(&without_scheme, "").into_owned()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numbers pass through; text keeps only digits and periods and is parsed.
/// Text that does not parse, and any other JSON shape, is unknown (`None`).
pub fn clean_revenue(revenue: Option<&Value>) -> Result<Option<f64>, CleanError> {
    let value = match revenue {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    match value {
        Value::Number(n) => {
            let amount = n.as_f64().ok_or(CleanError::NonFiniteRevenue)?;
            if !amount.is_finite() {
                return Err(CleanError::NonFiniteRevenue);
            }
            if amount < 0.0 {
                return Err(CleanError::NegativeRevenue(amount));
            }
            Ok(Some(amount))
        }
        Value::String(s) => {
            let numeric = NOT_NUMERIC.replace_all(s, "");
            if numeric.is_empty() {
                return Ok(None);
            }
            Ok(numeric.parse::<f64>().ok().filter(|v| v.is_finite()))
        }
        other => {
            debug!(kind = kind_of(other), "Revenue of unexpected type treated as unknown");
            Ok(None)
        }
    }
}

/// First run of digits anywhere in the value, e.g. `"около 40 человек"` -> 40.
/// Values that are neither numbers nor text are unknown.
pub fn clean_employees(employees: Option<&Value>) -> Option<u32> {
    let text = match employees? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => return None,
        other => {
            debug!(kind = kind_of(other), "Employee count of unexpected type treated as unknown");
            return None;
        }
    };

    DIGIT_RUN
        .find(&text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Cut to [`MAX_EVIDENCE_CHARS`] characters, the last three being [`ELLIPSIS`].
pub fn truncate_text(text: &str) -> String {
    if text.chars().count() <= MAX_EVIDENCE_CHARS {
        return text.to_string();
    }
    let keep = MAX_EVIDENCE_CHARS - ELLIPSIS.chars().count();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text.trim(), " ");
    truncate_text(&collapsed)
}

fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|v| WHITESPACE_RUN.replace_all(v.trim(), " ").into_owned())
        .filter(|v| !v.is_empty())
}

/// Normalize one raw record.
pub fn clean_record(raw: &RawCompany) -> CleanOutcome {
    let revenue = match clean_revenue(raw.revenue.as_ref()) {
        Ok(revenue) => revenue,
        Err(reason) => {
            return CleanOutcome::Dropped {
                name: raw.name.clone(),
                reason,
            }
        }
    };
    let employees = clean_employees(raw.employees.as_ref());

    CleanOutcome::Kept(CompanyRecord {
        tax_id: clean_tax_id(&raw.tax_id),
        name: clean_name(&raw.name),
        revenue,
        site: clean_site(&raw.site),
        cat_evidence: clean_text(&raw.cat_evidence),
        source: raw.source.trim().to_string(),
        cat_product: clean_optional(raw.cat_product.as_deref()),
        employees,
        okved_main: clean_optional(raw.okved_main.as_deref()),
        country: clean_optional(raw.country.as_deref()),
    })
}

/// Normalize every record, collecting the ones that could not be cleaned.
pub fn clean_with_report(records: &[RawCompany]) -> CleanReport {
    let mut report = CleanReport::default();

    for raw in records {
        match clean_record(raw) {
            CleanOutcome::Kept(record) => {
                debug!(company = %record.name, "Record cleaned");
                report.records.push(record);
            }
            CleanOutcome::Dropped { name, reason } => {
                warn!(company = %name, %reason, "Record dropped during cleaning");
                report.dropped.push((name, reason));
            }
        }
    }

    report
}

/// Normalize every record, silently skipping unrecoverable ones.
pub fn clean(records: &[RawCompany]) -> Vec<CompanyRecord> {
    clean_with_report(records).records
}
