use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Revenue floor of the base validator (rubles).
///
/// Kept apart from `CatConfig::min_revenue`: the configurable filter may be
/// lowered for a run without weakening what counts as a valid record.
pub const MIN_VALID_REVENUE: f64 = 100_000_000.0;

/// Company data exactly as a collector produced it, before cleaning.
///
/// `revenue` and `employees` are loosely typed (number or free text such as
/// `"150 000 000 ₽"` or `"около 40 человек"`); only the cleaner interprets them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCompany {
    pub tax_id: String,
    pub name: String,
    pub revenue: Option<Value>,
    pub site: String,
    pub cat_evidence: String,
    pub source: String,
    pub cat_product: Option<String>,
    pub employees: Option<Value>,
    pub okved_main: Option<String>,
    pub country: Option<String>,
}

/// Canonical company record shared by every stage after cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// INN: 10 digits (legal entity) or 12 digits (individual), otherwise empty
    pub tax_id: String,
    pub name: String,
    /// Annual revenue in rubles; `None` means unknown
    pub revenue: Option<f64>,
    /// Bare host without scheme or `www.`
    pub site: String,
    /// Human-readable justification trail, at most 200 characters
    pub cat_evidence: String,
    /// Collector that produced the record
    pub source: String,
    /// Best-guess CAT product; filled once, never replaced
    pub cat_product: Option<String>,
    pub employees: Option<u32>,
    pub okved_main: Option<String>,
    pub country: Option<String>,
}

impl CompanyRecord {
    /// Base shape check: tax id and name present, and a known revenue is not
    /// below [`MIN_VALID_REVENUE`].
    pub fn is_valid(&self) -> bool {
        if self.tax_id.is_empty() || self.name.is_empty() {
            return false;
        }
        match self.revenue {
            Some(revenue) => revenue >= MIN_VALID_REVENUE,
            None => true,
        }
    }

    /// True when `cat_product` holds a non-empty label.
    pub fn has_product(&self) -> bool {
        self.cat_product
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }

    /// Set `cat_product` unless a label is already present.
    pub fn fill_product(&mut self, product: &str) {
        if !self.has_product() {
            self.cat_product = Some(product.to_string());
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A cleaned record with sensible defaults for stage tests
    pub fn record(name: &str, revenue: Option<f64>, evidence: &str) -> CompanyRecord {
        CompanyRecord {
            tax_id: "7701234567".to_string(),
            name: name.to_string(),
            revenue,
            site: "example.ru".to_string(),
            cat_evidence: evidence.to_string(),
            source: "test".to_string(),
            cat_product: None,
            employees: None,
            okved_main: None,
            country: Some("Россия".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    #[test]
    fn test_valid_record() {
        assert!(record("ООО Ромашка", Some(150_000_000.0), "").is_valid());
        assert!(record("ООО Ромашка", None, "").is_valid());
    }

    #[test]
    fn test_invalid_without_identity() {
        let mut r = record("ООО Ромашка", None, "");
        r.tax_id.clear();
        assert!(!r.is_valid());

        let r = record("", None, "");
        assert!(!r.is_valid());
    }

    #[test]
    fn test_invalid_below_floor() {
        assert!(!record("ООО Ромашка", Some(99_999_999.0), "").is_valid());
    }

    #[test]
    fn test_fill_product_never_replaces() {
        let mut r = record("ООО Ромашка", None, "");
        r.fill_product("memoQ");
        r.fill_product("Trados");
        assert_eq!(r.cat_product.as_deref(), Some("memoQ"));

        r.cat_product = Some("  ".to_string());
        r.fill_product("Trados");
        assert_eq!(r.cat_product.as_deref(), Some("Trados"));
    }
}
