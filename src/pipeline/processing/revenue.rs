use tracing::{info, warn};

use crate::domain::CompanyRecord;

/// Anything above this is treated as a data-entry error (rubles).
pub const MAX_PLAUSIBLE_REVENUE: f64 = 1_000_000_000_000.0;

/// True when revenue is known and reaches `threshold`.
pub fn has_sufficient_revenue(record: &CompanyRecord, threshold: f64) -> bool {
    matches!(record.revenue, Some(revenue) if revenue >= threshold)
}

/// Keep records whose known revenue is at least `threshold`.
/// Unknown revenue never passes.
pub fn filter_by_revenue(records: Vec<CompanyRecord>, threshold: f64) -> Vec<CompanyRecord> {
    records
        .into_iter()
        .filter(|record| {
            let keep = has_sufficient_revenue(record, threshold);
            if !keep {
                info!(
                    company = %record.name,
                    revenue = ?record.revenue,
                    threshold,
                    "Company excluded: revenue below threshold"
                );
            }
            keep
        })
        .collect()
}

/// Sanity check independent of the configured threshold: revenue must be
/// known, positive and not above [`MAX_PLAUSIBLE_REVENUE`].
pub fn is_plausible_revenue(record: &CompanyRecord) -> bool {
    match record.revenue {
        Some(revenue) => revenue > 0.0 && revenue <= MAX_PLAUSIBLE_REVENUE,
        None => false,
    }
}

/// Data-quality gate; callers opt in, the default pipeline does not apply it.
pub fn validate_revenue_entries(records: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
    records
        .into_iter()
        .filter(|record| {
            let keep = is_plausible_revenue(record);
            if !keep {
                warn!(
                    company = %record.name,
                    revenue = ?record.revenue,
                    "Company excluded: implausible revenue data"
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::record;

    #[test]
    fn test_threshold_is_inclusive() {
        let records = vec![
            record("big", Some(150_000_000.0), ""),
            record("exact", Some(100_000_000.0), ""),
            record("small", Some(50_000_000.0), ""),
        ];
        let kept = filter_by_revenue(records, 100_000_000.0);
        let names: Vec<_> = kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["big", "exact"]);
    }

    #[test]
    fn test_unknown_revenue_always_excluded() {
        for threshold in [0.0, 1.0, 100_000_000.0] {
            let kept = filter_by_revenue(vec![record("unknown", None, "")], threshold);
            assert!(kept.is_empty(), "threshold {threshold}");
        }
    }

    #[test]
    fn test_validate_rejects_implausible_values() {
        let records = vec![
            record("zero", Some(0.0), ""),
            record("huge", Some(2.0e12), ""),
            record("unknown", None, ""),
            record("edge", Some(MAX_PLAUSIBLE_REVENUE), ""),
            record("normal", Some(3.0e8), ""),
        ];
        let kept = validate_revenue_entries(records);
        let names: Vec<_> = kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["edge", "normal"]);
    }
}
