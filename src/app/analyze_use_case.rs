use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::app::ports::CompanyStorePort;
use crate::domain::CompanyRecord;
use crate::error::Result;

/// Revenue statistics over records with known revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

/// Summary of a previously written result file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub total: usize,
    /// Records passing the base validator
    pub valid: usize,
    pub revenue: Option<RevenueSummary>,
    /// Record count per source, ordered by source name
    pub by_source: BTreeMap<String, usize>,
}

pub fn analyze(records: &[CompanyRecord]) -> AnalysisReport {
    let revenues: Vec<f64> = records
        .iter()
        .filter_map(|r| r.revenue)
        .filter(|r| *r > 0.0)
        .collect();

    let revenue = if revenues.is_empty() {
        None
    } else {
        Some(RevenueSummary {
            average: revenues.iter().sum::<f64>() / revenues.len() as f64,
            max: revenues.iter().cloned().fold(f64::MIN, f64::max),
            min: revenues.iter().cloned().fold(f64::MAX, f64::min),
        })
    };

    let mut by_source = BTreeMap::new();
    for record in records {
        *by_source.entry(record.source.clone()).or_insert(0) += 1;
    }

    AnalysisReport {
        total: records.len(),
        valid: records.iter().filter(|r| r.is_valid()).count(),
        revenue,
        by_source,
    }
}

/// Load a result file and summarize it
pub struct AnalyzeUseCase<'a> {
    store: &'a dyn CompanyStorePort,
}

impl<'a> AnalyzeUseCase<'a> {
    pub fn new(store: &'a dyn CompanyStorePort) -> Self {
        Self { store }
    }

    pub fn run(&self, path: &Path) -> Result<AnalysisReport> {
        let records = self.store.load(path)?;
        Ok(analyze(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::record;
    use crate::infra::csv_store::CsvStore;
    use crate::pipeline::fallback::demo_records;
    use tempfile::tempdir;

    #[test]
    fn test_analyze_summarizes_revenue_and_sources() {
        let mut a = record("A", Some(150_000_000.0), "");
        a.source = "rusprofile".to_string();
        let mut b = record("B", Some(300_000_000.0), "");
        b.source = "catalog".to_string();
        let mut c = record("C", None, "");
        c.source = "rusprofile".to_string();
        c.tax_id.clear();

        let report = analyze(&[a, b, c]);
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 2);
        assert_eq!(
            report.revenue,
            Some(RevenueSummary {
                average: 225_000_000.0,
                max: 300_000_000.0,
                min: 150_000_000.0,
            })
        );
        let sources: Vec<_> = report.by_source.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(sources, vec![("catalog", 1), ("rusprofile", 2)]);
    }

    #[test]
    fn test_analyze_empty() {
        let report = analyze(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.revenue, None);
        assert!(report.by_source.is_empty());
    }

    #[test]
    fn test_use_case_reads_saved_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.csv");
        let store = CsvStore::new();
        store.save(&demo_records(), &path).unwrap();

        let report = AnalyzeUseCase::new(&store).run(&path).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 3);
        assert_eq!(report.by_source.get("demo"), Some(&3));
    }
}
