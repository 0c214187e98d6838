use anyhow::Context;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::app::ports::{CompanyCollector, CompanyStorePort, WebsiteEvidencePort};
use crate::config::CatConfig;
use crate::domain::{CompanyRecord, RawCompany};
use crate::error::Result;
use crate::pipeline::fallback::demo_records;
use crate::pipeline::processing::classify::CatClassifier;
use crate::pipeline::processing::clean::clean_with_report;
use crate::pipeline::processing::revenue::{filter_by_revenue, validate_revenue_entries};

/// Counts and outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub collected: usize,
    pub cleaned: usize,
    pub dropped_in_cleaning: usize,
    pub after_revenue: usize,
    pub after_classification: usize,
    pub saved: usize,
    pub used_fallback: bool,
    pub fallback_reason: Option<String>,
    pub errors: Vec<String>,
    pub output_path: PathBuf,
}

impl PipelineReport {
    fn new(output_path: &Path) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            collected: 0,
            cleaned: 0,
            dropped_in_cleaning: 0,
            after_revenue: 0,
            after_classification: 0,
            saved: 0,
            used_fallback: false,
            fallback_reason: None,
            errors: Vec::new(),
            output_path: output_path.to_path_buf(),
        }
    }
}

/// Stage after which no records were left
#[derive(Debug)]
struct Exhausted(&'static str);

/// Records surviving the in-memory stages plus per-stage counts
pub struct StageOutput {
    pub records: Vec<CompanyRecord>,
    pub cleaned: usize,
    pub dropped_in_cleaning: usize,
    pub after_revenue: usize,
}

/// Sequences collectors, cleaning, filtering, classification, website
/// enrichment and persistence, falling back to demo data when a run yields
/// nothing.
pub struct CatPipeline {
    config: Arc<CatConfig>,
    collectors: Vec<Box<dyn CompanyCollector>>,
    website: Arc<dyn WebsiteEvidencePort>,
    store: Arc<dyn CompanyStorePort>,
    classifier: CatClassifier,
    strict_revenue: bool,
}

impl CatPipeline {
    pub fn new(
        config: Arc<CatConfig>,
        collectors: Vec<Box<dyn CompanyCollector>>,
        website: Arc<dyn WebsiteEvidencePort>,
        store: Arc<dyn CompanyStorePort>,
    ) -> Self {
        let classifier = CatClassifier::new(config.clone());
        Self {
            config,
            collectors,
            website,
            store,
            classifier,
            strict_revenue: false,
        }
    }

    /// Also drop records whose revenue fails the plausibility check.
    pub fn with_strict_revenue(mut self, strict: bool) -> Self {
        self.strict_revenue = strict;
        self
    }

    async fn collect_all(&self, report: &mut PipelineReport) -> Vec<RawCompany> {
        let mut all = Vec::new();
        for collector in &self.collectors {
            let source = collector.source_name();
            match collector.collect().await {
                Ok(records) => {
                    info!(source, count = records.len(), "Collector finished");
                    all.extend(records);
                }
                Err(e) => {
                    error!(source, error = %e, "Collector failed");
                    report.errors.push(format!("{source}: {e}"));
                }
            }
        }
        all
    }

    /// Cleaner, revenue filter, optional plausibility check and classifier.
    pub fn process(&self, raw: &[RawCompany]) -> StageOutput {
        let cleaning = clean_with_report(raw);
        let cleaned = cleaning.records.len();
        let dropped_in_cleaning = cleaning.dropped.len();

        let mut records = filter_by_revenue(cleaning.records, self.config.min_revenue);
        if self.strict_revenue {
            records = validate_revenue_entries(records);
        }
        let after_revenue = records.len();

        let records = self.classifier.classify(records);

        StageOutput {
            records,
            cleaned,
            dropped_in_cleaning,
            after_revenue,
        }
    }

    async fn try_run(
        &self,
        report: &mut PipelineReport,
    ) -> anyhow::Result<std::result::Result<Vec<CompanyRecord>, Exhausted>> {
        let raw = self.collect_all(report).await;
        report.collected = raw.len();
        counter!("cat_finder_records_in_total").increment(raw.len() as u64);
        info!("Collected {} companies", raw.len());
        if raw.is_empty() {
            return Ok(Err(Exhausted("collection")));
        }

        let stages = self.process(&raw);
        report.cleaned = stages.cleaned;
        report.dropped_in_cleaning = stages.dropped_in_cleaning;
        report.after_revenue = stages.after_revenue;
        report.after_classification = stages.records.len();

        counter!("cat_finder_records_dropped_total", "stage" => "clean")
            .increment(stages.dropped_in_cleaning as u64);
        counter!("cat_finder_records_dropped_total", "stage" => "revenue")
            .increment((stages.cleaned - stages.after_revenue) as u64);
        counter!("cat_finder_records_dropped_total", "stage" => "classify")
            .increment((stages.after_revenue - stages.records.len()) as u64);

        info!(
            "Cleaned {}, after revenue filter {}, after CAT classification {}",
            stages.cleaned,
            stages.after_revenue,
            stages.records.len()
        );

        if stages.cleaned == 0 {
            return Ok(Err(Exhausted("cleaning")));
        }
        if stages.after_revenue == 0 {
            return Ok(Err(Exhausted("revenue filter")));
        }
        if stages.records.is_empty() {
            return Ok(Err(Exhausted("classification")));
        }

        info!("Analyzing company websites...");
        let enriched = self.website.enrich_all(stages.records).await;
        let enhanced = self.classifier.enhance_evidence(enriched);

        self.store
            .save(&enhanced, &report.output_path)
            .with_context(|| format!("saving results to {}", report.output_path.display()))?;

        Ok(Ok(enhanced))
    }

    /// Run every stage and write `output_path`. The file always ends up
    /// non-empty; only a failure to write the demo fallback is returned.
    #[instrument(skip(self), fields(output = %output_path.display()))]
    pub async fn run(&self, output_path: &Path) -> Result<PipelineReport> {
        let mut report = PipelineReport::new(output_path);
        let started = std::time::Instant::now();
        info!(run_id = %report.run_id, "Starting collection and processing");

        let reason = match self.try_run(&mut report).await {
            Ok(Ok(records)) => {
                report.saved = records.len();
                None
            }
            Ok(Err(Exhausted(stage))) => {
                warn!("No companies left after {}; writing demonstration data", stage);
                Some(format!("no companies left after {stage}"))
            }
            Err(e) => {
                error!("Pipeline failed: {:#}; writing demonstration data", e);
                report.errors.push(format!("{e:#}"));
                Some(format!("pipeline error: {e:#}"))
            }
        };

        if let Some(reason) = reason {
            counter!("cat_finder_fallback_total").increment(1);
            let demo = demo_records();
            self.store.save(&demo, output_path)?;
            report.saved = demo.len();
            report.used_fallback = true;
            report.fallback_reason = Some(reason);
        }

        histogram!("cat_finder_pipeline_duration_seconds").record(started.elapsed().as_secs_f64());
        report.finished_at = Some(Utc::now());
        info!(
            run_id = %report.run_id,
            saved = report.saved,
            fallback = report.used_fallback,
            "Analysis finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::csv_store::CsvStore;
    use async_trait::async_trait;
    use serde_json::json;

    struct Passthrough;

    #[async_trait]
    impl WebsiteEvidencePort for Passthrough {
        async fn enrich(&self, record: CompanyRecord) -> CompanyRecord {
            record
        }
    }

    fn pipeline(config: CatConfig) -> CatPipeline {
        CatPipeline::new(
            Arc::new(config),
            Vec::new(),
            Arc::new(Passthrough),
            Arc::new(CsvStore::new()),
        )
    }

    fn raw(name: &str, revenue: serde_json::Value, evidence: &str) -> RawCompany {
        RawCompany {
            tax_id: "7701234567".to_string(),
            name: name.to_string(),
            revenue: Some(revenue),
            site: "example.ru".to_string(),
            cat_evidence: evidence.to_string(),
            source: "test".to_string(),
            ..RawCompany::default()
        }
    }

    #[test]
    fn test_process_counts_each_stage() {
        let input = vec![
            raw("Broken", json!(-1), "use of product Trados"),
            raw("Small", json!("50 000 000"), "use of product Trados"),
            raw("Plain", json!(150_000_000), "bakery"),
            raw("Huge", json!(5.0e12), "use of product memoQ"),
            raw("Good", json!("150 000 000 ₽"), "use of product Trados"),
        ];

        let out = pipeline(CatConfig::default()).process(&input);
        assert_eq!(out.cleaned, 4);
        assert_eq!(out.dropped_in_cleaning, 1);
        assert_eq!(out.after_revenue, 3);
        let names: Vec<_> = out.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Huge", "Good"]);
    }

    #[test]
    fn test_strict_revenue_is_opt_in() {
        let input = vec![raw("Huge", json!(5.0e12), "use of product memoQ")];
        let strict = pipeline(CatConfig::default()).with_strict_revenue(true);
        assert!(strict.process(&input).records.is_empty());
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let config = CatConfig {
            min_revenue: 10_000_000.0,
            ..CatConfig::default()
        };
        let input = vec![raw("Small", json!("50 000 000"), "use of product Trados")];
        assert_eq!(pipeline(config).process(&input).records.len(), 1);
    }
}
