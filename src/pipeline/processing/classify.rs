use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CatConfig;
use crate::domain::CompanyRecord;
use crate::pipeline::processing::clean::truncate_text;
use crate::pipeline::processing::evidence::{terms, Term};

/// Minimum score for a company to count as a CAT user.
pub const MIN_CAT_SCORE: u32 = 2;

pub const KEYWORD_WEIGHT: u32 = 1;
pub const PRODUCT_WEIGHT: u32 = 2;
pub const PHRASE_WEIGHT: u32 = 1;

/// Product markers checked by [`CatClassifier::enhance_evidence`], in priority
/// order. This is deliberately narrower than `cat_products`.
const PRODUCT_MARKERS: [(&str, &str); 3] = [("trados", "Trados"), ("memoq", "MemoQ"), ("tms", "TMS")];

/// Evidence opening with this was already phrased as a mention and is left as is.
const MENTION_MARKER: &str = "mention";
const USE_PREFIX: &str = "use of ";

/// Scores companies against the configured CAT vocabulary
#[derive(Debug, Clone)]
pub struct CatClassifier {
    keywords: Vec<Term>,
    products: Vec<Term>,
    phrases: Vec<Term>,
}

impl CatClassifier {
    pub fn new(config: Arc<CatConfig>) -> Self {
        Self {
            keywords: terms(&config.cat_keywords),
            products: terms(&config.cat_products),
            phrases: terms(&config.cat_phrases),
        }
    }

    /// Every list entry found in name, evidence and product contributes its
    /// weight once, however often it occurs.
    pub fn score(&self, record: &CompanyRecord) -> u32 {
        let text = format!(
            "{} {} {}",
            record.name,
            record.cat_evidence,
            record.cat_product.as_deref().unwrap_or("")
        )
        .to_lowercase();

        let hits = |list: &[Term], weight: u32| -> u32 {
            list.iter().filter(|t| t.found_in(&text)).count() as u32 * weight
        };

        hits(&self.keywords, KEYWORD_WEIGHT)
            + hits(&self.products, PRODUCT_WEIGHT)
            + hits(&self.phrases, PHRASE_WEIGHT)
    }

    pub fn has_cat_system(&self, record: &CompanyRecord) -> bool {
        self.score(record) >= MIN_CAT_SCORE
    }

    /// Keep companies whose score reaches [`MIN_CAT_SCORE`].
    pub fn classify(&self, records: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
        records
            .into_iter()
            .filter(|record| {
                let score = self.score(record);
                if score < MIN_CAT_SCORE {
                    info!(company = %record.name, score, "Company excluded: no CAT system indicators");
                    return false;
                }
                debug!(company = %record.name, score, "Company classified as CAT user");
                true
            })
            .collect()
    }

    /// Fill `cat_product` from a small marker set and, for the flagship
    /// product, phrase the evidence as usage. Applying it twice is a no-op.
    pub fn enhance_record(&self, record: &mut CompanyRecord) {
        let text = format!("{} {}", record.name, record.cat_evidence).to_lowercase();

        let Some(&(marker, label)) = PRODUCT_MARKERS
            .iter()
            .find(|(marker, _)| text.contains(marker))
        else {
            return;
        };

        record.fill_product(label);

        if marker != PRODUCT_MARKERS[0].0 {
            return;
        }

        let evidence = record.cat_evidence.to_lowercase();
        if evidence.starts_with(MENTION_MARKER) || evidence.starts_with(USE_PREFIX) {
            return;
        }

        let product = record.cat_product.as_deref().unwrap_or(label);
        let rewritten = if record.cat_evidence.is_empty() {
            format!("{USE_PREFIX}{product}")
        } else {
            format!("{USE_PREFIX}{product} ({})", record.cat_evidence)
        };
        record.cat_evidence = truncate_text(&rewritten);
    }

    pub fn enhance_evidence(&self, mut records: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
        for record in records.iter_mut() {
            self.enhance_record(record);
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::record;
    use crate::pipeline::processing::clean::MAX_EVIDENCE_CHARS;

    fn classifier() -> CatClassifier {
        CatClassifier::new(Arc::new(CatConfig::default()))
    }

    #[test]
    fn test_single_product_is_enough() {
        let r = record("Acme", Some(2e8), "they use memoQ");
        assert_eq!(classifier().score(&r), 2);
        assert!(classifier().has_cat_system(&r));
    }

    #[test]
    fn test_each_entry_counts_once() {
        let r = record("Acme", None, "memoq memoq memoq");
        assert_eq!(classifier().score(&r), 2);
    }

    #[test]
    fn test_product_field_is_scored() {
        let mut r = record("Acme", None, "");
        assert_eq!(classifier().score(&r), 0);
        r.cat_product = Some("Smartcat".to_string());
        assert_eq!(classifier().score(&r), 2);
    }

    #[test]
    fn test_classify_filters_weak_evidence() {
        let records = vec![
            record("Trados Partner", None, ""),
            record("Bakery", None, "bread and buns"),
            record("Acme", None, "localization and cat tool"),
        ];
        let kept = classifier().classify(records);
        let names: Vec<_> = kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Trados Partner", "Acme"]);
    }

    #[test]
    fn test_score_is_monotonic_in_evidence() {
        let c = classifier();
        let base = record("Acme", None, "localization services");
        let mut extended = base.clone();
        extended.cat_evidence.push_str("; use of product Wordfast");
        assert!(c.score(&extended) >= c.score(&base));
        assert_eq!(c.score(&extended), c.score(&base) + 2);
    }

    #[test]
    fn test_enhance_trados_rewrites_evidence() {
        let mut r = record("Acme", None, "trados in catalog");
        classifier().enhance_record(&mut r);
        assert_eq!(r.cat_product.as_deref(), Some("Trados"));
        assert_eq!(r.cat_evidence, "use of Trados (trados in catalog)");
    }

    #[test]
    fn test_enhance_keeps_mentions_and_existing_product() {
        let mut r = record("Acme", None, "mention of Trados Studio");
        r.cat_product = Some("SDL Trados".to_string());
        classifier().enhance_record(&mut r);
        assert_eq!(r.cat_product.as_deref(), Some("SDL Trados"));
        assert_eq!(r.cat_evidence, "mention of Trados Studio");
    }

    #[test]
    fn test_enhance_rewrites_mention_that_is_not_leading() {
        let mut r = record("Acme", None, "localization activity; mention of 'trados'");
        classifier().enhance_record(&mut r);
        assert_eq!(
            r.cat_evidence,
            "use of Trados (localization activity; mention of 'trados')"
        );
    }

    #[test]
    fn test_enhance_priority_order() {
        let mut r = record("Acme", None, "memoQ and an in-house TMS");
        classifier().enhance_record(&mut r);
        assert_eq!(r.cat_product.as_deref(), Some("MemoQ"));
        assert_eq!(r.cat_evidence, "memoQ and an in-house TMS");

        let mut r = record("Acme", None, "own TMS");
        classifier().enhance_record(&mut r);
        assert_eq!(r.cat_product.as_deref(), Some("TMS"));

        let mut r = record("Acme", None, "nothing relevant");
        classifier().enhance_record(&mut r);
        assert_eq!(r.cat_product, None);
    }

    #[test]
    fn test_enhance_is_idempotent() {
        let c = classifier();
        let records = vec![
            record("Acme", None, "trados in catalog"),
            record("Trados Partner", None, ""),
            record("Beta", None, &"trados ".repeat(60)),
            record("Gamma", None, "memoq"),
        ];
        let once = c.enhance_evidence(records);
        let twice = c.enhance_evidence(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once[1].cat_evidence, "use of Trados");
        assert_eq!(once[2].cat_evidence.chars().count(), MAX_EVIDENCE_CHARS);
    }
}
