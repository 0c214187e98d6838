use std::sync::Arc;

use crate::config::CatConfig;

/// Returned by [`EvidenceExtractor::find_evidence`] when nothing matches.
pub const NO_EVIDENCE: &str = "no explicit CAT evidence found";

/// At most this many matches end up in an evidence string.
pub const MAX_EVIDENCE_ITEMS: usize = 3;

/// A configured list entry paired with its lowercase form used for matching.
#[derive(Debug, Clone)]
pub(crate) struct Term {
    pub display: String,
    pub needle: String,
}

impl Term {
    fn new(entry: &str) -> Self {
        Self {
            display: entry.trim().to_string(),
            needle: entry.trim().to_lowercase(),
        }
    }

    /// Case-insensitive containment; `haystack` must already be lowercase.
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.contains(&self.needle)
    }
}

pub(crate) fn terms(entries: &[String]) -> Vec<Term> {
    entries.iter().map(|e| Term::new(e)).collect()
}

/// Scans free text against the configured keyword, product and phrase lists
#[derive(Debug, Clone)]
pub struct EvidenceExtractor {
    keywords: Vec<Term>,
    products: Vec<Term>,
    phrases: Vec<Term>,
}

impl EvidenceExtractor {
    pub fn new(config: Arc<CatConfig>) -> Self {
        Self {
            keywords: terms(&config.cat_keywords),
            products: terms(&config.cat_products),
            phrases: terms(&config.cat_phrases),
        }
    }

    /// Every match in check order: keywords, then products, then phrases.
    pub fn matches(&self, text: &str) -> Vec<String> {
        let text = text.to_lowercase();
        let keywords = self
            .keywords
            .iter()
            .filter(|t| t.found_in(&text))
            .map(|t| format!("mention of '{}'", t.display));
        let products = self
            .products
            .iter()
            .filter(|t| t.found_in(&text))
            .map(|t| format!("use of product {}", t.display));
        let phrases = self
            .phrases
            .iter()
            .filter(|t| t.found_in(&text))
            .map(|t| format!("presence of description '{}'", t.display));

        keywords.chain(products).chain(phrases).collect()
    }

    /// The first three matches joined with `"; "`, or [`NO_EVIDENCE`].
    pub fn find_evidence(&self, text: &str) -> String {
        let items = self.matches(text);
        if items.is_empty() {
            return NO_EVIDENCE.to_string();
        }
        items
            .into_iter()
            .take(MAX_EVIDENCE_ITEMS)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// First configured product found in the text, in display casing.
    pub fn detect_product(&self, text: &str) -> Option<String> {
        let text = text.to_lowercase();
        self.products
            .iter()
            .find(|t| t.found_in(&text))
            .map(|t| t.display.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EvidenceExtractor {
        EvidenceExtractor::new(Arc::new(CatConfig::default()))
    }

    fn small_extractor() -> EvidenceExtractor {
        let config = CatConfig {
            cat_keywords: vec!["localization".into(), "glossary".into()],
            cat_products: vec!["Trados".into(), "memoQ".into()],
            cat_phrases: vec!["translation management system".into()],
            ..CatConfig::default()
        };
        EvidenceExtractor::new(Arc::new(config))
    }

    #[test]
    fn test_product_mention_is_reported() {
        let evidence = small_extractor().find_evidence("We run TRADOS Studio 2022 in-house");
        assert!(evidence.contains("use of product Trados"), "{evidence}");
    }

    #[test]
    fn test_order_and_limit() {
        let text = "Localization team, shared glossary, Trados and memoQ, \
                    plus a translation management system";
        let evidence = small_extractor().find_evidence(text);
        assert_eq!(
            evidence,
            "mention of 'localization'; mention of 'glossary'; use of product Trados"
        );
        assert_eq!(small_extractor().matches(text).len(), 5);
    }

    #[test]
    fn test_phrase_format() {
        let evidence = small_extractor().find_evidence("Our Translation Management System is fast");
        assert_eq!(
            evidence,
            "presence of description 'translation management system'"
        );
    }

    #[test]
    fn test_sentinel_when_nothing_matches() {
        assert_eq!(small_extractor().find_evidence("Bakery and coffee"), NO_EVIDENCE);
        assert_eq!(small_extractor().find_evidence(""), NO_EVIDENCE);
    }

    #[test]
    fn test_detect_product_returns_first_listed() {
        let ex = small_extractor();
        assert_eq!(
            ex.detect_product("memoQ and Trados side by side"),
            Some("Trados".to_string())
        );
        assert_eq!(ex.detect_product("memoq server"), Some("memoQ".to_string()));
        assert_eq!(ex.detect_product("no tools here"), None);
    }

    #[test]
    fn test_cyrillic_keywords_match_case_insensitively() {
        let evidence = extractor().find_evidence("ЛОКАЛИЗАЦИЯ программного обеспечения");
        assert!(evidence.contains("mention of 'локализация'"), "{evidence}");
    }
}
