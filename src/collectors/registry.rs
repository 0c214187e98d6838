use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::app::ports::CompanyCollector;
use crate::config::CatConfig;
use crate::constants::RUSPROFILE_SOURCE;
use crate::domain::RawCompany;
use crate::error::Result;

/// Activity searches run against the registry
const ACTIVITY_KEYWORDS: [&str; 5] = [
    "локализация",
    "переводческие услуги",
    "translation services",
    "cat системы",
    "tms платформы",
];

/// A description mentioning any of these counts as translation business
const RELEVANCE_MARKERS: [&str; 6] = ["локализ", "перевод", "translation", "cat", "tms", "память переводов"];

/// One search hit as the registry reports it
#[derive(Debug, Clone)]
struct RegistryEntry {
    tax_id: &'static str,
    name: &'static str,
    site: &'static str,
    description: &'static str,
    revenue: Value,
    employees: Value,
    okved: &'static str,
}

fn registry_fixture() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry {
            tax_id: "7701234567",
            name: "ООО \"Локализация Про\"",
            site: "https://www.localization-pro.ru",
            description: "Компания специализируется на локализации ПО и использует Trados Studio \
                          для работы с переводческой памятью.",
            revenue: json!("150 000 000 ₽"),
            employees: json!("25 человек"),
            okved: "62.01",
        },
        RegistryEntry {
            tax_id: "7712345678",
            name: "АО \"Транслейт Тех\"",
            site: "translatetech.ru",
            description: "Разработка CAT-систем и платформ для управления переводами. \
                          Используем собственную TMS.",
            revenue: json!(200_000_000),
            employees: json!(45),
            okved: "62.02",
        },
    ]
}

/// Short evidence phrase derived from a registry description.
pub fn registry_evidence(description: &str) -> &'static str {
    let description = description.to_lowercase();
    if description.contains("trados") {
        "mention of Trados Studio"
    } else if description.contains("tms") {
        "use of TMS"
    } else if description.contains("память переводов") {
        "use of translation memory"
    } else if description.contains("локализац") {
        "localization activity"
    } else {
        "mention of translation technologies"
    }
}

fn is_relevant(description: &str) -> bool {
    let description = description.to_lowercase();
    RELEVANCE_MARKERS.iter().any(|m| description.contains(m))
}

/// Company registry search (rusprofile-style), backed by a fixed result set
pub struct RegistryCollector {
    config: Arc<CatConfig>,
    search_delay: Duration,
}

impl RegistryCollector {
    pub fn new(config: Arc<CatConfig>) -> Self {
        let search_delay = Duration::from_millis(config.http.min_delay_ms);
        Self {
            config,
            search_delay,
        }
    }

    /// Base pause between two searches; a random extra of up to twice the
    /// base is added.
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    fn search(&self, keyword: &str) -> Vec<RegistryEntry> {
        let keyword = keyword.to_lowercase();
        registry_fixture()
            .into_iter()
            .filter(|entry| {
                let description = entry.description.to_lowercase();
                description.contains(&keyword) || is_relevant(&description)
            })
            .collect()
    }

    fn to_raw(&self, entry: RegistryEntry) -> RawCompany {
        RawCompany {
            tax_id: entry.tax_id.to_string(),
            name: entry.name.to_string(),
            revenue: Some(entry.revenue),
            site: entry.site.to_string(),
            cat_evidence: registry_evidence(entry.description).to_string(),
            source: RUSPROFILE_SOURCE.to_string(),
            cat_product: None,
            employees: Some(entry.employees),
            okved_main: Some(entry.okved.to_string()),
            country: self.config.home_country().map(str::to_string),
        }
    }

    async fn pause(&self) {
        if self.search_delay.is_zero() {
            return;
        }
        let base = self.search_delay.as_millis() as u64;
        let extra = rand::thread_rng().gen_range(0..=base * 2);
        tokio::time::sleep(Duration::from_millis(base + extra)).await;
    }
}

#[async_trait]
impl CompanyCollector for RegistryCollector {
    fn source_name(&self) -> &'static str {
        RUSPROFILE_SOURCE
    }

    #[instrument(skip(self))]
    async fn collect(&self) -> Result<Vec<RawCompany>> {
        let mut seen = HashSet::new();
        let mut companies = Vec::new();

        for (i, keyword) in ACTIVITY_KEYWORDS.iter().enumerate() {
            info!("Searching registry for activity: {}", keyword);
            for entry in self.search(keyword) {
                if !is_relevant(entry.description) {
                    continue;
                }
                if !seen.insert(entry.tax_id) {
                    debug!(tax_id = entry.tax_id, "Duplicate registry hit skipped");
                    continue;
                }
                companies.push(self.to_raw(entry));
            }
            if i + 1 < ACTIVITY_KEYWORDS.len() {
                self.pause().await;
            }
        }

        info!("Registry search found {} companies", companies.len());
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> RegistryCollector {
        RegistryCollector::new(Arc::new(CatConfig::default())).with_search_delay(Duration::ZERO)
    }

    #[test]
    fn test_evidence_priority() {
        assert_eq!(registry_evidence("Trados и TMS"), "mention of Trados Studio");
        assert_eq!(registry_evidence("собственная TMS"), "use of TMS");
        assert_eq!(registry_evidence("ведём память переводов"), "use of translation memory");
        assert_eq!(registry_evidence("Локализация игр"), "localization activity");
        assert_eq!(registry_evidence("бюро"), "mention of translation technologies");
    }

    #[test]
    fn test_relevance() {
        assert!(is_relevant("Бюро ПЕРЕВОДОВ"));
        assert!(!is_relevant("Продажа хлеба"));
    }

    #[tokio::test]
    async fn test_collect_deduplicates_across_searches() {
        let companies = collector().collect().await.unwrap();
        assert_eq!(companies.len(), 2);
        assert!(companies.iter().all(|c| c.source == RUSPROFILE_SOURCE));
        assert!(companies.iter().all(|c| c.country.as_deref() == Some("Россия")));
        assert_eq!(companies[0].cat_evidence, "mention of Trados Studio");
        assert_eq!(companies[1].cat_evidence, "use of TMS");
    }
}
