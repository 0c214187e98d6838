use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::app::ports::CompanyCollector;
use crate::config::CatConfig;
use crate::constants::CATALOG_SOURCE;
use crate::domain::RawCompany;
use crate::error::Result;

/// A listing in an industry catalog
struct CatalogEntry {
    tax_id: &'static str,
    name: &'static str,
    site: &'static str,
    description: &'static str,
    revenue: u64,
    employees: u32,
    catalog: &'static str,
}

const CATALOG_ENTRIES: [CatalogEntry; 3] = [
    CatalogEntry {
        tax_id: "7812345678",
        name: "ООО \"Глобал Транслейт\"",
        site: "global-translate.com",
        description: "Международная компания по локализации",
        revenue: 300_000_000,
        employees: 80,
        catalog: "translation_directory",
    },
    CatalogEntry {
        tax_id: "7823456789",
        name: "АО \"Тех Локализация\"",
        site: "http://techlocal.ru",
        description: "Локализация IT-продуктов, используем Trados и MemoQ",
        revenue: 180_000_000,
        employees: 35,
        catalog: "it_localization_catalog",
    },
    CatalogEntry {
        tax_id: "7834567890",
        name: "ООО \"Медиа Локализация\"",
        site: "www.media-local.ru",
        description: "Локализация игр и медиа-контента",
        revenue: 120_000_000,
        employees: 28,
        catalog: "gaming_catalog",
    },
];

/// Short evidence phrase derived from a catalog description.
pub fn catalog_evidence(description: &str) -> &'static str {
    let description = description.to_lowercase();
    if description.contains("trados") {
        "catalog lists use of Trados"
    } else if description.contains("memoq") {
        "catalog lists use of MemoQ"
    } else if description.contains("локализац") {
        "localization activity according to catalog"
    } else {
        "company from a localization services catalog"
    }
}

/// Industry catalogs of translation and localization vendors
pub struct CatalogCollector {
    config: Arc<CatConfig>,
}

impl CatalogCollector {
    pub fn new(config: Arc<CatConfig>) -> Self {
        Self { config }
    }

    fn to_raw(&self, entry: &CatalogEntry) -> RawCompany {
        RawCompany {
            tax_id: entry.tax_id.to_string(),
            name: entry.name.to_string(),
            revenue: Some(json!(entry.revenue)),
            site: entry.site.to_string(),
            cat_evidence: catalog_evidence(entry.description).to_string(),
            source: entry.catalog.to_string(),
            cat_product: None,
            employees: Some(json!(entry.employees)),
            okved_main: None,
            country: self.config.home_country().map(str::to_string),
        }
    }
}

#[async_trait]
impl CompanyCollector for CatalogCollector {
    fn source_name(&self) -> &'static str {
        CATALOG_SOURCE
    }

    #[instrument(skip(self))]
    async fn collect(&self) -> Result<Vec<RawCompany>> {
        let companies: Vec<RawCompany> = CATALOG_ENTRIES.iter().map(|e| self.to_raw(e)).collect();
        info!("Catalog scan found {} companies", companies.len());
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_priority() {
        assert_eq!(catalog_evidence("Trados и MemoQ"), "catalog lists use of Trados");
        assert_eq!(catalog_evidence("memoq"), "catalog lists use of MemoQ");
        assert_eq!(
            catalog_evidence("Локализация игр"),
            "localization activity according to catalog"
        );
        assert_eq!(
            catalog_evidence("Перевод"),
            "company from a localization services catalog"
        );
    }

    #[tokio::test]
    async fn test_collect_tags_catalog_name() {
        let collector = CatalogCollector::new(Arc::new(CatConfig::default()));
        let companies = collector.collect().await.unwrap();
        assert_eq!(companies.len(), 3);
        assert_eq!(companies[1].source, "it_localization_catalog");
        assert_eq!(companies[1].cat_evidence, "catalog lists use of Trados");
        assert_eq!(companies[0].revenue, Some(json!(300_000_000)));
    }
}
