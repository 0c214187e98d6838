use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::app::ports::{HttpClientPort, RateLimiterPort, WebsiteEvidencePort};
use crate::domain::CompanyRecord;
use crate::pipeline::processing::clean::truncate_text;
use crate::pipeline::processing::evidence::EvidenceExtractor;

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Visible text of an HTML page, whitespace collapsed.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut pieces = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| SKIPPED_ELEMENTS.contains(&e.name())))
            .unwrap_or(false);
        if !hidden {
            pieces.push(text.trim());
        }
    }

    pieces
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `https://` is assumed when the site has no scheme.
pub fn site_url(site: &str) -> String {
    if site.starts_with("http://") || site.starts_with("https://") {
        site.to_string()
    } else {
        format!("https://{site}")
    }
}

/// Looks for CAT evidence on company websites
pub struct WebsiteAnalyzer {
    http: Arc<dyn HttpClientPort>,
    limiter: Arc<dyn RateLimiterPort>,
    extractor: EvidenceExtractor,
    batch_delay: Duration,
}

impl WebsiteAnalyzer {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        limiter: Arc<dyn RateLimiterPort>,
        extractor: EvidenceExtractor,
        batch_delay: Duration,
    ) -> Self {
        Self {
            http,
            limiter,
            extractor,
            batch_delay,
        }
    }

    async fn fetch_text(&self, site: &str) -> Option<String> {
        let url = site_url(site);
        self.limiter.acquire().await;

        match self.http.get(&url).await {
            Ok(resp) if resp.is_success() && resp.is_html() => Some(page_text(&resp.text())),
            Ok(resp) if resp.is_success() => {
                debug!(url = %url, content_type = %resp.content_type, "Skipping non-HTML response");
                None
            }
            Ok(resp) => {
                warn!(url = %url, status = resp.status, "Website returned non-success status");
                None
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to fetch website");
                None
            }
        }
    }
}

#[async_trait]
impl WebsiteEvidencePort for WebsiteAnalyzer {
    #[instrument(skip(self, record), fields(site = %record.site))]
    async fn enrich(&self, mut record: CompanyRecord) -> CompanyRecord {
        if record.site.trim().is_empty() {
            debug!(company = %record.name, "No website to analyze");
            return record;
        }

        let Some(text) = self.fetch_text(&record.site).await else {
            return record;
        };
        if text.is_empty() {
            return record;
        }

        record.cat_evidence = truncate_text(&self.extractor.find_evidence(&text));
        if let Some(product) = self.extractor.detect_product(&text) {
            record.fill_product(&product);
        }
        debug!(company = %record.name, evidence = %record.cat_evidence, "Website analyzed");
        record
    }

    async fn enrich_all(&self, records: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
        let total = records.len();
        let mut enriched = Vec::with_capacity(total);

        for (i, record) in records.into_iter().enumerate() {
            info!("Analyzing website {}/{}: {}", i + 1, total, record.site);
            enriched.push(self.enrich(record).await);
            if i + 1 < total && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        enriched
    }
}
