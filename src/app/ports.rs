use async_trait::async_trait;
use std::path::Path;

use crate::domain::{CompanyRecord, RawCompany};
use crate::error::Result;

/// A data source producing raw, unnormalized company records
#[async_trait]
pub trait CompanyCollector: Send + Sync {
    /// Provenance tag written into `source`
    fn source_name(&self) -> &'static str;

    async fn collect(&self) -> Result<Vec<RawCompany>>;
}

/// Replaces a record's evidence with what its website shows.
/// Fetch failures return the record unchanged.
#[async_trait]
pub trait WebsiteEvidencePort: Send + Sync {
    async fn enrich(&self, record: CompanyRecord) -> CompanyRecord;

    async fn enrich_all(&self, records: Vec<CompanyRecord>) -> Vec<CompanyRecord> {
        let mut enriched = Vec::with_capacity(records.len());
        for record in records {
            enriched.push(self.enrich(record).await);
        }
        enriched
    }
}

/// Flat-file persistence of the final company list
pub trait CompanyStorePort: Send + Sync {
    fn save(&self, records: &[CompanyRecord], path: &Path) -> Result<()>;
    fn load(&self, path: &Path) -> Result<Vec<CompanyRecord>>;
}

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for HTML bodies and for responses without a content type.
    pub fn is_html(&self) -> bool {
        let content_type = self.content_type.to_ascii_lowercase();
        content_type.is_empty() || content_type.contains("html")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[async_trait]
pub trait RateLimiterPort: Send + Sync {
    /// Wait until another outbound request is allowed.
    async fn acquire(&self);
}
