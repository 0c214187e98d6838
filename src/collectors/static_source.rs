use async_trait::async_trait;

use crate::app::ports::CompanyCollector;
use crate::domain::RawCompany;
use crate::error::Result;

/// Serves a fixed list of records; used for demos and tests
pub struct StaticCollector {
    name: &'static str,
    records: Vec<RawCompany>,
}

impl StaticCollector {
    pub fn new(name: &'static str, records: Vec<RawCompany>) -> Self {
        Self { name, records }
    }
}

#[async_trait]
impl CompanyCollector for StaticCollector {
    fn source_name(&self) -> &'static str {
        self.name
    }

    async fn collect(&self) -> Result<Vec<RawCompany>> {
        Ok(self.records.clone())
    }
}
