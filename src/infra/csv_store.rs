use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::app::ports::CompanyStorePort;
use crate::domain::CompanyRecord;
use crate::error::Result;

/// Column order of the output file
pub const COLUMNS: [&str; 10] = [
    "tax_id",
    "name",
    "revenue",
    "site",
    "cat_evidence",
    "source",
    "cat_product",
    "employees",
    "okved_main",
    "country",
];

/// One CSV row; numeric cells stay text so unparsable values load as unknown
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    tax_id: Option<String>,
    name: Option<String>,
    revenue: Option<String>,
    site: Option<String>,
    cat_evidence: Option<String>,
    source: Option<String>,
    cat_product: Option<String>,
    employees: Option<String>,
    okved_main: Option<String>,
    country: Option<String>,
}

impl From<&CompanyRecord> for CsvRow {
    fn from(record: &CompanyRecord) -> Self {
        Self {
            tax_id: Some(record.tax_id.clone()),
            name: Some(record.name.clone()),
            revenue: record.revenue.map(|r| r.to_string()),
            site: Some(record.site.clone()),
            cat_evidence: Some(record.cat_evidence.clone()),
            source: Some(record.source.clone()),
            cat_product: record.cat_product.clone(),
            employees: record.employees.map(|e| e.to_string()),
            okved_main: record.okved_main.clone(),
            country: record.country.clone(),
        }
    }
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|c| c.trim().to_string()).filter(|c| !c.is_empty())
}

impl From<CsvRow> for CompanyRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            tax_id: row.tax_id.unwrap_or_default(),
            name: row.name.unwrap_or_default(),
            revenue: non_empty(row.revenue)
                .and_then(|r| r.parse::<f64>().ok())
                .filter(|r| r.is_finite()),
            site: row.site.unwrap_or_default(),
            cat_evidence: row.cat_evidence.unwrap_or_default(),
            source: row.source.unwrap_or_default(),
            cat_product: non_empty(row.cat_product),
            // Tolerate "45.0" written by other tools
            employees: non_empty(row.employees).and_then(|e| {
                e.parse::<u32>()
                    .ok()
                    .or_else(|| e.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32))
            }),
            okved_main: non_empty(row.okved_main),
            country: non_empty(row.country),
        }
    }
}

/// UTF-8 CSV file with a header row and the fixed [`COLUMNS`]
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvStore;

impl CsvStore {
    pub fn new() -> Self {
        Self
    }
}

impl CompanyStorePort for CsvStore {
    fn save(&self, records: &[CompanyRecord], path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(COLUMNS)?;
        for record in records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()?;

        info!("Saved {} companies to {}", records.len(), path.display());
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Vec<CompanyRecord>> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
        let mut records = Vec::new();

        for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
            match row {
                Ok(row) => records.push(CompanyRecord::from(row)),
                Err(e) => warn!("Skipping malformed row {} in {}: {}", i + 1, path.display(), e),
            }
        }

        info!("Loaded {} companies from {}", records.len(), path.display());
        Ok(records)
    }
}
