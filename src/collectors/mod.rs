// Company data sources. All of them return mocked data; nothing here scrapes.

pub mod catalog;
pub mod registry;
pub mod static_source;

pub use catalog::CatalogCollector;
pub use registry::RegistryCollector;
pub use static_source::StaticCollector;

use std::sync::Arc;

use crate::app::ports::CompanyCollector;
use crate::config::CatConfig;
use crate::constants::{CATALOG_SOURCE, RUSPROFILE_SOURCE};

/// Build the collector registered under `source`, if any.
pub fn create_collector(source: &str, config: Arc<CatConfig>) -> Option<Box<dyn CompanyCollector>> {
    match source {
        RUSPROFILE_SOURCE => Some(Box::new(RegistryCollector::new(config))),
        CATALOG_SOURCE => Some(Box::new(CatalogCollector::new(config))),
        _ => None,
    }
}
