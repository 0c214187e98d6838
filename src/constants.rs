/// Source name constants to keep collector identifiers consistent across the codebase

// Source names accepted on the command line
pub const RUSPROFILE_SOURCE: &str = "rusprofile";
pub const CATALOG_SOURCE: &str = "catalog";
pub const ALL_SOURCES: &str = "all";

/// Provenance tag of the fallback demonstration records
pub const DEMO_SOURCE: &str = "demo";

pub const DEFAULT_OUTPUT_PATH: &str = "data/companies.csv";

/// Expand a comma-separated `--sources` value into concrete source names.
/// Unknown names are returned in the second vector.
pub fn resolve_sources(list: &str) -> (Vec<&'static str>, Vec<String>) {
    let mut resolved = Vec::new();
    let mut unknown = Vec::new();

    for name in list.split(',').map(|s| s.trim().to_lowercase()) {
        let names: &[&'static str] = match name.as_str() {
            ALL_SOURCES => &[RUSPROFILE_SOURCE, CATALOG_SOURCE],
            RUSPROFILE_SOURCE => &[RUSPROFILE_SOURCE],
            CATALOG_SOURCE => &[CATALOG_SOURCE],
            "" => &[],
            _ => {
                unknown.push(name.clone());
                &[]
            }
        };
        for n in names {
            if !resolved.contains(n) {
                resolved.push(*n);
            }
        }
    }

    (resolved, unknown)
}

/// Get all supported source names
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![RUSPROFILE_SOURCE, CATALOG_SOURCE, ALL_SOURCES]
}
