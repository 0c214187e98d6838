use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{FinderError, Result};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV_VAR: &str = "CAT_FINDER_CONFIG";

/// Keyword lists and thresholds shared read-only by every pipeline stage.
///
/// Loaded once at startup and passed around as `Arc<CatConfig>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatConfig {
    /// Generic CAT vocabulary, each hit is worth one point
    pub cat_keywords: Vec<String>,
    /// Product names in display casing, each hit is worth two points
    pub cat_products: Vec<String>,
    /// Descriptive phrases, each hit is worth one point
    pub cat_phrases: Vec<String>,
    /// Revenue filter threshold (rubles)
    pub min_revenue: f64,
    pub target_countries: Vec<String>,
    pub http: HttpConfig,
}

/// Outbound request policy for website analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Minimum gap between two outbound requests
    pub min_delay_ms: u64,
    /// Upper bound of the random extra wait added on top of `min_delay_ms`
    pub jitter_ms: u64,
    /// Pause between two records of a batch
    pub batch_delay_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            min_delay_ms: 1000,
            jitter_ms: 500,
            batch_delay_ms: 1000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for CatConfig {
    fn default() -> Self {
        Self {
            cat_keywords: strings(&[
                "translation memory",
                "tm",
                "терминология",
                "терминологическая база",
                "cat tool",
                "cat-система",
                "tms",
                "translation management",
                "локализация",
                "localization",
                "переводческая память",
            ]),
            cat_products: strings(&[
                "Trados",
                "memoQ",
                "Across",
                "Wordfast",
                "Memsource",
                "Smartcat",
                "Phrase",
                "Lokalise",
                "Crowdin",
                "Translation Workspace",
                "SDL Trados",
                "Xbench",
                "Verifika",
                "Apertium",
            ]),
            cat_phrases: strings(&[
                "система управления переводами",
                "компьютерная поддержка переводов",
                "платформа локализации",
                "translation management system",
                "cat platform",
                "collaborative translation",
            ]),
            min_revenue: 100_000_000.0,
            target_countries: strings(&["Россия", "RU", "РФ", "Russia"]),
            http: HttpConfig::default(),
        }
    }
}

impl CatConfig {
    /// Load configuration from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FinderError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CatConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path wins, then `CAT_FINDER_CONFIG`, then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.min_revenue.is_finite() || self.min_revenue < 0.0 {
            return Err(FinderError::Config(format!(
                "min_revenue must be a non-negative number, got {}",
                self.min_revenue
            )));
        }
        let lists = [
            ("cat_keywords", &self.cat_keywords),
            ("cat_products", &self.cat_products),
            ("cat_phrases", &self.cat_phrases),
        ];
        for (name, list) in lists {
            if list.iter().any(|entry| entry.trim().is_empty()) {
                return Err(FinderError::Config(format!("{name} contains an empty entry")));
            }
        }
        Ok(())
    }

    /// Country stamped on records produced by the built-in collectors.
    pub fn home_country(&self) -> Option<&str> {
        self.target_countries.first().map(String::as_str)
    }
}
