//! Runtime configuration: the category table, API endpoints, and credentials.
//!
//! Configuration is loaded once at startup and handed to each component at
//! construction. Nothing reads the environment after that point.
//!
//! # YAML layout
//!
//! Every section is optional; missing fields fall back to the built-in
//! defaults, so a file overriding only the model is valid:
//!
//! ```yaml
//! completion:
//!   model: gpt-4o-mini
//! categories:
//!   - label: EHR News
//!     query: "EHR OR 'Electronic Health Records'"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument};
use url::Url;

/// A topic bucket and the search-query fragment that scopes it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub label: String,
    pub query: String,
}

impl Category {
    pub fn new(label: &str, query: &str) -> Self {
        Self {
            label: label.to_string(),
            query: query.to_string(),
        }
    }
}

/// Settings for the news-search API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub language: String,
    pub sort_by: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://newsapi.org/v2/everything".to_string(),
            language: "en".to_string(),
            sort_by: "publishedAt".to_string(),
            page_size: 5,
            timeout_secs: 10,
        }
    }
}

/// Settings for the chat-completion API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// How many articles per category are put into the prompt.
    pub max_articles_per_category: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_articles_per_category: 3,
        }
    }
}

/// Everything except secrets. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub search: SearchConfig,
    pub completion: CompletionConfig,
    pub summary: SummaryConfig,
    /// Ordered; the order here is the order categories are offered and fetched.
    pub categories: Vec<Category>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            completion: CompletionConfig::default(),
            summary: SummaryConfig::default(),
            categories: default_categories(),
        }
    }
}

impl DashboardConfig {
    /// Load a YAML config file and validate it.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&raw)?;
        info!(categories = config.categories.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, Box<dyn Error>> {
        let config: DashboardConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        Url::parse(&self.search.endpoint)?;
        Url::parse(&self.completion.endpoint)?;

        if !(1..=100).contains(&self.search.page_size) {
            return Err(format!(
                "search.page_size must be between 1 and 100, got {}",
                self.search.page_size
            )
            .into());
        }
        if self.search.timeout_secs == 0 {
            return Err("search.timeout_secs must be at least 1".into());
        }
        if self.summary.max_articles_per_category == 0 {
            return Err("summary.max_articles_per_category must be at least 1".into());
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.label.trim().is_empty() {
                return Err("category labels must not be empty".into());
            }
            if category.query.trim().is_empty() {
                return Err(format!("category '{}' has an empty query", category.label).into());
            }
            if !seen.insert(category.label.as_str()) {
                return Err(format!("duplicate category label '{}'", category.label).into());
            }
        }
        debug!(categories = self.categories.len(), "Configuration validated");
        Ok(())
    }

    pub fn category(&self, label: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.label == label)
    }

    pub fn labels(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.label.clone()).collect()
    }
}

/// API keys, read once from the environment (or `.env`).
///
/// Missing keys are kept as empty strings; the upstream APIs reject them
/// and that failure flows through the normal error paths.
#[derive(Clone, Default)]
pub struct Credentials {
    pub news_api_key: String,
    pub openai_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("news_api_key", &redact(&self.news_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .finish()
    }
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() { "<unset>" } else { "<redacted>" }
}

/// Load `.env` from the working directory, falling back to
/// `~/.config/health_it_news/.env`. Real environment variables win.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("health_it_news").join(".env");
        if path.exists() && dotenvy::from_path(&path).is_ok() {
            debug!(path = %path.display(), "Loaded .env");
        }
    }
}

/// The built-in category table.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "EHR News",
            "EHR OR 'Electronic Health Records' OR EMR OR 'Electronic Medical Records' OR 'Epic Systems' OR Cerner OR 'Oracle Health'",
        ),
        Category::new(
            "Regulatory & Compliance",
            "ONC OR 'Health IT' OR HealthIT.gov OR USCDI OR 'FHIR compliance' OR 'HHS regulations' OR CMS OR 'EHR certification' OR 'healthcare compliance' OR 'EHR regulations'",
        ),
        Category::new(
            "FHIR & Interoperability",
            "FHIR OR 'HL7 FHIR' OR 'FHIR R5' OR 'SMART on FHIR' OR 'healthcare interoperability' OR 'health data exchange' OR 'EHR interoperability'",
        ),
        Category::new(
            "Government Policies",
            "'healthcare Executive Order' OR 'healthcare Federal Register' OR 'healthcare policy' OR 'White House healthcare' OR 'HHS policy' OR 'healthcare regulation'",
        ),
        Category::new(
            "AI in Healthcare",
            "'AI healthcare' OR 'machine learning healthcare' OR 'OpenAI healthcare' OR 'LLM healthcare' OR 'predictive analytics EHR' OR 'AI medical' OR 'healthcare automation'",
        ),
        Category::new(
            "Market Trends",
            "'Epic EHR' OR 'Cerner EHR' OR 'Athenahealth EHR' OR 'Meditech EHR' OR 'EHR vendor' OR 'health tech startup' OR 'healthcare investment' OR 'healthcare M&A'",
        ),
    ]
}
