//! Planner configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::month::TargetMonth;

/// Environment variables that may hold the API key, in order of preference
pub const API_KEY_VARIABLES: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

fn default_endpoint() -> Url {
    // This is a valid constant URL
    Url::parse("https://generativelanguage.googleapis.com/").expect("valid default endpoint")
}

fn default_store_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("book-planner").join("store.json"),
        None => PathBuf::from("book-planner-store.json"),
    }
}

/// Everything a planner needs to know, supplied once at construction time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key for the Gemini API. It is usually taken from the environment rather than written in a file
    #[serde(skip_serializing)]
    pub api_key: String,
    pub endpoint: Url,
    /// Model used for the daily advice
    pub advice_model: String,
    /// Model used for the month plan
    pub plan_model: String,
    /// `None` means no timeout
    pub request_timeout_secs: Option<u64>,

    pub year: i32,
    pub month: u32,
    /// Language the advice should be written in
    pub language: String,
    /// Prefix of the text of plan items, e.g. `[집필] ...`. Defaults to the same language as the advice
    pub plan_label: String,

    pub store_path: PathBuf,
    /// Store key of the to-do lists
    pub calendar_key: String,
    /// Store key of the cached book plan
    pub plan_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            advice_model: "gemini-3-flash-preview".to_string(),
            plan_model: "gemini-3-pro-preview".to_string(),
            request_timeout_secs: None,
            year: 2026,
            month: 1,
            language: "Korean".to_string(),
            plan_label: "집필".to_string(),
            store_path: default_store_path(),
            calendar_key: "zhuge_liang_calendar_data_2026".to_string(),
            plan_key: "zhuge_liang_book_plan_2026".to_string(),
        }
    }
}

impl Config {
    /// Read a JSON configuration file. Missing fields get their default value
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .map_err(|err| Error::Config(format!("{:?}: {}", path, err)))?;
        Ok(config)
    }

    /// Fill in the API key from the first of [`API_KEY_VARIABLES`] that is set, unless a key is already known
    pub fn with_api_key_from_env(mut self) -> Self {
        if self.api_key.is_empty() {
            if let Some(key) = API_KEY_VARIABLES.iter().find_map(|var| std::env::var(var).ok()) {
                self.api_key = key;
            }
        }
        self
    }

    pub fn target_month(&self) -> Result<TargetMonth> {
        TargetMonth::new(self.year, self.month)
    }

    /// Check the values that cannot be checked by deserialization alone
    pub fn validate(&self) -> Result<()> {
        self.target_month()?;
        if self.calendar_key == self.plan_key {
            return Err(Error::Config("calendar_key and plan_key must differ".to_string()));
        }
        if self.plan_label.trim().is_empty() {
            return Err(Error::Config("plan_label cannot be empty".to_string()));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"year": 2027, "month": 3, "plan_label": "Draft"}"#).unwrap();
        assert_eq!(config.target_month().unwrap(), TargetMonth::new(2027, 3).unwrap());
        assert_eq!(config.plan_label, "Draft");
        assert_eq!(config.advice_model, "gemini-3-flash-preview");
        assert_eq!(config.endpoint.as_str(), "https://generativelanguage.googleapis.com/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_plan_items_match_the_advice_language() {
        let config = Config::default();
        assert_eq!(config.language, "Korean");
        assert_eq!(config.plan_label, "집필");
    }

    #[test]
    fn api_key_is_never_written() {
        let config = Config { api_key: "secret".to_string(), ..Config::default() };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("secret") == false);
    }

    #[test]
    fn invalid_configs() {
        let config = Config { month: 13, ..Config::default() };
        assert!(config.validate().is_err());

        let config = Config { plan_key: "same".to_string(), calendar_key: "same".to_string(), ..Config::default() };
        assert!(config.validate().is_err());
    }
}
