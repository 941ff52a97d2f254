use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::session::quiz::DEFAULT_DATE_FORMAT;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub default_category: Option<String>,
    #[serde(default)]
    pub default_count: Option<usize>,
    #[serde(default = "default_count_choices")]
    pub count_choices: Vec<usize>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub bank_path: Option<String>,
    #[serde(default = "default_save_notice_secs")]
    pub save_notice_secs: u64,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_count_choices() -> Vec<usize> {
    vec![5, 10, 20]
}
fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_save_notice_secs() -> u64 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_category: None,
            default_count: None,
            count_choices: default_count_choices(),
            date_format: default_date_format(),
            bank_path: None,
            save_notice_secs: default_save_notice_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizr")
            .join("config.toml")
    }

    /// Reset values that do not fit the loaded bank or make no sense.
    /// Call after deserialization and after CLI overrides.
    pub fn validate(&mut self, bank: &QuestionBank) {
        let mut seen = HashSet::new();
        self.count_choices.retain(|&n| n > 0 && seen.insert(n));
        if self.count_choices.is_empty() {
            self.count_choices = default_count_choices();
        }
        match self.default_count {
            Some(0) => self.default_count = None,
            Some(n) if !self.count_choices.contains(&n) => self.count_choices.push(n),
            _ => {}
        }
        if let Some(key) = &self.default_category
            && !bank.contains(key)
        {
            tracing::warn!(category = %key, "unknown default category ignored");
            self.default_category = None;
        }
        if self.date_format.trim().is_empty() {
            self.date_format = default_date_format();
        }
    }
}
