use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/bank/"]
struct BankAssets;

/// Category key that selects the union of every category pool.
pub const ALL_CATEGORY: &str = "all";
pub const ALL_CATEGORY_LABEL: &str = "All categories";

const BUILTIN_BANK: &str = "default.toml";

#[derive(Debug, Error)]
pub enum BankError {
    #[error("question {prompt:?} has {count} option(s), at least 2 are required")]
    TooFewOptions { prompt: String, count: usize },
    #[error("question {prompt:?} marks option {index} correct but only has {count} options")]
    CorrectIndexOutOfRange {
        prompt: String,
        index: usize,
        count: usize,
    },
    #[error("category key must not be empty")]
    EmptyCategoryKey,
    #[error("category key {0:?} is reserved")]
    ReservedCategoryKey(String),
    #[error("category {0:?} is defined more than once")]
    DuplicateCategory(String),
    #[error("bundled question bank {0:?} is missing")]
    MissingAsset(&'static str),
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML question bank: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON question bank: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(alias = "q", alias = "question")]
    pub prompt: String,
    #[serde(alias = "a", alias = "answers")]
    pub options: Vec<String>,
    #[serde(alias = "c", alias = "correct")]
    pub correct_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn new(prompt: &str, options: &[&str], correct_index: usize) -> Self {
        Self {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_index,
            explanation: None,
        }
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn correct_option(&self) -> &str {
        self.option(self.correct_index).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), BankError> {
        if self.options.len() < 2 {
            return Err(BankError::TooFewOptions {
                prompt: self.prompt.clone(),
                count: self.options.len(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(BankError::CorrectIndexOutOfRange {
                prompt: self.prompt.clone(),
                index: self.correct_index,
                count: self.options.len(),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct BankFile {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Read-only question pools keyed by category, in a fixed iteration order.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    categories: Vec<Category>,
}

impl QuestionBank {
    pub fn new(categories: Vec<Category>) -> Result<Self, BankError> {
        let mut seen = HashSet::new();
        for category in &categories {
            if category.key.is_empty() {
                return Err(BankError::EmptyCategoryKey);
            }
            if category.key == ALL_CATEGORY {
                return Err(BankError::ReservedCategoryKey(category.key.clone()));
            }
            if !seen.insert(category.key.as_str()) {
                return Err(BankError::DuplicateCategory(category.key.clone()));
            }
            for question in &category.questions {
                question.validate()?;
            }
        }
        Ok(Self { categories })
    }

    /// The bank compiled into the binary.
    pub fn builtin() -> Result<Self, BankError> {
        let file = BankAssets::get(BUILTIN_BANK).ok_or(BankError::MissingAsset(BUILTIN_BANK))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, BankError> {
        let parsed: BankFile = toml::from_str(content)?;
        Self::new(parsed.categories)
    }

    pub fn from_json_str(content: &str) -> Result<Self, BankError> {
        let parsed: BankFile = serde_json::from_str(content)?;
        Self::new(parsed.categories)
    }

    /// Load a bank from disk. `.json` files are read as JSON, anything else as TOML.
    pub fn load_file(path: &Path) -> Result<Self, BankError> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        key == ALL_CATEGORY || self.category(key).is_some()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        if key == ALL_CATEGORY {
            return Some(ALL_CATEGORY_LABEL);
        }
        self.category(key).map(|c| c.label.as_str())
    }

    /// Label for display, falling back to the raw key.
    pub fn display_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.label(key).unwrap_or(key)
    }

    /// Questions for `key`: `all` concatenates every pool in bank order,
    /// unknown keys resolve to an empty pool.
    pub fn pool(&self, key: &str) -> Vec<&Question> {
        if key == ALL_CATEGORY {
            return self
                .categories
                .iter()
                .flat_map(|c| c.questions.iter())
                .collect();
        }
        self.category(key)
            .map(|c| c.questions.iter().collect())
            .unwrap_or_default()
    }

    pub fn pool_size(&self, key: &str) -> usize {
        if key == ALL_CATEGORY {
            return self.categories.iter().map(|c| c.questions.len()).sum();
        }
        self.category(key).map_or(0, |c| c.questions.len())
    }

    /// Every selectable key, `all` first.
    pub fn selectable_keys(&self) -> Vec<&str> {
        std::iter::once(ALL_CATEGORY)
            .chain(self.categories.iter().map(|c| c.key.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(key: &str, questions: Vec<Question>) -> Category {
        Category {
            key: key.to_string(),
            label: key.to_uppercase(),
            questions,
        }
    }

    #[test]
    fn test_builtin_bank_loads() {
        let bank = QuestionBank::builtin().unwrap();
        assert!(bank.categories().len() >= 3);
        assert_eq!(bank.pool_size("history"), 5);
        for category in bank.categories() {
            assert!(!category.questions.is_empty(), "{} is empty", category.key);
        }
    }

    #[test]
    fn test_all_pool_concatenates_in_bank_order() {
        let bank = QuestionBank::new(vec![
            category("a", vec![Question::new("a1", &["x", "y"], 0)]),
            category(
                "b",
                vec![
                    Question::new("b1", &["x", "y"], 1),
                    Question::new("b2", &["x", "y"], 0),
                ],
            ),
        ])
        .unwrap();

        let prompts: Vec<&str> = bank.pool(ALL_CATEGORY).iter().map(|q| q.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["a1", "b1", "b2"]);
        assert_eq!(bank.pool_size(ALL_CATEGORY), 3);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let bank = QuestionBank::builtin().unwrap();
        assert!(bank.pool("astrology").is_empty());
        assert_eq!(bank.pool_size("astrology"), 0);
        assert_eq!(bank.label("astrology"), None);
        assert_eq!(bank.display_label("astrology"), "astrology");
    }

    #[test]
    fn test_labels() {
        let bank = QuestionBank::builtin().unwrap();
        assert_eq!(bank.label(ALL_CATEGORY), Some(ALL_CATEGORY_LABEL));
        assert_eq!(bank.label("history"), Some("History"));
    }

    #[test]
    fn test_rejects_out_of_range_correct_index() {
        let err = QuestionBank::new(vec![category(
            "a",
            vec![Question::new("broken", &["x", "y"], 2)],
        )])
        .unwrap_err();
        assert!(matches!(err, BankError::CorrectIndexOutOfRange { index: 2, .. }));
    }

    #[test]
    fn test_rejects_single_option_question() {
        let err =
            QuestionBank::new(vec![category("a", vec![Question::new("lonely", &["x"], 0)])])
                .unwrap_err();
        assert!(matches!(err, BankError::TooFewOptions { count: 1, .. }));
    }

    #[test]
    fn test_rejects_reserved_and_duplicate_keys() {
        let err = QuestionBank::new(vec![category("all", vec![])]).unwrap_err();
        assert!(matches!(err, BankError::ReservedCategoryKey(_)));

        let err = QuestionBank::new(vec![category("a", vec![]), category("a", vec![])]).unwrap_err();
        assert!(matches!(err, BankError::DuplicateCategory(_)));
    }

    #[test]
    fn test_json_bank_accepts_short_field_names() {
        let json = r#"{
            "categories": [
                { "key": "math", "label": "Math", "questions": [
                    { "q": "2 + 2?", "a": ["3", "4", "5"], "c": 1 },
                    { "question": "3 * 3?", "answers": ["9", "6"], "correct": 0,
                      "explanation": "Three threes." }
                ]}
            ]
        }"#;
        let bank = QuestionBank::from_json_str(json).unwrap();
        let pool = bank.pool("math");
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].correct_option(), "4");
        assert_eq!(pool[1].explanation.as_deref(), Some("Three threes."));
    }

    #[test]
    fn test_load_file_dispatches_on_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bank.toml");
        fs::write(
            &path,
            r#"
[[categories]]
key = "music"
label = "Music"

[[categories.questions]]
prompt = "How many strings does a standard guitar have?"
options = ["4", "6", "7"]
correct_index = 1
"#,
        )
        .unwrap();
        let bank = QuestionBank::load_file(&path).unwrap();
        assert_eq!(bank.selectable_keys(), vec![ALL_CATEGORY, "music"]);
    }
}
