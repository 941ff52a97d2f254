use anyhow::Result;

use crate::session::result::QuizResult;
use crate::store::json_store::KeyValueStore;

pub const HISTORY_KEY: &str = "quizHistory";
pub const HISTORY_LIMIT: usize = 50;

/// Newest-first list of saved results, capped at [`HISTORY_LIMIT`].
pub struct HistoryStore<S> {
    kv: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Missing, unreadable or malformed history reads as empty.
    pub fn load(&self) -> Vec<QuizResult> {
        let Some(content) = self.kv.get(HISTORY_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Option<Vec<QuizResult>>>(&content) {
            Ok(history) => history.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("discarding unreadable history: {e}");
                Vec::new()
            }
        }
    }

    /// Prepend `result` and drop anything past the cap. Identical results are
    /// inserted again rather than deduplicated.
    pub fn append(&mut self, result: &QuizResult) -> Result<()> {
        let mut history = self.load();
        history.insert(0, result.clone());
        history.truncate(HISTORY_LIMIT);

        let json = serde_json::to_string(&history)?;
        self.kv.set(HISTORY_KEY, &json)?;
        tracing::info!(id = result.id, entries = history.len(), "result saved");
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.kv.remove(HISTORY_KEY)?;
        tracing::info!("history cleared");
        Ok(())
    }

    pub fn inner(&self) -> &S {
        &self.kv
    }
}
