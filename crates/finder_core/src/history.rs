/// Maximum number of entries retained in the search history.
pub const HISTORY_LIMIT: usize = 10;

/// Most-recent-first log of successfully resolved searches.
///
/// Bounded at [`HISTORY_LIMIT`]. Repeat searches are recorded again rather
/// than deduplicated, so the log reads as a timeline; removal by name
/// deletes every occurrence of that name.
#[derive(Debug, Default, Clone)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `username`, evicting the oldest entry once the log is full.
    pub fn record(&mut self, username: impl Into<String>) {
        self.entries.insert(0, username.into());
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Removes every occurrence of `username`, keeping the rest in order.
    /// Unknown names are a no-op.
    pub fn remove(&mut self, username: &str) {
        self.entries.retain(|entry| entry != username);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
