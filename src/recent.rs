use std::collections::HashMap;
use tracing::debug;

const RECENT_FILES_KEY: &str = "recent_files";
pub const MAX_RECENT_FILES: usize = 20;

/// Key-value settings supplied by the host application.
///
/// Implementations own persistence and any cross-process locking.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// Most-recently-used file list, newest first, stored as one comma-joined
/// value.
pub struct RecentFiles<S: SettingsStore> {
    store: S,
}

impl<S: SettingsStore> RecentFiles<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn list(&self) -> Vec<String> {
        match self.store.get(RECENT_FILES_KEY) {
            Some(joined) if !joined.is_empty() => joined.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Move `path` to the front, dropping the oldest entry past the limit.
    pub fn add(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }

        let mut files = self.list();
        files.retain(|existing| existing != path);
        files.insert(0, path.to_string());
        files.truncate(MAX_RECENT_FILES);
        self.save(&files);
    }

    /// Remove `path`. The store is only written when something was removed.
    pub fn remove(&mut self, path: &str) {
        if path.is_empty() {
            return;
        }

        let mut files = self.list();
        let before = files.len();
        files.retain(|existing| existing != path);
        if files.len() != before {
            self.save(&files);
        }
    }

    fn save(&mut self, files: &[String]) {
        debug!(count = files.len(), "saving recent files");
        self.store.set(RECENT_FILES_KEY, files.join(","));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts writes so tests can check when the store is touched.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: usize,
    }

    impl SettingsStore for CountingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) {
            self.writes += 1;
            self.inner.set(key, value);
        }
    }

    #[test]
    fn test_add_to_empty_list() {
        let mut recent = RecentFiles::new(MemoryStore::new());
        recent.add("C:\\notes.txt");
        assert_eq!(recent.list(), vec!["C:\\notes.txt"]);
    }

    #[test]
    fn test_existing_file_moves_to_top() {
        let mut recent = RecentFiles::new(MemoryStore::new());
        recent.add("a.txt");
        recent.add("b.txt");
        recent.add("c.txt");
        recent.add("a.txt");
        assert_eq!(recent.list(), vec!["a.txt", "c.txt", "b.txt"]);
    }

    #[test]
    fn test_full_list_drops_oldest() {
        let mut recent = RecentFiles::new(MemoryStore::new());
        for i in 0..MAX_RECENT_FILES {
            recent.add(&format!("file{i}.txt"));
        }
        recent.add("newest.txt");

        let files = recent.list();
        assert_eq!(files.len(), MAX_RECENT_FILES);
        assert_eq!(files[0], "newest.txt");
        assert!(!files.contains(&"file0.txt".to_string()));
    }

    #[test]
    fn test_empty_path_ignored() {
        let mut recent = RecentFiles::new(CountingStore::default());
        recent.add("");
        recent.remove("");
        assert!(recent.list().is_empty());
        assert_eq!(recent.into_store().writes, 0);
    }

    #[test]
    fn test_remove_only_writes_on_change() {
        let mut recent = RecentFiles::new(CountingStore::default());
        recent.add("a.txt");
        recent.add("b.txt");
        recent.remove("missing.txt");
        recent.remove("a.txt");

        assert_eq!(recent.list(), vec!["b.txt"]);
        assert_eq!(recent.into_store().writes, 3);
    }
}
