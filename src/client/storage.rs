use std::collections::HashMap;

/// Fixed key the session token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Client-local keyed persistence for session data. A UI shell backs this
/// with whatever survives a reload; tests and headless use get the
/// in-memory one.
pub trait TokenStorage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    /// Wholesale clear, the logout path.
    fn clear(&mut self);
}

#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    entries: HashMap<String, String>,
}

impl MemoryTokenStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let mut storage = MemoryTokenStorage::new();

        assert_eq!(storage.get(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, "a.b.c");
        assert_eq!(storage.get(TOKEN_KEY), Some("a.b.c".to_string()));

        storage.clear();
        assert_eq!(storage.get(TOKEN_KEY), None);
    }
}
