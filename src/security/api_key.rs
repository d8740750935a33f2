//! Shared API key storage.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Header carrying the caller's key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Late-bindable shared secret.
///
/// Cloning yields another handle to the same slot. The secret loader is the
/// only writer; the auth guard reads it on every protected request.
#[derive(Clone, Default)]
pub struct ApiKeyCell {
    key: Arc<ArcSwapOption<String>>,
}

impl ApiKeyCell {
    /// Create a cell, optionally pre-populated from configuration.
    pub fn new(initial: Option<String>) -> Self {
        Self {
            key: Arc::new(ArcSwapOption::from(
                initial.filter(|k| !k.is_empty()).map(Arc::new),
            )),
        }
    }

    /// Whether a key has been set.
    pub fn is_loaded(&self) -> bool {
        self.key.load().is_some()
    }

    /// Publish a key to all readers.
    pub fn set(&self, key: String) {
        self.key.store(Some(Arc::new(key)));
    }

    /// Exact string comparison against the current key.
    ///
    /// Missing or empty credentials never match, and nothing matches while the
    /// key is unset.
    pub fn verify(&self, provided: Option<&str>) -> bool {
        match (provided, self.key.load().as_deref()) {
            (Some(provided), Some(expected)) => !provided.is_empty() && provided == expected.as_str(),
            _ => false,
        }
    }
}

impl std::fmt::Debug for ApiKeyCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCell")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_key_rejects_everything() {
        let cell = ApiKeyCell::new(None);
        assert!(!cell.is_loaded());
        assert!(!cell.verify(Some("anything")));
        assert!(!cell.verify(Some("")));
        assert!(!cell.verify(None));
    }

    #[test]
    fn test_exact_match_only() {
        let cell = ApiKeyCell::new(Some("s3cret".into()));
        assert!(cell.verify(Some("s3cret")));
        assert!(!cell.verify(Some("S3CRET")));
        assert!(!cell.verify(Some("s3cret ")));
        assert!(!cell.verify(None));
    }

    #[test]
    fn test_empty_initial_key_is_unset() {
        let cell = ApiKeyCell::new(Some(String::new()));
        assert!(!cell.is_loaded());
        assert!(!cell.verify(Some("")));
    }

    #[test]
    fn test_late_binding_is_visible_to_clones() {
        let cell = ApiKeyCell::new(None);
        let reader = cell.clone();
        assert!(!reader.verify(Some("late")));

        cell.set("late".into());
        assert!(reader.is_loaded());
        assert!(reader.verify(Some("late")));
    }
}
