//! Context snapshot tracking
//!
//! Keeps "which URL was active in which context" for the journey in progress.
//! The snapshot is reset at every journey start, filled as contexts appear,
//! and read by the analysis pass once the journey has completed.

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::error::PageSpeedResult;
use crate::journey::PageAccessor;

/// Ordered mapping from context name to the URL observed in that context
///
/// Iteration follows insertion order. Re-recording a name replaces its URL
/// and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextSnapshot {
    entries: Vec<(String, String)>,
}

impl ContextSnapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `url` under `name`, overwriting any earlier value
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        let name = name.into();
        let url = url.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = url,
            None => self.entries.push((name, url)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, url)| url.as_str())
    }

    /// Context names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, u)| (n.as_str(), u.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Journey-scoped owner of the current `ContextSnapshot`
#[derive(Debug, Default)]
pub struct ContextTracker {
    snapshot: RwLock<ContextSnapshot>,
}

impl ContextTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every tracked context. Safe to call repeatedly.
    pub fn reset(&self) {
        self.snapshot.write().clear();
        debug!(target: "pagespeed::tracker", "Context snapshot reset");
    }

    /// Read the page URL and record it under `name`
    ///
    /// The snapshot is only touched once the read has resolved, so a failed
    /// read leaves no entry behind.
    ///
    /// # Errors
    /// Propagates the page accessor's failure unchanged.
    pub async fn record(&self, name: &str, page: &dyn PageAccessor) -> PageSpeedResult<()> {
        let url = Self::context_data(page).await?;
        debug!(target: "pagespeed::tracker", "Context '{name}' -> {url}");
        self.snapshot.write().insert(name, url);
        Ok(())
    }

    /// Data tracked per context
    async fn context_data(page: &dyn PageAccessor) -> PageSpeedResult<String> {
        page.current_url().await
    }

    /// Copy of the current snapshot
    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        self.snapshot.read().clone()
    }

    #[must_use]
    pub fn url_for(&self, name: &str) -> Option<String> {
        self.snapshot.read().get(name).map(str::to_string)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_first_position() {
        let mut snapshot = ContextSnapshot::new();
        snapshot.insert("main", "https://a.test/");
        snapshot.insert("checkout", "https://b.test/");
        snapshot.insert("main", "https://c.test/");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("main"), Some("https://c.test/"));
        assert_eq!(snapshot.names().collect::<Vec<_>>(), vec!["main", "checkout"]);
    }

    #[test]
    fn clear_empties_snapshot() {
        let mut snapshot = ContextSnapshot::new();
        snapshot.insert("main", "https://a.test/");
        snapshot.clear();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.get("main"), None);
    }
}
