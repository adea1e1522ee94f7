//! In-memory name directory.

use std::collections::HashMap;

use crate::domain::ports::NameDirectory;

/// Immutable id to display-name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryNameDirectory {
    names: HashMap<String, String>,
}

impl InMemoryNameDirectory {
    /// Build a directory from `(id, name)` pairs. Later pairs win.
    ///
    /// # Examples
    /// ```
    /// use classbook::domain::ports::NameDirectory;
    /// use classbook::outbound::InMemoryNameDirectory;
    ///
    /// let directory = InMemoryNameDirectory::new([("s-1", "Ada Byron")]);
    /// assert_eq!(directory.display_name("s-1").as_deref(), Some("Ada Byron"));
    /// assert_eq!(directory.display_name("s-2"), None);
    /// ```
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameDirectory for InMemoryNameDirectory {
    fn display_name(&self, id: &str) -> Option<String> {
        self.names.get(id).cloned()
    }
}
