//! Port resolving identifiers to display names.
//!
//! Mappers use the directory to turn student, teacher and class ids into the
//! names shown on screen. Lookups are infallible: an unresolved id yields
//! `None` and the mapper substitutes a placeholder.

/// Identifier to display-name lookup.
#[cfg_attr(test, mockall::automock)]
pub trait NameDirectory: Send + Sync {
    /// Display name registered for `id`, if any.
    fn display_name(&self, id: &str) -> Option<String>;
}

/// Fixture directory that resolves nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNameDirectory;

impl NameDirectory for FixtureNameDirectory {
    fn display_name(&self, _id: &str) -> Option<String> {
        None
    }
}
