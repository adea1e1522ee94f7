//! Record to transfer-object conversion.

use serde::Serialize;

use crate::domain::ports::NameDirectory;

/// Placeholder shown when an identifier cannot be resolved to a name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Pure conversion of one raw record into a display-safe transfer object.
///
/// `to_dto` must be total and deterministic: no I/O beyond the injected
/// [`NameDirectory`], no hidden state, and internal-only fields dropped.
pub trait Mapper<R>: Send + Sync {
    /// Transfer object produced for each record.
    type Dto: Clone + Serialize + Send + 'static;

    /// Convert `record` into its transfer object.
    fn to_dto(&self, record: &R) -> Self::Dto;
}

/// Resolve `id` through `directory`, falling back to [`UNKNOWN_NAME`].
///
/// # Examples
/// ```
/// use classbook::domain::{UNKNOWN_NAME, resolve_name};
/// use classbook::domain::ports::FixtureNameDirectory;
///
/// assert_eq!(resolve_name(&FixtureNameDirectory, "s-1"), UNKNOWN_NAME);
/// ```
pub fn resolve_name(directory: &dyn NameDirectory, id: &str) -> String {
    directory
        .display_name(id)
        .unwrap_or_else(|| UNKNOWN_NAME.to_owned())
}
