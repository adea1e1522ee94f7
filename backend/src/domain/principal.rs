//! Authenticated actors and the capabilities they hold.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Validation errors returned by [`PrincipalId::new`] and
/// [`Capability::custom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalValidationError {
    EmptyId,
    PaddedId,
    EmptyCapability,
}

impl fmt::Display for PrincipalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "principal id must not be empty"),
            Self::PaddedId => write!(f, "principal id must not have surrounding whitespace"),
            Self::EmptyCapability => write!(f, "custom capability name must not be empty"),
        }
    }
}

impl std::error::Error for PrincipalValidationError {}

/// Stable identifier of an authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Validate and construct a [`PrincipalId`].
    pub fn new(id: impl Into<String>) -> Result<Self, PrincipalValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PrincipalValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PrincipalValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for PrincipalId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A permission a principal may hold.
///
/// The set is flat: holding [`Capability::Director`] does not by itself
/// satisfy a check for [`Capability::Administrator`]. Use
/// [`expand_capabilities`] when building a principal to apply implications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Manages registers, notes, teachings and justifications.
    Administrator,
    /// Teaching staff.
    Teacher,
    /// Enrolled student.
    Student,
    /// Parent or guardian.
    Parent,
    /// Administrative, technical and auxiliary staff.
    AtaStaff,
    /// School director.
    Director,
    /// A use-case specific permission such as `tourist`.
    Custom(String),
}

impl Capability {
    /// Build a [`Capability::Custom`] from a non-blank name.
    pub fn custom(name: impl Into<String>) -> Result<Self, PrincipalValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PrincipalValidationError::EmptyCapability);
        }
        Ok(Self::Custom(trimmed.to_owned()))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Administrator => f.write_str("administrator"),
            Self::Teacher => f.write_str("teacher"),
            Self::Student => f.write_str("student"),
            Self::Parent => f.write_str("parent"),
            Self::AtaStaff => f.write_str("ata_staff"),
            Self::Director => f.write_str("director"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

impl Serialize for Capability {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Apply the school's capability implications to a granted set.
///
/// A director may do everything an administrator may.
///
/// # Examples
/// ```
/// use classbook::domain::{Capability, expand_capabilities};
///
/// let expanded = expand_capabilities([Capability::Director]);
/// assert!(expanded.contains(&Capability::Administrator));
/// ```
pub fn expand_capabilities(
    granted: impl IntoIterator<Item = Capability>,
) -> BTreeSet<Capability> {
    let mut expanded = BTreeSet::new();
    for capability in granted {
        if capability == Capability::Director {
            expanded.insert(Capability::Administrator);
        }
        expanded.insert(capability);
    }
    expanded
}

/// An authenticated actor: an identifier plus a flat capability set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: PrincipalId,
    capabilities: BTreeSet<Capability>,
}

impl Principal {
    /// Build a principal holding exactly `capabilities`.
    pub fn new(id: PrincipalId, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            id,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Principal identifier.
    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    /// Granted capabilities.
    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    /// Whether `capability` is in the granted set.
    pub fn holds(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }
}
