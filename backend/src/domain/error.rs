//! Pipeline error taxonomy.
//!
//! Every use case reports failure through the same closed set of kinds.
//! Gates and stores signal through booleans and narrow port errors; the
//! pipeline is the single place where those signals become a
//! [`PipelineError`]. Presentation adapters read the kind, message,
//! retryability and severity without knowing which stage failed.

use std::fmt;

use serde::{Serialize, Serializer};

/// Stable machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineErrorKind {
    /// The backing service could not be reached.
    Unavailable,
    /// The principal lacks the capability the use case requires.
    Unauthorized,
    /// A lookup by identifier found nothing.
    NotFound,
    /// The request or a record failed validation.
    Invalid,
}

impl PipelineErrorKind {
    /// Message used when a caller supplies a blank one.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Unavailable => "connection to the server interrupted",
            Self::Unauthorized => "not authorized",
            Self::NotFound => "no matching record",
            Self::Invalid => "invalid request",
        }
    }

    /// Whether repeating the same request later may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable)
    }

    /// How loudly a presentation layer should surface this kind.
    pub fn severity(self) -> Severity {
        match self {
            Self::NotFound => Severity::Notice,
            Self::Unavailable => Severity::Warning,
            Self::Unauthorized | Self::Invalid => Severity::Error,
        }
    }
}

impl fmt::Display for PipelineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unavailable => "unavailable",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Invalid => "invalid",
        };
        f.write_str(label)
    }
}

/// Presentation severity of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A normal outcome worth mentioning, such as an empty lookup.
    Notice,
    /// A transient problem the user may retry.
    Warning,
    /// A problem the user must correct before retrying.
    Error,
}

/// Pipeline failure payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use classbook::domain::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::not_found("register 42 does not exist");
/// assert_eq!(err.kind(), PipelineErrorKind::NotFound);
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineError {
    kind: PipelineErrorKind,
    message: String,
}

/// Validation errors emitted by [`PipelineError::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineErrorValidationError {
    EmptyMessage,
}

impl fmt::Display for PipelineErrorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for PipelineErrorValidationError {}

impl PipelineError {
    /// Create a new error.
    ///
    /// A blank message is replaced with the kind's default message so the
    /// invariant holds without panicking.
    pub fn new(kind: PipelineErrorKind, message: impl Into<String>) -> Self {
        Self::try_new(kind, message).unwrap_or_else(|_| Self {
            kind,
            message: kind.default_message().to_owned(),
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        kind: PipelineErrorKind,
        message: impl Into<String>,
    ) -> Result<Self, PipelineErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(PipelineErrorValidationError::EmptyMessage);
        }
        Ok(Self { kind, message })
    }

    /// Failure category.
    pub fn kind(&self) -> PipelineErrorKind {
        self.kind
    }

    /// Human-readable detail for the presentation layer.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether repeating the request later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// How loudly the failure should be surfaced.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Convenience constructor for [`PipelineErrorKind::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Unavailable, message)
    }

    /// Convenience constructor for [`PipelineErrorKind::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Unauthorized, message)
    }

    /// Convenience constructor for [`PipelineErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::NotFound, message)
    }

    /// Convenience constructor for [`PipelineErrorKind::Invalid`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(PipelineErrorKind::Invalid, message)
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PipelineError {}

impl Serialize for PipelineError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PipelineErrorDto {
            kind: self.kind,
            message: &self.message,
            retryable: self.is_retryable(),
            severity: self.severity(),
        }
        .serialize(serializer)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineErrorDto<'a> {
    kind: PipelineErrorKind,
    message: &'a str,
    retryable: bool,
    severity: Severity,
}
