//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's used across all of its
//! modules, together with the closed [ErrorKind] taxonomy that callers match on.

use std::{error, fmt, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// Classification of every failure this crate can produce.
///
/// All failures are fail-fast and non-recoverable within this crate: a failed
/// synthesis or decode run never returns partial results. The kind is what a
/// caller should branch on; the message and path carry the human context.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// The introspection payload is missing a required name, field list, or
    /// enum value list.
    MalformedSchema,
    /// A response value's JSON shape contradicts the schema kind declared at
    /// its position, e.g. an array where the schema declares a scalar.
    MalformedResponse,
    /// A response or selection references a field absent from the resolved
    /// schema type.
    MissingField,
    /// A polymorphic (interface/union) object carries no usable type name.
    MissingDiscriminator,
    /// Invalid type nesting, such as a non-null wrapping another non-null.
    UnsupportedSchemaShape,
    /// A scalar name with no entry in the scalar registry.
    UnsupportedScalar,
    /// A JSON null where the schema declares non-null, including list elements.
    NullabilityViolation,
    /// Synthesis cannot infer a concrete shape because no non-null sample
    /// value exists anywhere in the sample response.
    InsufficientSample,
    /// A numeric value that cannot be narrowed to the scalar's native
    /// representation.
    ScalarRangeViolation,
    /// No operation name was given and the document defines zero or several
    /// operations.
    AmbiguousOperation,
    /// Response or selection nesting exceeded the recursion depth limit.
    DepthExceeded,
}

impl ErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedSchema => "Malformed Schema",
            ErrorKind::MalformedResponse => "Malformed Response",
            ErrorKind::MissingField => "Missing Field",
            ErrorKind::MissingDiscriminator => "Missing Discriminator",
            ErrorKind::UnsupportedSchemaShape => "Unsupported Schema Shape",
            ErrorKind::UnsupportedScalar => "Unsupported Scalar",
            ErrorKind::NullabilityViolation => "Nullability Violation",
            ErrorKind::InsufficientSample => "Insufficient Sample",
            ErrorKind::ScalarRangeViolation => "Scalar Range Violation",
            ErrorKind::AmbiguousOperation => "Ambiguous Operation",
            ErrorKind::DepthExceeded => "Depth Exceeded",
        }
    }
}

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a general message, an optional field path locating
/// the failure inside the response or selection, and an optional context
/// string with further detail (e.g. the expected kind).
///
/// The Error implements both the [`fmt::Display`] and [`fmt::Debug`] traits.
/// It also implements [`error::Error`] so that it can be used with existing
/// patterns for error handling.
#[derive(PartialEq, Eq, Clone)]
pub struct Error {
    pub(crate) message: String,
    pub(crate) path: Option<String>,
    pub(crate) context: Option<String>,
    pub(crate) kind: ErrorKind,
}

impl Error {
    /// Create a new Error with only a main message from an input string.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            message: message.into(),
            path: None,
            context: None,
            kind,
        }
    }

    /// Create a new Error carrying the field path at which the failure was
    /// observed.
    pub fn new_at<S: Into<String>, P: Into<String>>(kind: ErrorKind, message: S, path: P) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
            context: None,
            kind,
        }
    }

    /// Attach a context string, e.g. the expected kind at the failing position.
    #[must_use]
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Returns the kind of the current error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of the current error. The context is discarded.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the field path of the current error, if one was recorded.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Formats this error, with the option to include the context information
    /// as well, which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let mut formatted = format!("{}: {}", self.kind.as_str(), self.message);
        if let Some(ref path) = self.path {
            formatted.push_str(&format!(" (at `{path}`)"));
        }
        match self.context {
            Some(ref context) if include_ctx => format!("{formatted}\n{context}"),
            _ => formatted,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{self}\n")
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_with_path_and_context() {
        let error = Error::new_at(
            ErrorKind::NullabilityViolation,
            "received null for non-nullable field \"name\"",
            "hero.name",
        )
        .with_context("expected String!");

        assert_eq!(
            error.print(false),
            "Nullability Violation: received null for non-nullable field \"name\" (at `hero.name`)"
        );
        assert_eq!(
            error.print(true),
            "Nullability Violation: received null for non-nullable field \"name\" (at `hero.name`)\nexpected String!"
        );
        assert_eq!(error.kind(), ErrorKind::NullabilityViolation);
        assert_eq!(error.path(), Some("hero.name"));
    }
}
