//! Static mapping from GraphQL scalar names to native representations.

use crate::error::{Error, ErrorKind, Result};

/// The 5 scalar primitives every GraphQL schema carries implicitly. These
/// never enter the schema index since their representation is fixed.
pub const BUILTIN_SCALAR_NAMES: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Returns whether a scalar name is one of the built-in primitives.
#[inline]
pub fn is_builtin_scalar_name(name: &str) -> bool {
    BUILTIN_SCALAR_NAMES.contains(&name)
}

/// The native representation a scalar decodes to.
///
/// `Int` narrows to `i32` per the GraphQL spec's 32-bit signed integer range,
/// `Float` is an `f64`, and everything else is carried as a string. The
/// string-backed kinds stay distinct so that synthesized descriptors keep the
/// semantic tag (date, URI, id) for the binding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    Id,
    Date,
    DateTime,
    Uri,
}

/// Static registry resolving scalar names.
///
/// The registry is a pure function of the scalar name and carries no state, so
/// it's shared freely between synthesis and decoding.
pub struct ScalarRegistry;

impl ScalarRegistry {
    /// Resolves a scalar name to its native representation kind, or fails with
    /// [ErrorKind::UnsupportedScalar] when the name is not recognized.
    pub fn resolve(name: &str) -> Result<ScalarKind> {
        match name {
            "Int" => Ok(ScalarKind::Int),
            "Float" => Ok(ScalarKind::Float),
            "String" => Ok(ScalarKind::String),
            "Boolean" => Ok(ScalarKind::Boolean),
            "ID" => Ok(ScalarKind::Id),
            "Date" => Ok(ScalarKind::Date),
            "DateTime" => Ok(ScalarKind::DateTime),
            "URI" => Ok(ScalarKind::Uri),
            _ => Err(Error::new(
                ErrorKind::UnsupportedScalar,
                format!("scalar \"{name}\" has no known native representation"),
            )),
        }
    }
}
