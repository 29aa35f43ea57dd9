//! Shared helpers for the two schema-directed tree walks.
//!
//! Both type synthesis and decoding thread the same two concerns through
//! every recursive call: ambient nullability and recursion depth. Nullability
//! is modeled as the explicit [Typed] sum instead of call-site booleans, and
//! depth is checked before each descent.

use crate::error::{Error, ErrorKind, Result};
use crate::schema::TypeRef;

/// Recursion depth limit for both walkers.
///
/// Response and selection nesting is query-bounded in practice; anything this
/// deep is a pathological document and fails instead of growing the stack.
pub const MAX_DEPTH: usize = 128;

/// Fails with [ErrorKind::DepthExceeded] once a walk descends past [MAX_DEPTH].
#[inline]
pub fn check_depth(depth: usize, path: &str) -> Result<()> {
    if depth > MAX_DEPTH {
        Err(Error::new_at(
            ErrorKind::DepthExceeded,
            format!("nesting exceeds the depth limit of {MAX_DEPTH}"),
            path,
        ))
    } else {
        Ok(())
    }
}

/// A walk result together with the nullability of its position.
///
/// `Required` results come from non-null positions and are never wrapped
/// optional; `Optional` results admit an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Typed<T> {
    Required(T),
    Optional(T),
}

impl<T> Typed<T> {
    /// Wraps `inner` as required or optional.
    #[inline]
    pub fn new(inner: T, required: bool) -> Self {
        if required {
            Typed::Required(inner)
        } else {
            Typed::Optional(inner)
        }
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        matches!(self, Typed::Required(_))
    }

    #[inline]
    pub fn inner(&self) -> &T {
        match self {
            Typed::Required(inner) | Typed::Optional(inner) => inner,
        }
    }

    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            Typed::Required(inner) | Typed::Optional(inner) => inner,
        }
    }
}

/// Strips at most one non-null wrapper from a type reference.
///
/// Returns the unwrapped reference and whether the position is required. A
/// non-null wrapping another non-null is invalid in any schema and fails with
/// [ErrorKind::UnsupportedSchemaShape]; the schema builder already rejects it,
/// but hand-built type references pass through here too.
pub fn strip_non_null<'a>(of_type: &'a TypeRef<'a>, path: &str) -> Result<(&'a TypeRef<'a>, bool)> {
    match of_type {
        &TypeRef::NonNull(inner) => {
            if inner.is_non_null() {
                return Err(Error::new_at(
                    ErrorKind::UnsupportedSchemaShape,
                    "a non-null type must not wrap another non-null type",
                    path,
                ));
            }
            Ok((inner, true))
        }
        other => Ok((other, false)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_single_non_null() {
        let name = TypeRef::Scalar("String");
        let required = TypeRef::NonNull(&name);

        let (inner, is_required) = strip_non_null(&required, "hero.name").unwrap();
        assert!(is_required);
        assert_eq!(inner, &TypeRef::Scalar("String"));

        let (inner, is_required) = strip_non_null(&name, "hero.name").unwrap();
        assert!(!is_required);
        assert_eq!(inner, &TypeRef::Scalar("String"));
    }

    #[test]
    fn rejects_double_non_null() {
        let name = TypeRef::Scalar("String");
        let inner = TypeRef::NonNull(&name);
        let outer = TypeRef::NonNull(&inner);

        let error = strip_non_null(&outer, "hero.name").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedSchemaShape);
    }

    #[test]
    fn depth_guard() {
        assert!(check_depth(MAX_DEPTH, "deep").is_ok());
        let error = check_depth(MAX_DEPTH + 1, "deep").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DepthExceeded);
    }
}
