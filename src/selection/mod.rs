//! # Selection Maps
//!
//! The `graphql_response::selection` module holds the read-only inputs the
//! query/AST collaborator supplies: per operation, a mapping from field path
//! to the set of field names selected at that position, plus per-fragment
//! field subsets keyed by type condition.
//!
//! Only type synthesis consumes selections; decoding resolves polymorphic
//! objects from the `__typename` discriminator carried in the response itself.

mod map;
mod path;

pub use map::{FieldSelection, OperationSelections, SelectionMap};
pub use path::FieldPath;
