//! `graphql_response`
//! =========
//!
//! _Schema-directed decoding and type synthesis for GraphQL JSON responses._
//!
//! The **`graphql_response`** library does two things:
//!
//! - It decodes the `data` object of a GraphQL response into a typed value
//!   tree, with nullability, scalar narrowing, and polymorphic `__typename`
//!   dispatch all driven by an introspected schema.
//! - It synthesizes a deduplicated registry of structural type descriptors
//!   from one sample response, so a host-language binding can be generated
//!   once per operation instead of per response.
//!
//! The crate deliberately stops at the response boundary. Executing HTTP
//! requests, parsing and validating query text, and emitting host-language
//! bindings are all collaborators on the other side of the seams this crate
//! defines: [transport] for the wire, [selection] for per-path selections
//! handed over by the query layer, and [synthesis] descriptors as the
//! binding input.
//!
//! Schema data lives in an arena: a [schema::SchemaContext] owns every
//! string and type the [schema::SchemaIndex] refers to, so lookups hand out
//! plain references for as long as the context is alive. Decoded values are
//! owned and detached, produced fresh per response.
//!
//! [A good place to start learning more about this crate is the `schema` module...](schema)

pub mod decode;
pub mod error;
pub mod schema;
pub mod selection;
pub mod synthesis;
pub mod transport;
pub mod walk;

pub use bumpalo;
