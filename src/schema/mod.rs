//! # Using Schema Indexes
//!
//! The `graphql_response::schema` module normalizes raw introspection data
//! into a [SchemaIndex], the lookup table both response walkers are directed
//! by. The index is read-only once built and is valid for as long as its
//! [SchemaContext] is alive.
//!
//! The [BuildSchemaIndex] trait converts deserialized introspection data into
//! a usable index:
//!
//! ```
//! use graphql_response::schema::*;
//!
//! fn index() {
//!     let ctx = SchemaContext::new();
//!
//!     let introspection_json = include_str!("../../fixture/introspection_query.json");
//!     let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
//!     let _index = introspection.build_schema_index(&ctx).unwrap();
//! }
//! ```

pub mod build_index;
pub mod introspection;
pub mod scalars;
#[allow(clippy::module_inception)]
pub mod schema;

pub use build_index::BuildSchemaIndex;
pub use introspection::{IntrospectionQuery, IntrospectionSchema};
pub use scalars::*;
pub use schema::*;
