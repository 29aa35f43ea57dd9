//! # Response Decoding
//!
//! The `graphql_response::decode` module converts the `data` object of a
//! GraphQL response into an owned [DecodedValue] tree, using a
//! [SchemaIndex](crate::schema::SchemaIndex) as the single source of truth
//! for field types and nullability. Polymorphic positions resolve their
//! concrete type from the `__typename` discriminator carried in the
//! response. Decoding is stateless and independent of type synthesis.

mod decoder;
mod value;

pub use decoder::decode;
pub use value::{DecodedValue, EnumValue, RecordValue};
