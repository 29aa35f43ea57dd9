//! # Type Synthesis
//!
//! The `graphql_response::synthesis` module walks one sample response
//! together with a [SchemaIndex](crate::schema::SchemaIndex) and a
//! [SelectionMap](crate::selection::SelectionMap) and produces a deduplicated
//! registry of structural record and enum descriptors that exactly mirror
//! what the response can contain.
//!
//! Synthesis runs once per operation against one representative response; the
//! binding collaborator turns the resulting [DescriptorRegistry] into host
//! language constructs. Decoding (see [crate::decode]) is independent of
//! synthesis and never consults descriptors.

mod descriptor;
mod synthesize;

pub use descriptor::{
    DescriptorRegistry, EnumDescriptor, Property, RecordDescriptor, RecordIdentity, Shape,
};
pub use synthesize::synthesize;
