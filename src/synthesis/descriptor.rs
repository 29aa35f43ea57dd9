use bumpalo::collections::Vec as ArenaVec;
use hashbrown::HashMap;
use std::fmt;

use crate::schema::ScalarKind;
use crate::walk::Typed;

/// The deduplication identity of a synthesized record: the field path of the
/// position it was observed at, plus the concrete type name that position
/// resolved to. Two occurrences with the same identity share one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordIdentity<'a> {
    /// Dotted field path from the selection root, `""` for the root itself.
    pub path: &'a str,
    pub type_name: &'a str,
}

impl<'a> fmt::Display for RecordIdentity<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.path, self.type_name)
    }
}

/// The structural type synthesis inferred for one position.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Scalar(ScalarKind),
    Enum(&'a EnumDescriptor<'a>),
    Record(&'a RecordDescriptor<'a>),
    /// A sequence; the element typing carries its own nullability.
    List(&'a Typed<Shape<'a>>),
}

/// A synthesized enum type: the schema-declared name and value set.
#[derive(Debug)]
pub struct EnumDescriptor<'a> {
    pub name: &'a str,
    pub values: ArenaVec<'a, &'a str>,
}

/// One named property of a synthesized record with its typed shape.
#[derive(Debug, Clone, Copy)]
pub struct Property<'a> {
    pub name: &'a str,
    pub of_type: Typed<Shape<'a>>,
}

/// A synthesized record type mirroring one object position of the sample
/// response. Properties keep the order they were materialized in.
#[derive(Debug)]
pub struct RecordDescriptor<'a> {
    pub identity: RecordIdentity<'a>,
    pub properties: ArenaVec<'a, Property<'a>>,
    /// The interface/union identity this record was observed under, when the
    /// schema position was polymorphic.
    pub base: Option<RecordIdentity<'a>>,
}

impl<'a> RecordDescriptor<'a> {
    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property<'a>> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// The property names in materialization order.
    pub fn property_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.properties.iter().map(|property| property.name)
    }
}

/// The output of one synthesis run: every record and enum descriptor the
/// sample response exercised, memoized by identity.
///
/// The registry is append-only: a descriptor is never replaced once created.
/// It is owned by exactly one synthesis run. Identity is scoped per run, so
/// structurally identical types from different runs never share descriptors.
#[derive(Debug, Default)]
pub struct DescriptorRegistry<'a> {
    records: HashMap<RecordIdentity<'a>, &'a RecordDescriptor<'a>>,
    record_order: Vec<RecordIdentity<'a>>,
    enums: HashMap<&'a str, &'a EnumDescriptor<'a>>,
    enum_order: Vec<&'a str>,
}

impl<'a> DescriptorRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized record descriptor for an identity, if one was registered.
    pub fn record(&self, identity: &RecordIdentity<'a>) -> Option<&'a RecordDescriptor<'a>> {
        self.records.get(identity).copied()
    }

    pub(crate) fn insert_record(&mut self, descriptor: &'a RecordDescriptor<'a>) {
        if self.records.insert(descriptor.identity, descriptor).is_none() {
            self.record_order.push(descriptor.identity);
        }
    }

    /// All record descriptors in registration order.
    pub fn records(&self) -> impl Iterator<Item = &'a RecordDescriptor<'a>> + '_ {
        self.record_order
            .iter()
            .filter_map(move |identity| self.records.get(identity).copied())
    }

    /// The enum descriptor for a schema enum name.
    pub fn enum_of(&self, name: &str) -> Option<&'a EnumDescriptor<'a>> {
        self.enums.get(name).copied()
    }

    pub(crate) fn insert_enum(&mut self, descriptor: &'a EnumDescriptor<'a>) {
        if self.enums.insert(descriptor.name, descriptor).is_none() {
            self.enum_order.push(descriptor.name);
        }
    }

    /// All enum descriptors in registration order.
    pub fn enums(&self) -> impl Iterator<Item = &'a EnumDescriptor<'a>> + '_ {
        self.enum_order
            .iter()
            .filter_map(move |name| self.enums.get(name).copied())
    }

    /// Number of registered record descriptors.
    pub fn record_count(&self) -> usize {
        self.record_order.len()
    }
}
