use bumpalo::collections::Vec;
use bumpalo::Bump;
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;
use std::fmt;

/// A context for one fetched schema which holds an arena allocator.
///
/// The schema index, its type definitions, and any descriptors synthesized
/// against the same payload are all allocated in one chunk and live exactly
/// as long as this context. Once a schema is
/// replaced by a newer fetch the entire allocation is dropped at once, so it's
/// inadvisable to share a context across unrelated schema fetches.
pub struct SchemaContext {
    /// An arena allocator that holds the memory allocated for the schema's lifetime
    pub arena: Bump,
}

impl SchemaContext {
    /// Create a new schema context with a preallocated arena.
    pub fn new() -> Self {
        SchemaContext { arena: Bump::new() }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Allocate an `&str` slice onto the arena and return a reference to it.
    ///
    /// This is useful when the original slice has an undefined lifetime, which
    /// is the case for all names borrowed from an introspection JSON document.
    #[inline]
    pub fn alloc_str(&self, str: &str) -> &str {
        self.arena.alloc_str(str)
    }

    /// Puts a `String` onto the arena and returns a reference to it to tie the
    /// `String`'s lifetime to this context without reallocating or copying it.
    #[inline]
    pub fn alloc_string(&self, str: String) -> &str {
        self.arena.alloc(str)
    }
}

impl Default for SchemaContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The 8 reserved introspection type names that never enter a [SchemaIndex].
pub const RESERVED_TYPE_NAMES: [&str; 8] = [
    "__TypeKind",
    "__DirectiveLocation",
    "__Type",
    "__InputValue",
    "__Field",
    "__EnumValue",
    "__Directive",
    "__Schema",
];

/// Returns whether a type name belongs to the introspection meta layer.
#[inline]
pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

/// Schema Index
///
/// A lookup table from type name to type definition, normalized from raw
/// introspection data. The index is never executable and serves only for
/// metadata and type information while walking responses. Built-in scalar
/// primitives and the reserved introspection types are filtered out; custom
/// scalars remain indexed.
#[derive(Debug, Clone)]
pub struct SchemaIndex<'a> {
    pub(crate) query_type: Option<&'a str>,
    pub(crate) types: HashMap<&'a str, &'a SchemaType<'a>, DefaultHashBuilder, &'a Bump>,
}

impl<'a> SchemaIndex<'a> {
    pub(crate) fn new_in(arena: &'a Bump) -> Self {
        SchemaIndex {
            query_type: None,
            types: HashMap::new_in(arena),
        }
    }

    /// Returns whether the index contains no type definitions.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns the name of the root query type, if the payload declared one.
    #[inline]
    pub fn query_type(&self) -> Option<&'a str> {
        self.query_type
    }

    /// Retrieves a type definition by name from known schema types.
    #[inline]
    pub fn get_type(&self, name: &str) -> Option<&'a SchemaType<'a>> {
        self.types.get(name).copied()
    }

    /// Iterates over all indexed type definitions in no particular order.
    pub fn types(&self) -> impl Iterator<Item = &'a SchemaType<'a>> + '_ {
        self.types.values().copied()
    }
}

/// Generic trait for any schema type that carries fields.
pub trait SchemaFields<'a>: Sized {
    /// Add a new [SchemaField] to the ordered list of fields.
    fn add_field(&mut self, ctx: &'a SchemaContext, field: SchemaField<'a>);

    /// Get the ordered list of all fields.
    fn fields(&self) -> &Vec<'a, &'a SchemaField<'a>>;

    /// Get a known field by name.
    fn field(&self, name: &str) -> Option<&'a SchemaField<'a>>;
}

/// An object field definition, reduced to the parts response walking needs:
/// its name and its output type reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField<'a> {
    pub name: &'a str,
    pub of_type: &'a TypeRef<'a>,
}

impl<'a> SchemaField<'a> {
    #[inline]
    pub fn new(name: &'a str, of_type: &'a TypeRef<'a>) -> Self {
        SchemaField { name, of_type }
    }
}

/// An Object type definition.
///
/// Most types in GraphQL are objects and define a set of fields and the
/// interfaces they implement.
/// [Reference](https://spec.graphql.org/October2021/#sec-Objects)
#[derive(Debug, Clone)]
pub struct SchemaObject<'a> {
    pub name: &'a str,
    pub(crate) fields: Vec<'a, &'a SchemaField<'a>>,
    pub(crate) by_name: HashMap<&'a str, &'a SchemaField<'a>, DefaultHashBuilder, &'a Bump>,
    pub(crate) interfaces: Vec<'a, &'a str>,
}

impl<'a> SchemaObject<'a> {
    #[inline]
    pub fn new(ctx: &'a SchemaContext, name: &'a str) -> Self {
        SchemaObject {
            name,
            fields: Vec::new_in(&ctx.arena),
            by_name: HashMap::new_in(&ctx.arena),
            interfaces: Vec::new_in(&ctx.arena),
        }
    }

    /// Add an implemented interface by name.
    pub fn add_interface(&mut self, interface: &'a str) {
        self.interfaces.push(interface);
    }

    /// Returns the names of the interfaces this object implements.
    #[inline]
    pub fn interfaces(&self) -> &Vec<'a, &'a str> {
        &self.interfaces
    }
}

impl<'a> SchemaFields<'a> for SchemaObject<'a> {
    fn add_field(&mut self, ctx: &'a SchemaContext, field: SchemaField<'a>) {
        let field = ctx.alloc(field);
        self.fields.push(field);
        self.by_name.insert(field.name, field);
    }

    #[inline]
    fn fields(&self) -> &Vec<'a, &'a SchemaField<'a>> {
        &self.fields
    }

    #[inline]
    fn field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        self.by_name.get(name).copied()
    }
}

/// An Interface type definition.
///
/// A field that returns an interface as its return type may return any object
/// that implements this interface, which a response discriminates via its
/// `__typename` field.
/// [Reference](https://spec.graphql.org/October2021/#sec-Interfaces)
#[derive(Debug, Clone)]
pub struct SchemaInterface<'a> {
    pub name: &'a str,
    pub(crate) fields: Vec<'a, &'a SchemaField<'a>>,
    pub(crate) by_name: HashMap<&'a str, &'a SchemaField<'a>, DefaultHashBuilder, &'a Bump>,
    pub(crate) possible_types: Vec<'a, &'a str>,
}

impl<'a> SchemaInterface<'a> {
    #[inline]
    pub fn new(ctx: &'a SchemaContext, name: &'a str) -> Self {
        SchemaInterface {
            name,
            fields: Vec::new_in(&ctx.arena),
            by_name: HashMap::new_in(&ctx.arena),
            possible_types: Vec::new_in(&ctx.arena),
        }
    }

    /// Add a new object type name to the list of possible types.
    pub fn add_possible_type(&mut self, object: &'a str) {
        self.possible_types.push(object);
    }

    /// Get the list of possible object type names.
    #[inline]
    pub fn possible_types(&self) -> &Vec<'a, &'a str> {
        &self.possible_types
    }

    /// Checks whether a type name is a possible concrete type.
    #[inline]
    pub fn is_possible_type(&self, name: &str) -> bool {
        self.possible_types.iter().any(|possible| *possible == name)
    }
}

impl<'a> SchemaFields<'a> for SchemaInterface<'a> {
    fn add_field(&mut self, ctx: &'a SchemaContext, field: SchemaField<'a>) {
        let field = ctx.alloc(field);
        self.fields.push(field);
        self.by_name.insert(field.name, field);
    }

    #[inline]
    fn fields(&self) -> &Vec<'a, &'a SchemaField<'a>> {
        &self.fields
    }

    #[inline]
    fn field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        self.by_name.get(name).copied()
    }
}

/// A Union type definition.
///
/// A union carries no fields of its own; a response object in union position
/// always resolves through its concrete type.
/// [Reference](https://spec.graphql.org/October2021/#sec-Unions)
#[derive(Debug, Clone)]
pub struct SchemaUnion<'a> {
    pub name: &'a str,
    pub(crate) possible_types: Vec<'a, &'a str>,
}

impl<'a> SchemaUnion<'a> {
    #[inline]
    pub fn new(ctx: &'a SchemaContext, name: &'a str) -> Self {
        SchemaUnion {
            name,
            possible_types: Vec::new_in(&ctx.arena),
        }
    }

    /// Add a new object type name to the list of possible types.
    pub fn add_possible_type(&mut self, object: &'a str) {
        self.possible_types.push(object);
    }

    /// Get the list of possible object type names.
    #[inline]
    pub fn possible_types(&self) -> &Vec<'a, &'a str> {
        &self.possible_types
    }

    /// Checks whether a type name is a possible concrete type.
    #[inline]
    pub fn is_possible_type(&self, name: &str) -> bool {
        self.possible_types.iter().any(|possible| *possible == name)
    }
}

/// An Enum type definition with its ordered declared value set.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Enums)
#[derive(Debug, Clone)]
pub struct SchemaEnum<'a> {
    pub name: &'a str,
    pub(crate) values: Vec<'a, &'a str>,
}

impl<'a> SchemaEnum<'a> {
    #[inline]
    pub fn new(ctx: &'a SchemaContext, name: &'a str) -> Self {
        SchemaEnum {
            name,
            values: Vec::new_in(&ctx.arena),
        }
    }

    /// Add a declared value, preserving declaration order.
    pub fn add_value(&mut self, value: &'a str) {
        self.values.push(value);
    }

    /// The declared values in declaration order.
    #[inline]
    pub fn values(&self) -> &Vec<'a, &'a str> {
        &self.values
    }
}

/// A Scalar type definition.
///
/// Scalars represent primitive leaf values whose native representation the
/// [scalar registry](crate::schema::ScalarRegistry) decides.
/// [Reference](https://spec.graphql.org/October2021/#sec-Scalars)
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaScalar<'a> {
    pub name: &'a str,
}

impl<'a> SchemaScalar<'a> {
    #[inline]
    pub fn new(name: &'a str) -> Self {
        SchemaScalar { name }
    }
}

/// A named type enum that represents all GraphQL output definition types the
/// response walkers dispatch over.
///
/// [Reference](https://spec.graphql.org/October2021/#sec-Types)
#[derive(Debug, Clone, Copy)]
pub enum SchemaType<'a> {
    Object(&'a SchemaObject<'a>),
    Interface(&'a SchemaInterface<'a>),
    Union(&'a SchemaUnion<'a>),
    Enum(&'a SchemaEnum<'a>),
    Scalar(&'a SchemaScalar<'a>),
}

impl<'a> SchemaType<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            SchemaType::Object(x) => x.name,
            SchemaType::Interface(x) => x.name,
            SchemaType::Union(x) => x.name,
            SchemaType::Enum(x) => x.name,
            SchemaType::Scalar(x) => x.name,
        }
    }

    /// The kind of this type as the introspection payload spells it.
    #[inline]
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaType::Object(_) => "OBJECT",
            SchemaType::Interface(_) => "INTERFACE",
            SchemaType::Union(_) => "UNION",
            SchemaType::Enum(_) => "ENUM",
            SchemaType::Scalar(_) => "SCALAR",
        }
    }

    /// Returns whether this type resolves its concrete shape per response
    /// object rather than statically.
    #[inline]
    pub fn is_polymorphic(&self) -> bool {
        matches!(self, SchemaType::Interface(_) | SchemaType::Union(_))
    }

    pub fn object(&self) -> Option<&'a SchemaObject<'a>> {
        match self {
            SchemaType::Object(x) => Some(x),
            _ => None,
        }
    }

    pub fn interface(&self) -> Option<&'a SchemaInterface<'a>> {
        match self {
            SchemaType::Interface(x) => Some(x),
            _ => None,
        }
    }

    pub fn union_type(&self) -> Option<&'a SchemaUnion<'a>> {
        match self {
            SchemaType::Union(x) => Some(x),
            _ => None,
        }
    }

    pub fn enum_type(&self) -> Option<&'a SchemaEnum<'a>> {
        match self {
            SchemaType::Enum(x) => Some(x),
            _ => None,
        }
    }

    /// Looks up a field by name on types that carry fields.
    pub fn field(&self, name: &str) -> Option<&'a SchemaField<'a>> {
        match self {
            SchemaType::Object(x) => x.field(name),
            SchemaType::Interface(x) => x.field(name),
            _ => None,
        }
    }
}

/// A recursive descriptor of a schema type occurrence.
///
/// The kind set is closed and the enum is matched exhaustively everywhere, so
/// a new kind forces every call site to be revisited. Named kinds carry the
/// type name directly, which keeps scalar and enum resolution free of index
/// lookups; wrapper kinds carry their inner reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeRef<'a> {
    NonNull(&'a TypeRef<'a>),
    List(&'a TypeRef<'a>),
    Object(&'a str),
    Interface(&'a str),
    Union(&'a str),
    Enum(&'a str),
    Scalar(&'a str),
}

impl<'a> TypeRef<'a> {
    /// The name of the named type this reference bottoms out in.
    pub fn named_type(&self) -> &'a str {
        match self {
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.named_type(),
            TypeRef::Object(name)
            | TypeRef::Interface(name)
            | TypeRef::Union(name)
            | TypeRef::Enum(name)
            | TypeRef::Scalar(name) => name,
        }
    }

    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

/// Prints the reference in GraphQL type syntax, e.g. `[Episode!]!`, which is
/// what error contexts embed.
impl<'a> fmt::Display for TypeRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::Object(name)
            | TypeRef::Interface(name)
            | TypeRef::Union(name)
            | TypeRef::Enum(name)
            | TypeRef::Scalar(name) => write!(f, "{name}"),
        }
    }
}
