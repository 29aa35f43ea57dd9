use super::introspection::{
    IntrospectionEnumType, IntrospectionField, IntrospectionInterfaceType, IntrospectionObjectType,
    IntrospectionQuery, IntrospectionSchema, IntrospectionTypeRef, IntrospectionUnionType,
};
use super::scalars::is_builtin_scalar_name;
use super::schema::{
    is_reserved_type_name, SchemaContext, SchemaEnum, SchemaField, SchemaFields, SchemaIndex,
    SchemaInterface, SchemaObject, SchemaScalar, SchemaType, SchemaUnion, TypeRef,
};
use crate::error::{Error, ErrorKind, Result};

fn malformed(message: String) -> Error {
    Error::new(ErrorKind::MalformedSchema, message)
}

fn checked_name<'a>(ctx: &'a SchemaContext, name: &str) -> Result<&'a str> {
    if name.is_empty() {
        Err(malformed("type definition carries an empty name".into()))
    } else {
        Ok(ctx.alloc_str(name))
    }
}

/// Converts a raw introspection type reference into an arena [TypeRef].
///
/// Rejects a non-null wrapping another non-null, wrappers with a missing inner
/// reference, and input objects in output position.
fn from_type_ref<'a>(
    ctx: &'a SchemaContext,
    raw: &IntrospectionTypeRef,
) -> Result<&'a TypeRef<'a>> {
    let type_ref = match raw {
        IntrospectionTypeRef::NonNull { of_type } => {
            let inner = of_type
                .as_deref()
                .ok_or_else(|| malformed("non-null wrapper is missing its ofType".into()))?;
            if matches!(inner, IntrospectionTypeRef::NonNull { .. }) {
                return Err(Error::new(
                    ErrorKind::UnsupportedSchemaShape,
                    "a non-null type must not wrap another non-null type",
                ));
            }
            TypeRef::NonNull(from_type_ref(ctx, inner)?)
        }
        IntrospectionTypeRef::List { of_type } => {
            let inner = of_type
                .as_deref()
                .ok_or_else(|| malformed("list wrapper is missing its ofType".into()))?;
            TypeRef::List(from_type_ref(ctx, inner)?)
        }
        IntrospectionTypeRef::Object { name } => TypeRef::Object(checked_name(ctx, name)?),
        IntrospectionTypeRef::Interface { name } => TypeRef::Interface(checked_name(ctx, name)?),
        IntrospectionTypeRef::Union { name } => TypeRef::Union(checked_name(ctx, name)?),
        IntrospectionTypeRef::Enum { name } => TypeRef::Enum(checked_name(ctx, name)?),
        IntrospectionTypeRef::Scalar { name } => TypeRef::Scalar(checked_name(ctx, name)?),
        IntrospectionTypeRef::InputObject { name } => {
            return Err(Error::new(
                ErrorKind::UnsupportedSchemaShape,
                format!("input object \"{name}\" referenced in output position"),
            ));
        }
    };

    Ok(ctx.alloc(type_ref))
}

fn add_fields<'a, T: SchemaFields<'a>>(
    ctx: &'a SchemaContext,
    target: &mut T,
    type_name: &str,
    fields: &Option<Vec<IntrospectionField>>,
) -> Result<()> {
    let fields = fields.as_ref().ok_or_else(|| {
        malformed(format!("type \"{type_name}\" declares no field list"))
    })?;
    for field in fields {
        let name = checked_name(ctx, field.name)?;
        target.add_field(ctx, SchemaField::new(name, from_type_ref(ctx, &field.of_type)?));
    }
    Ok(())
}

fn build_object<'a>(
    ctx: &'a SchemaContext,
    raw: &IntrospectionObjectType,
) -> Result<SchemaObject<'a>> {
    let name = checked_name(ctx, raw.name)?;
    let mut object = SchemaObject::new(ctx, name);
    add_fields(ctx, &mut object, name, &raw.fields)?;
    if let Some(interfaces) = &raw.interfaces {
        for interface in interfaces {
            object.add_interface(checked_name(ctx, interface.name)?);
        }
    }
    Ok(object)
}

fn build_interface<'a>(
    ctx: &'a SchemaContext,
    raw: &IntrospectionInterfaceType,
) -> Result<SchemaInterface<'a>> {
    let name = checked_name(ctx, raw.name)?;
    let mut interface = SchemaInterface::new(ctx, name);
    add_fields(ctx, &mut interface, name, &raw.fields)?;
    if let Some(possible_types) = &raw.possible_types {
        for possible in possible_types {
            interface.add_possible_type(checked_name(ctx, possible.name)?);
        }
    }
    Ok(interface)
}

fn build_union<'a>(ctx: &'a SchemaContext, raw: &IntrospectionUnionType) -> Result<SchemaUnion<'a>> {
    let name = checked_name(ctx, raw.name)?;
    let mut union_type = SchemaUnion::new(ctx, name);
    if let Some(possible_types) = &raw.possible_types {
        for possible in possible_types {
            union_type.add_possible_type(checked_name(ctx, possible.name)?);
        }
    }
    Ok(union_type)
}

fn build_enum<'a>(ctx: &'a SchemaContext, raw: &IntrospectionEnumType) -> Result<SchemaEnum<'a>> {
    let name = checked_name(ctx, raw.name)?;
    let values = raw
        .enum_values
        .as_ref()
        .filter(|values| !values.is_empty())
        .ok_or_else(|| malformed(format!("enum \"{name}\" declares no values")))?;
    let mut enum_type = SchemaEnum::new(ctx, name);
    for value in values {
        enum_type.add_value(checked_name(ctx, value.name)?);
    }
    Ok(enum_type)
}

pub trait BuildSchemaIndex<'a> {
    /// Normalizes the introspected data into a [SchemaIndex].
    fn build_schema_index(&self, ctx: &'a SchemaContext) -> Result<&'a SchemaIndex<'a>>;
}

impl<'a> BuildSchemaIndex<'a> for IntrospectionSchema<'a> {
    fn build_schema_index(&self, ctx: &'a SchemaContext) -> Result<&'a SchemaIndex<'a>> {
        use super::introspection::IntrospectionType;

        let mut index = SchemaIndex::new_in(&ctx.arena);
        for introspection_type in &self.types {
            let name = introspection_type.name();
            // Meta types and scalar primitives never enter the index.
            if is_reserved_type_name(name) || is_builtin_scalar_name(name) {
                continue;
            }
            let schema_type = match introspection_type {
                IntrospectionType::Scalar(scalar) => {
                    SchemaType::Scalar(ctx.alloc(SchemaScalar::new(checked_name(ctx, scalar.name)?)))
                }
                IntrospectionType::Object(object) => {
                    SchemaType::Object(ctx.alloc(build_object(ctx, object)?))
                }
                IntrospectionType::Interface(interface) => {
                    SchemaType::Interface(ctx.alloc(build_interface(ctx, interface)?))
                }
                IntrospectionType::Union(union_type) => {
                    SchemaType::Union(ctx.alloc(build_union(ctx, union_type)?))
                }
                IntrospectionType::Enum(enum_type) => {
                    SchemaType::Enum(ctx.alloc(build_enum(ctx, enum_type)?))
                }
                IntrospectionType::InputObject(_) => continue,
            };
            index
                .types
                .insert(ctx.alloc_str(name), ctx.alloc(schema_type));
        }

        index.query_type = self
            .query_type
            .as_ref()
            .map(|type_ref| ctx.alloc_str(type_ref.name));

        Ok(ctx.alloc(index))
    }
}

impl<'a> BuildSchemaIndex<'a> for IntrospectionQuery<'a> {
    fn build_schema_index(&self, ctx: &'a SchemaContext) -> Result<&'a SchemaIndex<'a>> {
        self.schema.build_schema_index(ctx)
    }
}
