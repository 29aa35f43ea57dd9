use bumpalo::collections::Vec as ArenaVec;
use serde_json::{Map as JsMap, Value as JsValue};

use super::descriptor::{
    DescriptorRegistry, EnumDescriptor, Property, RecordDescriptor, RecordIdentity, Shape,
};
use crate::error::{Error, ErrorKind, Result};
use crate::schema::{ScalarRegistry, SchemaContext, SchemaIndex, SchemaType, TypeRef};
use crate::selection::{FieldPath, SelectionMap};
use crate::walk::{check_depth, strip_non_null, Typed};

/// Infers the registry of structural types one sample response can contain.
///
/// The walk is directed by the schema index and, for interface/union
/// positions, by the selection map; record descriptors are deduplicated by
/// their (path, type name) identity. The returned registry is scoped to this
/// run and carries no relationship to any later decode run beyond structural
/// agreement.
pub fn synthesize<'a>(
    ctx: &'a SchemaContext,
    schema: &SchemaIndex<'a>,
    selection: &SelectionMap,
    sample: &JsValue,
    root_type_name: &str,
) -> Result<DescriptorRegistry<'a>> {
    let root = sample.as_object().ok_or_else(|| {
        Error::new(
            ErrorKind::MalformedResponse,
            "sample response root must be an object",
        )
    })?;

    let mut run = SynthesisRun {
        ctx,
        schema,
        selection,
        registry: DescriptorRegistry::new(),
    };
    run.register_schema_enums();

    let mut path = FieldPath::root();
    run.record_value(root, root_type_name, &mut path, 0)?;
    Ok(run.registry)
}

struct SynthesisRun<'a, 'b> {
    ctx: &'a SchemaContext,
    schema: &'b SchemaIndex<'a>,
    selection: &'b SelectionMap,
    registry: DescriptorRegistry<'a>,
}

fn joined(path: &FieldPath, field: &str) -> String {
    if path.is_root() {
        field.to_string()
    } else {
        format!("{}.{field}", path.key())
    }
}

impl<'a, 'b> SynthesisRun<'a, 'b> {
    /// Enum shapes are synthesized eagerly for every enum in the schema, so
    /// they are available even when the sample response doesn't exercise a
    /// value of theirs.
    fn register_schema_enums(&mut self) {
        for schema_type in self.schema.types() {
            if let SchemaType::Enum(schema_enum) = schema_type {
                let mut values = ArenaVec::new_in(&self.ctx.arena);
                values.extend(schema_enum.values().iter().copied());
                self.registry.insert_enum(self.ctx.alloc(EnumDescriptor {
                    name: schema_enum.name,
                    values,
                }));
            }
        }
    }

    fn record_value(
        &mut self,
        obj: &JsMap<String, JsValue>,
        declared: &str,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<&'a RecordDescriptor<'a>> {
        check_depth(depth, &path.key())?;

        let declared_type = self.schema.get_type(declared).ok_or_else(|| {
            Error::new_at(
                ErrorKind::MalformedSchema,
                format!("type \"{declared}\" is not present in the schema"),
                path.key(),
            )
        })?;

        let discriminator = obj.get("__typename").and_then(JsValue::as_str);
        let concrete_name = match discriminator {
            Some(name) => name,
            None if declared_type.is_polymorphic() => {
                return Err(Error::new_at(
                    ErrorKind::MissingDiscriminator,
                    format!("object of {} type \"{declared}\" carries no __typename", declared_type.kind()),
                    path.key(),
                ));
            }
            None => declared,
        };

        let identity = RecordIdentity {
            path: self.ctx.alloc_str(&path.key()),
            type_name: self.ctx.alloc_str(concrete_name),
        };
        if let Some(existing) = self.registry.record(&identity) {
            return Ok(existing);
        }

        let concrete_type = self.schema.get_type(concrete_name).ok_or_else(|| {
            Error::new_at(
                ErrorKind::MalformedSchema,
                format!("concrete type \"{concrete_name}\" is not present in the schema"),
                path.key(),
            )
        })?;
        if !matches!(concrete_type, SchemaType::Object(_) | SchemaType::Interface(_)) {
            return Err(Error::new_at(
                ErrorKind::MalformedSchema,
                format!("type \"{concrete_name}\" is not an object type"),
                path.key(),
            ));
        }

        // Interface/union positions materialize only the fields selected
        // directly on the abstract type; fragment-conditioned fields are
        // computed by the selection layer but not merged here. Object
        // positions materialize every field the sample carries.
        let field_names: Vec<String> = if declared_type.is_polymorphic() {
            self.selection.type_fields(path).to_vec()
        } else {
            obj.keys()
                .filter(|key| *key != "__typename")
                .cloned()
                .collect()
        };

        let mut properties = ArenaVec::new_in(&self.ctx.arena);
        for name in &field_names {
            let schema_field = concrete_type.field(name).ok_or_else(|| {
                Error::new_at(
                    ErrorKind::MissingField,
                    format!("type \"{concrete_name}\" has no field \"{name}\""),
                    joined(path, name),
                )
            })?;
            let of_type = self.classify(schema_field.of_type, obj.get(name), name, path, depth + 1)?;
            properties.push(Property {
                name: self.ctx.alloc_str(name),
                of_type,
            });
        }

        let base = declared_type.is_polymorphic().then(|| RecordIdentity {
            path: identity.path,
            type_name: self.ctx.alloc_str(declared),
        });

        let descriptor = self.ctx.alloc(RecordDescriptor {
            identity,
            properties,
            base,
        });
        self.registry.insert_record(descriptor);
        Ok(descriptor)
    }

    fn classify(
        &mut self,
        of_type: &'a TypeRef<'a>,
        value: Option<&JsValue>,
        field: &str,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<Typed<Shape<'a>>> {
        let err_path = joined(path, field);
        check_depth(depth, &err_path)?;
        let (unwrapped, required) = strip_non_null(of_type, &err_path)?;

        match value.filter(|value| !value.is_null()) {
            None => {
                if required {
                    return Err(Error::new_at(
                        ErrorKind::NullabilityViolation,
                        format!("field \"{field}\" is non-null but the sample carries no value"),
                        err_path,
                    )
                    .with_context(format!("expected {of_type}")));
                }
                let shape = self.shape_without_value(unwrapped, field, path, depth)?;
                Ok(Typed::Optional(shape))
            }
            Some(value) => {
                let shape = self.shape_of(unwrapped, value, field, path, depth)?;
                Ok(Typed::new(shape, required))
            }
        }
    }

    /// Classifies a position for which the sample carries a non-null value.
    fn shape_of(
        &mut self,
        unwrapped: &'a TypeRef<'a>,
        value: &JsValue,
        field: &str,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<Shape<'a>> {
        let err_path = joined(path, field);
        match unwrapped {
            TypeRef::NonNull(_) => Err(Error::new_at(
                ErrorKind::UnsupportedSchemaShape,
                "unexpected non-null wrapper after unwrapping",
                err_path,
            )),
            TypeRef::List(item) => {
                let elements = value.as_array().ok_or_else(|| {
                    Error::new_at(
                        ErrorKind::MalformedResponse,
                        format!("field \"{field}\" is list-typed but the sample value is not an array"),
                        err_path.clone(),
                    )
                })?;
                let (item_inner, item_required) = strip_non_null(item, &err_path)?;

                // Classify every element; a null element is only legal for
                // nullable item types. Elements that fail for lack of a
                // sample are retried once the remaining elements had a
                // chance to register a representative descriptor.
                let mut element_shape = None;
                let mut deferred = Vec::new();
                for element in elements {
                    if element.is_null() {
                        if item_required {
                            return Err(Error::new_at(
                                ErrorKind::NullabilityViolation,
                                format!("list \"{field}\" of non-null items contains a null element"),
                                err_path.clone(),
                            )
                            .with_context(format!("expected [{item}]")));
                        }
                        continue;
                    }
                    match self.shape_of(item_inner, element, field, path, depth + 1) {
                        Ok(shape) => element_shape.get_or_insert(shape),
                        Err(error) if error.kind() == ErrorKind::InsufficientSample => {
                            deferred.push(element);
                            continue;
                        }
                        Err(error) => return Err(error),
                    };
                }
                for element in deferred {
                    let shape = self.shape_of(item_inner, element, field, path, depth + 1)?;
                    element_shape.get_or_insert(shape);
                }

                let shape = match element_shape {
                    Some(shape) => shape,
                    None => self.shape_without_value(item_inner, field, path, depth + 1)?,
                };
                Ok(Shape::List(self.ctx.alloc(Typed::new(shape, item_required))))
            }
            TypeRef::Object(name) | TypeRef::Interface(name) | TypeRef::Union(name) => {
                let obj = value.as_object().ok_or_else(|| {
                    Error::new_at(
                        ErrorKind::MalformedResponse,
                        format!("field \"{field}\" is object-typed but the sample value is not an object"),
                        err_path,
                    )
                })?;
                path.push(field);
                let descriptor = self.record_value(obj, name, path, depth + 1);
                path.pop();
                Ok(Shape::Record(descriptor?))
            }
            TypeRef::Enum(name) => {
                if !value.is_string() {
                    return Err(Error::new_at(
                        ErrorKind::MalformedResponse,
                        format!("enum field \"{field}\" requires a string sample value"),
                        err_path,
                    ));
                }
                self.enum_shape(name, &err_path)
            }
            TypeRef::Scalar(name) => Ok(Shape::Scalar(
                ScalarRegistry::resolve(name).map_err(|error| error.with_context(err_path))?,
            )),
        }
    }

    /// Classifies a position for which the sample carries null or nothing.
    ///
    /// Scalars and enums type themselves; object positions fall back to a
    /// descriptor another occurrence of the same (path, type) already
    /// registered; polymorphic positions cannot be discriminated without a
    /// sample at all.
    fn shape_without_value(
        &mut self,
        unwrapped: &'a TypeRef<'a>,
        field: &str,
        path: &mut FieldPath,
        depth: usize,
    ) -> Result<Shape<'a>> {
        let err_path = joined(path, field);
        match unwrapped {
            TypeRef::NonNull(_) => Err(Error::new_at(
                ErrorKind::UnsupportedSchemaShape,
                "unexpected non-null wrapper after unwrapping",
                err_path,
            )),
            TypeRef::List(item) => {
                let (item_inner, item_required) = strip_non_null(item, &err_path)?;
                let shape = self.shape_without_value(item_inner, field, path, depth + 1)?;
                Ok(Shape::List(self.ctx.alloc(Typed::new(shape, item_required))))
            }
            TypeRef::Object(name) => {
                path.push(field);
                let identity = RecordIdentity {
                    path: self.ctx.alloc_str(&path.key()),
                    type_name: self.ctx.alloc_str(name),
                };
                path.pop();
                self.registry.record(&identity).map(Shape::Record).ok_or_else(|| {
                    Error::new_at(
                        ErrorKind::InsufficientSample,
                        format!("object field \"{field}\" has no non-null sample to infer a shape from"),
                        err_path,
                    )
                })
            }
            TypeRef::Interface(name) | TypeRef::Union(name) => Err(Error::new_at(
                ErrorKind::InsufficientSample,
                format!("polymorphic field \"{field}\" of type \"{name}\" has no non-null sample to discriminate"),
                err_path,
            )),
            TypeRef::Enum(name) => self.enum_shape(name, &err_path),
            TypeRef::Scalar(name) => Ok(Shape::Scalar(
                ScalarRegistry::resolve(name).map_err(|error| error.with_context(err_path))?,
            )),
        }
    }

    fn enum_shape(&self, name: &str, err_path: &str) -> Result<Shape<'a>> {
        self.registry.enum_of(name).map(Shape::Enum).ok_or_else(|| {
            Error::new_at(
                ErrorKind::MalformedSchema,
                format!("enum \"{name}\" is not present in the schema"),
                err_path,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BuildSchemaIndex, IntrospectionQuery, ScalarKind};
    use serde_json::json;

    fn fixture_index(ctx: &SchemaContext) -> &SchemaIndex<'_> {
        let introspection_json = include_str!("../../fixture/introspection_query.json");
        let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
        introspection.build_schema_index(ctx).unwrap()
    }

    fn pet_selection() -> SelectionMap {
        let mut selection = SelectionMap::new();
        let site = selection.site_mut(&FieldPath::from(["pet"]));
        site.add_field("name");
        site.add_fragment_field("Dog", "breed");
        selection
    }

    fn identity<'a>(path: &'a str, type_name: &'a str) -> RecordIdentity<'a> {
        RecordIdentity { path, type_name }
    }

    #[test]
    fn pet_interface_scenario() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let sample = json!({
            "pet": { "__typename": "Dog", "name": "Rex", "breed": "Lab" }
        });

        let registry = synthesize(&ctx, index, &pet_selection(), &sample, "Query").unwrap();

        // Only the interface-common field is materialized; the Dog-only
        // fragment field stays out of the shared descriptor.
        let dog = registry.record(&identity("pet", "Dog")).unwrap();
        let names: Vec<_> = dog.property_names().collect();
        assert_eq!(names, vec!["name"]);
        assert_eq!(dog.base, Some(identity("pet", "Pet")));
        assert!(matches!(
            dog.property("name").unwrap().of_type,
            Typed::Required(Shape::Scalar(ScalarKind::String))
        ));

        let root = registry.record(&identity("", "Query")).unwrap();
        match root.property("pet").unwrap().of_type {
            Typed::Optional(Shape::Record(record)) => {
                assert_eq!(record.identity, identity("pet", "Dog"));
            }
            other => panic!("expected optional record, got {other:?}"),
        }
    }

    #[test]
    fn deduplicates_by_path_and_type() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        // The first element lacks a friends sample and is classified through
        // the representative descriptor the second element registers.
        let sample = json!({
            "heroes": [
                { "id": "2", "name": "Leia", "appearsIn": ["JEDI"], "friends": [] },
                {
                    "id": "1",
                    "name": "Luke",
                    "appearsIn": ["EMPIRE"],
                    "friends": [{ "id": "3", "name": "Han", "appearsIn": [] }]
                }
            ]
        });

        let registry = synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap();

        // One descriptor per distinct (path, type) pair: the root, the list
        // elements, and the nested friends, not one per element.
        assert_eq!(registry.record_count(), 3);
        assert!(registry.record(&identity("heroes", "Character")).is_some());
        assert!(registry.record(&identity("heroes.friends", "Character")).is_some());

        let element = registry.record(&identity("heroes", "Character")).unwrap();
        match element.property("friends").unwrap().of_type {
            Typed::Optional(Shape::List(item)) => match item {
                Typed::Optional(Shape::Record(record)) => {
                    assert_eq!(record.identity, identity("heroes.friends", "Character"));
                }
                other => panic!("expected optional record item, got {other:?}"),
            },
            other => panic!("expected optional list, got {other:?}"),
        }
    }

    #[test]
    fn synthesis_is_deterministic() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let sample = json!({
            "hero": {
                "id": "1",
                "name": "Luke",
                "appearsIn": ["EMPIRE", "JEDI"],
                "height": 1.72,
                "birthday": null
            }
        });

        let first = synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap();
        let second = synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap();

        let first_identities: Vec<_> = first.records().map(|record| record.identity).collect();
        let second_identities: Vec<_> = second.records().map(|record| record.identity).collect();
        assert_eq!(first_identities, second_identities);

        for (left, right) in first.records().zip(second.records()) {
            let left_names: Vec<_> = left.property_names().collect();
            let right_names: Vec<_> = right.property_names().collect();
            assert_eq!(left_names, right_names);
        }
    }

    #[test]
    fn enum_and_scalar_classification() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let sample = json!({
            "hero": {
                "appearsIn": ["EMPIRE", "JEDI"],
                "height": 1.72,
                "birthday": "1977-05-25",
                "website": null
            }
        });

        let registry = synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap();
        let hero = registry.record(&identity("hero", "Character")).unwrap();

        match hero.property("appearsIn").unwrap().of_type {
            Typed::Required(Shape::List(item)) => match item {
                Typed::Required(Shape::Enum(descriptor)) => {
                    assert_eq!(descriptor.name, "Episode");
                    assert_eq!(&descriptor.values[..], &["NEWHOPE", "EMPIRE", "JEDI"]);
                }
                other => panic!("expected required enum item, got {other:?}"),
            },
            other => panic!("expected required list, got {other:?}"),
        }
        assert!(matches!(
            hero.property("height").unwrap().of_type,
            Typed::Optional(Shape::Scalar(ScalarKind::Float))
        ));
        assert!(matches!(
            hero.property("birthday").unwrap().of_type,
            Typed::Optional(Shape::Scalar(ScalarKind::Date))
        ));
        assert!(matches!(
            hero.property("website").unwrap().of_type,
            Typed::Optional(Shape::Scalar(ScalarKind::Uri))
        ));
    }

    #[test]
    fn enums_are_synthesized_eagerly() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        // The sample exercises no enum value at all.
        let sample = json!({ "hero": { "id": "1", "name": "Luke" } });

        let registry = synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap();
        let episode = registry.enum_of("Episode").unwrap();
        assert_eq!(&episode.values[..], &["NEWHOPE", "EMPIRE", "JEDI"]);
    }

    #[test]
    fn union_position_uses_selection_fields() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let mut selection = SelectionMap::new();
        selection.site_mut(&FieldPath::from(["search"])).add_field("name");
        let sample = json!({
            "search": [{ "__typename": "Cat", "name": "Tom", "lives": 9 }]
        });

        let registry = synthesize(&ctx, index, &selection, &sample, "Query").unwrap();
        let cat = registry.record(&identity("search", "Cat")).unwrap();
        let names: Vec<_> = cat.property_names().collect();
        assert_eq!(names, vec!["name"]);
        assert_eq!(cat.base, Some(identity("search", "SearchResult")));
    }

    #[test]
    fn polymorphic_object_without_typename_fails() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let sample = json!({ "pet": { "name": "Rex" } });

        let error =
            synthesize(&ctx, index, &pet_selection(), &sample, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingDiscriminator);
    }

    #[test]
    fn unknown_response_field_fails() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let sample = json!({ "hero": { "id": "1", "power": "strong" } });

        let error =
            synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingField);
        assert_eq!(error.path(), Some("hero.power"));
    }

    #[test]
    fn null_for_non_null_field_fails() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let sample = json!({ "hero": null });

        let error =
            synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NullabilityViolation);
    }

    #[test]
    fn all_null_polymorphic_list_is_insufficient() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let sample = json!({ "search": [null, null] });

        let error =
            synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InsufficientSample);
    }

    #[test]
    fn pathological_nesting_fails_with_depth_exceeded() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);

        let mut nested = json!({ "id": "0", "name": "deep", "appearsIn": [] });
        for _ in 0..128 {
            nested = json!({ "friends": [nested] });
        }
        let sample = json!({ "hero": nested });

        let error =
            synthesize(&ctx, index, &SelectionMap::new(), &sample, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DepthExceeded);
    }
}
