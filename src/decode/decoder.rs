use serde_json::{Map as JsMap, Value as JsValue};

use super::value::{DecodedValue, EnumValue, RecordValue};
use crate::error::{Error, ErrorKind, Result};
use crate::schema::{ScalarKind, ScalarRegistry, SchemaIndex, SchemaType, TypeRef};
use crate::selection::FieldPath;
use crate::walk::{check_depth, strip_non_null};

/// Decodes a response data object into a [DecodedValue] tree.
///
/// The walk mirrors type synthesis but needs no selection map and no identity
/// registry: every field present in the response is looked up in the schema
/// type's field list by name, and polymorphic objects resolve their concrete
/// type purely from the `__typename` discriminator the response carries.
/// Decoding has no persistent state and runs independently of any synthesis.
pub fn decode(schema: &SchemaIndex, data: &JsValue, root_type_name: &str) -> Result<DecodedValue> {
    let obj = data.as_object().ok_or_else(|| {
        Error::new(
            ErrorKind::MalformedResponse,
            "response data root must be an object",
        )
    })?;
    let mut path = FieldPath::root();
    let record = decode_record(schema, obj, root_type_name, &mut path, 0)?;
    Ok(DecodedValue::Record(record))
}

fn joined(path: &FieldPath, field: &str) -> String {
    if path.is_root() {
        field.to_string()
    } else {
        format!("{}.{field}", path.key())
    }
}

fn decode_record(
    schema: &SchemaIndex,
    obj: &JsMap<String, JsValue>,
    declared: &str,
    path: &mut FieldPath,
    depth: usize,
) -> Result<RecordValue> {
    check_depth(depth, &path.key())?;

    let declared_type = schema.get_type(declared).ok_or_else(|| {
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
                format!(
                    "object of {} type \"{declared}\" carries no __typename",
                    declared_type.kind()
                ),
                path.key(),
            ));
        }
        None => declared,
    };

    let concrete_type = schema.get_type(concrete_name).ok_or_else(|| {
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

    let mut record = RecordValue::new();
    for (key, value) in obj {
        if key == "__typename" {
            continue;
        }
        let schema_field = concrete_type.field(key).ok_or_else(|| {
            Error::new_at(
                ErrorKind::MissingField,
                format!("type \"{concrete_name}\" has no field \"{key}\""),
                joined(path, key),
            )
        })?;
        let decoded = decode_field(schema, schema_field.of_type, value, key, path, depth + 1)?;
        record.insert(key, decoded)?;
    }
    Ok(record)
}

/// Decodes one field position, threading nullability: non-null positions
/// yield their value directly and reject null; nullable positions always
/// yield an `Optional` wrapper.
fn decode_field(
    schema: &SchemaIndex,
    of_type: &TypeRef,
    value: &JsValue,
    field: &str,
    path: &mut FieldPath,
    depth: usize,
) -> Result<DecodedValue> {
    let err_path = joined(path, field);
    check_depth(depth, &err_path)?;
    let (unwrapped, required) = strip_non_null(of_type, &err_path)?;

    if value.is_null() {
        if required {
            return Err(Error::new_at(
                ErrorKind::NullabilityViolation,
                format!("received null for non-nullable field \"{field}\""),
                err_path,
            )
            .with_context(format!("expected {of_type}")));
        }
        return Ok(DecodedValue::absent());
    }

    let inner = decode_value(schema, unwrapped, value, field, path, depth)?;
    if required {
        Ok(inner)
    } else {
        Ok(DecodedValue::present(inner))
    }
}

fn decode_value(
    schema: &SchemaIndex,
    unwrapped: &TypeRef,
    value: &JsValue,
    field: &str,
    path: &mut FieldPath,
    depth: usize,
) -> Result<DecodedValue> {
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
                    format!("field \"{field}\" is list-typed but the response value is not an array"),
                    err_path,
                )
            })?;
            let mut decoded = Vec::with_capacity(elements.len());
            for element in elements {
                decoded.push(decode_field(schema, item, element, field, path, depth + 1)?);
            }
            Ok(DecodedValue::List(decoded))
        }
        TypeRef::Object(name) | TypeRef::Interface(name) | TypeRef::Union(name) => {
            let obj = value.as_object().ok_or_else(|| {
                Error::new_at(
                    ErrorKind::MalformedResponse,
                    format!("field \"{field}\" is object-typed but the response value is not an object"),
                    err_path,
                )
            })?;
            path.push(field);
            let record = decode_record(schema, obj, name, path, depth + 1);
            path.pop();
            Ok(DecodedValue::Record(record?))
        }
        TypeRef::Enum(name) => {
            let selected = value.as_str().ok_or_else(|| {
                Error::new_at(
                    ErrorKind::MalformedResponse,
                    format!("enum field \"{field}\" requires a string response value"),
                    err_path,
                )
            })?;
            // Schema-declared enum membership is deliberately not re-checked
            // here; unknown values pass through for the consumer to judge.
            Ok(DecodedValue::Enum(EnumValue {
                enum_type: name.to_string(),
                value: selected.to_string(),
            }))
        }
        TypeRef::Scalar(name) => {
            let kind = ScalarRegistry::resolve(name)
                .map_err(|error| error.with_context(err_path.clone()))?;
            decode_scalar(kind, value, field, &err_path)
        }
    }
}

fn decode_scalar(
    kind: ScalarKind,
    value: &JsValue,
    field: &str,
    err_path: &str,
) -> Result<DecodedValue> {
    let mismatch = |expected: &str| {
        Error::new_at(
            ErrorKind::MalformedResponse,
            format!("scalar field \"{field}\" requires a {expected} response value"),
            err_path,
        )
    };
    match kind {
        ScalarKind::Int => {
            // A number that is not a 32-bit integer is a range violation;
            // only non-number shapes are malformed. This covers fractional
            // values and u64 magnitudes beyond i64 as well.
            if !value.is_number() {
                return Err(mismatch("integer"));
            }
            value
                .as_i64()
                .and_then(|number| i32::try_from(number).ok())
                .map(DecodedValue::Int)
                .ok_or_else(|| {
                    Error::new_at(
                        ErrorKind::ScalarRangeViolation,
                        format!("value {value} of field \"{field}\" does not fit a 32-bit integer"),
                        err_path,
                    )
                })
        }
        ScalarKind::Float => {
            let number = value.as_f64().ok_or_else(|| mismatch("number"))?;
            if !number.is_finite() {
                return Err(Error::new_at(
                    ErrorKind::ScalarRangeViolation,
                    format!("received non-finite number for field \"{field}\""),
                    err_path,
                ));
            }
            Ok(DecodedValue::Float(number))
        }
        ScalarKind::Boolean => value
            .as_bool()
            .map(DecodedValue::Boolean)
            .ok_or_else(|| mismatch("boolean")),
        ScalarKind::Id => match value {
            JsValue::String(id) => Ok(DecodedValue::String(id.clone())),
            // Servers commonly serialize numeric ids; coerce like any other
            // typed JSON-to-value cast.
            JsValue::Number(number) => Ok(DecodedValue::String(number.to_string())),
            _ => Err(mismatch("string")),
        },
        ScalarKind::String | ScalarKind::Date | ScalarKind::DateTime | ScalarKind::Uri => value
            .as_str()
            .map(|s| DecodedValue::String(s.to_string()))
            .ok_or_else(|| mismatch("string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BuildSchemaIndex, IntrospectionQuery, SchemaContext};
    use serde_json::json;

    fn fixture_index(ctx: &SchemaContext) -> &SchemaIndex<'_> {
        let introspection_json = include_str!("../../fixture/introspection_query.json");
        let introspection: IntrospectionQuery = serde_json::from_str(introspection_json).unwrap();
        introspection.build_schema_index(ctx).unwrap()
    }

    #[test]
    fn decodes_full_concrete_field_set() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        // Decoding uses Dog's full field list regardless of any selection.
        let data = json!({
            "pet": { "__typename": "Dog", "name": "Rex", "breed": "Lab" }
        });

        let decoded = decode(index, &data, "Query").unwrap();
        let root = decoded.as_record().unwrap();
        let pet = root.get("pet").unwrap().as_record().unwrap();
        assert_eq!(pet.get("name"), Some(&DecodedValue::String("Rex".into())));
        assert_eq!(pet.get("breed"), Some(&DecodedValue::String("Lab".into())));
    }

    #[test]
    fn polymorphic_object_without_typename_fails() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let data = json!({ "pet": { "name": "Rex" } });

        let error = decode(index, &data, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingDiscriminator);
        assert_eq!(error.path(), Some("pet"));
    }

    #[test]
    fn nullable_field_round_trips_through_absent() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let data = json!({
            "hero": {
                "id": "1",
                "name": "Luke",
                "appearsIn": [],
                "birthday": null
            }
        });

        let decoded = decode(index, &data, "Query").unwrap();
        let hero = decoded.as_record().unwrap().get("hero").unwrap();
        // `hero` is non-null: never wrapped optional.
        assert!(matches!(hero, DecodedValue::Record(_)));
        let birthday = hero.as_record().unwrap().get("birthday").unwrap();
        assert!(birthday.is_absent());

        assert_eq!(decoded.to_json(), data);
    }

    #[test]
    fn null_for_non_null_field_fails() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let data = json!({ "hero": null });

        let error = decode(index, &data, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NullabilityViolation);
        assert_eq!(error.path(), Some("hero"));
    }

    #[test]
    fn list_element_strictness() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);

        // `appearsIn: [Episode!]!`: a null element violates nullability.
        let strict = json!({
            "hero": { "id": "1", "name": "Luke", "appearsIn": ["EMPIRE", null] }
        });
        let error = decode(index, &strict, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NullabilityViolation);

        // `maybeNumbers: [Int]`: a null element decodes to an absent entry.
        let lenient = json!({ "maybeNumbers": [1, null, 3] });
        let decoded = decode(index, &lenient, "Query").unwrap();
        let numbers = decoded.as_record().unwrap().get("maybeNumbers").unwrap();
        match numbers {
            DecodedValue::Optional(Some(inner)) => match inner.as_ref() {
                DecodedValue::List(elements) => {
                    assert_eq!(elements.len(), 3);
                    assert_eq!(elements[0], DecodedValue::present(DecodedValue::Int(1)));
                    assert!(elements[1].is_absent());
                    assert_eq!(elements[2], DecodedValue::present(DecodedValue::Int(3)));
                }
                other => panic!("expected list, got {other:?}"),
            },
            other => panic!("expected present optional, got {other:?}"),
        }
    }

    #[test]
    fn enum_fidelity_without_membership_check() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let data = json!({
            "hero": { "id": "1", "name": "Luke", "appearsIn": ["EMPIRE", "SPECIALS"] }
        });

        let decoded = decode(index, &data, "Query").unwrap();
        let hero = decoded.as_record().unwrap().get("hero").unwrap();
        let appears_in = hero.as_record().unwrap().get("appearsIn").unwrap();
        match appears_in {
            DecodedValue::List(elements) => {
                assert_eq!(
                    elements[0],
                    DecodedValue::Enum(EnumValue {
                        enum_type: "Episode".into(),
                        value: "EMPIRE".into(),
                    })
                );
                // Decode-time leniency: the undeclared value passes through.
                assert_eq!(
                    elements[1],
                    DecodedValue::Enum(EnumValue {
                        enum_type: "Episode".into(),
                        value: "SPECIALS".into(),
                    })
                );
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn scalar_narrowing_and_coercion() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);

        let data = json!({
            "hero": { "id": 42, "name": "Luke", "appearsIn": [], "height": 2 }
        });
        let decoded = decode(index, &data, "Query").unwrap();
        let hero = decoded.as_record().unwrap().get("hero").unwrap();
        let record = hero.as_record().unwrap();
        // Numeric id coerces to string; integer-valued Float widens.
        assert_eq!(record.get("id"), Some(&DecodedValue::String("42".into())));
        assert_eq!(
            record.get("height"),
            Some(&DecodedValue::present(DecodedValue::Float(2.0)))
        );

        let out_of_range = json!({ "maybeNumbers": [1099511627776i64] });
        let error = decode(index, &out_of_range, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ScalarRangeViolation);
    }

    #[test]
    fn int_narrowing_distinguishes_range_from_shape() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);

        // Fractional and beyond-i64 numbers are numbers that don't fit the
        // 32-bit representation: a range violation, not a shape mismatch.
        let fractional = json!({ "maybeNumbers": [1.5] });
        let error = decode(index, &fractional, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ScalarRangeViolation);

        let huge = json!({ "maybeNumbers": [u64::MAX] });
        let error = decode(index, &huge, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ScalarRangeViolation);

        // A non-number shape stays a malformed response.
        let not_a_number = json!({ "maybeNumbers": ["12"] });
        let error = decode(index, &not_a_number, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn response_shape_mismatch_fails() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let data = json!({ "maybeNumbers": "not-a-list" });

        let error = decode(index, &data, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn unknown_field_fails() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);
        let data = json!({ "pet": { "__typename": "Dog", "name": "Rex", "claws": 4 } });

        let error = decode(index, &data, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingField);
        assert_eq!(error.path(), Some("pet.claws"));
    }

    #[test]
    fn pathological_nesting_fails_with_depth_exceeded() {
        let ctx = SchemaContext::new();
        let index = fixture_index(&ctx);

        let mut nested = json!({ "id": "0", "name": "deep", "appearsIn": [] });
        for _ in 0..128 {
            nested = json!({ "friends": [nested] });
        }
        let data = json!({ "hero": nested });

        let error = decode(index, &data, "Query").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DepthExceeded);
    }
}
