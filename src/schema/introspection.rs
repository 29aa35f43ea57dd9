//! Serde shapes for the standard GraphQL introspection payload.
//!
//! Only the parts the schema index consumes are modeled: type names, kinds,
//! output field lists, enum values, and possible types. Everything else in the
//! payload (descriptions, deprecations, directives, arguments) is ignored by
//! serde and never allocated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionQuery<'a> {
    #[serde(rename = "__schema", borrow)]
    pub schema: IntrospectionSchema<'a>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema<'a> {
    pub query_type: Option<IntrospectionNamedTypeRef<'a>>,
    pub mutation_type: Option<IntrospectionNamedTypeRef<'a>>,
    pub subscription_type: Option<IntrospectionNamedTypeRef<'a>>,
    #[serde(borrow)]
    pub types: Vec<IntrospectionType<'a>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrospectionType<'a> {
    #[serde(borrow)]
    Scalar(IntrospectionScalarType<'a>),
    Object(IntrospectionObjectType<'a>),
    Interface(IntrospectionInterfaceType<'a>),
    Union(IntrospectionUnionType<'a>),
    Enum(IntrospectionEnumType<'a>),
    // Parsed so tagged deserialization succeeds; the index never materializes
    // input objects since they can't occur in a response.
    InputObject(IntrospectionInputObjectType<'a>),
}

impl<'a> IntrospectionType<'a> {
    #[inline]
    pub fn name(&self) -> &'a str {
        match self {
            IntrospectionType::Scalar(x) => x.name,
            IntrospectionType::Object(x) => x.name,
            IntrospectionType::Interface(x) => x.name,
            IntrospectionType::Union(x) => x.name,
            IntrospectionType::Enum(x) => x.name,
            IntrospectionType::InputObject(x) => x.name,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionScalarType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionObjectType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub fields: Option<Vec<IntrospectionField<'a>>>,
    #[serde(default)]
    pub interfaces: Option<Vec<IntrospectionNamedTypeRef<'a>>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInterfaceType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub fields: Option<Vec<IntrospectionField<'a>>>,
    #[serde(default)]
    pub possible_types: Option<Vec<IntrospectionNamedTypeRef<'a>>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionUnionType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    #[serde(default)]
    pub possible_types: Option<Vec<IntrospectionNamedTypeRef<'a>>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    pub enum_values: Option<Vec<IntrospectionEnumValue<'a>>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionInputObjectType<'a> {
    #[serde(borrow)]
    pub name: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionEnumValue<'a> {
    #[serde(borrow)]
    pub name: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IntrospectionField<'a> {
    #[serde(borrow)]
    pub name: &'a str,
    #[serde(rename = "type")]
    pub of_type: IntrospectionTypeRef<'a>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionNamedTypeRef<'a> {
    pub kind: Option<&'a str>,
    #[serde(borrow)]
    pub name: &'a str,
}

/// A raw type reference as introspection nests it: wrapper kinds carry an
/// `ofType`, named kinds carry a `name`. The inner reference is optional here
/// so that a truncated payload surfaces as a schema error during index
/// building rather than as a serde error without context.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrospectionTypeRef<'a> {
    NonNull {
        #[serde(rename = "ofType", default)]
        of_type: Option<Box<IntrospectionTypeRef<'a>>>,
    },
    List {
        #[serde(rename = "ofType", default)]
        of_type: Option<Box<IntrospectionTypeRef<'a>>>,
    },
    Scalar {
        #[serde(borrow)]
        name: &'a str,
    },
    Object {
        #[serde(borrow)]
        name: &'a str,
    },
    Interface {
        #[serde(borrow)]
        name: &'a str,
    },
    Union {
        #[serde(borrow)]
        name: &'a str,
    },
    Enum {
        #[serde(borrow)]
        name: &'a str,
    },
    InputObject {
        #[serde(borrow)]
        name: &'a str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn deserialize_nested_type_ref() {
        let json = indoc! {r#"
            {
              "name": "appearsIn",
              "type": {
                "kind": "NON_NULL",
                "ofType": {
                  "kind": "LIST",
                  "ofType": { "kind": "ENUM", "name": "Episode" }
                }
              }
            }
        "#};
        let field: IntrospectionField = serde_json::from_str(json).unwrap();
        assert_eq!(field.name, "appearsIn");
        match field.of_type {
            IntrospectionTypeRef::NonNull { of_type: Some(inner) } => match *inner {
                IntrospectionTypeRef::List { of_type: Some(item) } => {
                    assert!(matches!(*item, IntrospectionTypeRef::Enum { name: "Episode" }));
                }
                other => panic!("expected list, got {other:?}"),
            },
            other => panic!("expected non-null, got {other:?}"),
        }
    }
}
