//! Synthesis of GraphQL `__schema` introspection documents.
//!
//! Fixtures describe a remote schema as data and render it to the wire shape
//! the engine under test consumes. The synthesizer never validates
//! cross-references between types: a field may reference a type that is
//! absent from the emitted `types` list, which is exactly how the
//! missing-remote-type scenarios are produced.

use serde::{
    ser::{SerializeStruct, Serializer},
    Serialize,
};
use serde_json::json;

/// A GraphQL type reference, nesting arbitrarily through the `NON_NULL` and
/// `LIST` wrappers. Leaves carry a type name, wrappers carry an inner
/// reference; the enum shape makes any other combination unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(&'static str),
    Object(&'static str),
    InputObject(&'static str),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn scalar(name: &'static str) -> Self {
        TypeRef::Scalar(name)
    }

    pub fn object(name: &'static str) -> Self {
        TypeRef::Object(name)
    }

    pub fn input_object(name: &'static str) -> Self {
        TypeRef::InputObject(name)
    }

    /// Wraps `self` in a `LIST`, so `object("Post").non_null().list()` reads
    /// inside-out as `[Post!]`.
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }
}

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (kind, name, of_type) = match self {
            TypeRef::Scalar(name) => ("SCALAR", Some(*name), None),
            TypeRef::Object(name) => ("OBJECT", Some(*name), None),
            TypeRef::InputObject(name) => ("INPUT_OBJECT", Some(*name), None),
            TypeRef::List(inner) => ("LIST", None, Some(inner.as_ref())),
            TypeRef::NonNull(inner) => ("NON_NULL", None, Some(inner.as_ref())),
        };

        let mut state = serializer.serialize_struct("TypeRef", 3)?;
        state.serialize_field("kind", kind)?;
        state.serialize_field("name", &name)?;
        state.serialize_field("ofType", &of_type)?;
        state.end()
    }
}

/// One query or mutation field of the simulated remote schema.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    name: &'static str,
    args: Vec<InputValueDef>,
    #[serde(rename = "type")]
    ty: TypeRef,
    is_deprecated: bool,
    deprecation_reason: Option<&'static str>,
}

impl FieldDef {
    pub fn new(name: &'static str, ty: TypeRef) -> Self {
        FieldDef {
            name,
            args: Vec::new(),
            ty,
            is_deprecated: false,
            deprecation_reason: None,
        }
    }

    pub fn arg(mut self, name: &'static str, ty: TypeRef) -> Self {
        self.args.push(InputValueDef {
            name,
            ty,
            default_value: None,
        });
        self
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputValueDef {
    name: &'static str,
    #[serde(rename = "type")]
    ty: TypeRef,
    default_value: Option<serde_json::Value>,
}

/// A member of an `INPUT_OBJECT` type. The wire format reports these under
/// `fields` with the same deprecation pair as object fields, matching what
/// the consuming engine was built against.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputFieldDef {
    name: &'static str,
    #[serde(rename = "type")]
    ty: TypeRef,
    is_deprecated: bool,
    deprecation_reason: Option<&'static str>,
}

impl InputFieldDef {
    pub fn new(name: &'static str, ty: TypeRef) -> Self {
        InputFieldDef {
            name,
            ty,
            is_deprecated: false,
            deprecation_reason: None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind")]
pub enum TypeDef {
    #[serde(rename = "OBJECT")]
    Object {
        name: &'static str,
        fields: Vec<FieldDef>,
    },
    #[serde(rename = "INPUT_OBJECT")]
    InputObject {
        name: &'static str,
        fields: Vec<InputFieldDef>,
    },
}

impl TypeDef {
    pub fn object(name: &'static str, fields: Vec<FieldDef>) -> Self {
        TypeDef::Object { name, fields }
    }

    pub fn input_object(name: &'static str, fields: Vec<InputFieldDef>) -> Self {
        TypeDef::InputObject { name, fields }
    }
}

#[derive(Clone, Debug, Serialize)]
struct NamedType {
    name: &'static str,
}

/// A canonical `__schema` document. Root operation types default to `null`,
/// which is itself a fixture: a remote schema with neither query nor
/// mutation type is one of the broken-schema scenarios.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    query_type: Option<NamedType>,
    mutation_type: Option<NamedType>,
    subscription_type: Option<NamedType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    types: Vec<TypeDef>,
}

impl SchemaDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query_type(mut self, name: &'static str) -> Self {
        self.query_type = Some(NamedType { name });
        self
    }

    pub fn with_mutation_type(mut self, name: &'static str) -> Self {
        self.mutation_type = Some(NamedType { name });
        self
    }

    pub fn with_type(mut self, ty: TypeDef) -> Self {
        self.types.push(ty);
        self
    }

    /// Renders the document as the body of an introspection response.
    pub fn into_response_value(self) -> serde_json::Value {
        json!({ "data": { "__schema": self } })
    }
}
