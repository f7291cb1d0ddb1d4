//! The parts of a GraphQL introspection result needed to build sample operations.

use serde::Deserialize;
use serde_json::Value;

use super::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedType {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Type as written in a variable definition, e.g. `[Post]!`.
    pub fn render(&self) -> String {
        match (self.kind, &self.of_type) {
            (TypeKind::NonNull, Some(inner)) => format!("{}!", inner.render()),
            (TypeKind::List, Some(inner)) => format!("[{}]", inner.render()),
            _ => self.name.clone().unwrap_or_default(),
        }
    }

    /// Innermost named type, with list and non-null wrappers stripped.
    pub fn named(&self) -> &str {
        match &self.of_type {
            Some(inner) if self.name.is_none() => inner.named(),
            _ => self.name.as_deref().unwrap_or_default(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        self.kind == TypeKind::NonNull
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: TypeRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub query_type: Option<NamedType>,
    #[serde(default)]
    pub mutation_type: Option<NamedType>,
    #[serde(default)]
    pub subscription_type: Option<NamedType>,
    pub types: Vec<FullType>,
}

impl Schema {
    /// Accepts both `{"data": {"__schema": ...}}` and a bare `{"__schema": ...}`.
    pub fn from_document(document: &Value) -> Result<Self, Error> {
        let schema = document
            .get("data")
            .and_then(|data| data.get("__schema"))
            .or_else(|| document.get("__schema"))
            .ok_or(Error::MissingSchema)?;

        serde_json::from_value(schema.clone()).map_err(|error| Error::ParsingError(error.to_string()))
    }

    pub fn find_type(&self, name: &str) -> Option<&FullType> {
        self.types.iter().find(|full_type| full_type.name == name)
    }
}
