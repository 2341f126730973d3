//! Schema input model
//!
//! A read-only view over an OpenAPI / JSON Schema document. Documents are
//! ingested once into a [`SchemaTable`] of named [`SchemaNode`]s; the
//! resolution engine never mutates the table.
//!
//! Ingestion is deliberately lenient: unknown keywords are ignored and no
//! validation against the JSON Schema meta-schema is attempted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ResolutionError, Result};

/// Reference prefixes stripped when turning a `$ref` token into a schema name
const REF_PREFIXES: [&str; 3] = ["#/components/schemas/", "#/definitions/", "#/$defs/"];

// =============================================================================
// Schema Type
// =============================================================================

/// The declared `type` of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl SchemaType {
    pub fn from_json_type(type_str: &str) -> Option<Self> {
        match type_str {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Scalar kinds are looked up in the policy type table
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Number | Self::Boolean | Self::Null
        )
    }
}

// =============================================================================
// Discriminator
// =============================================================================

/// `discriminator` keyword: property name plus optional value -> schema mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

// =============================================================================
// Schema Node
// =============================================================================

/// A single definitional unit of the input document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Insertion order of the source document is preserved
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    /// Map value schema; `additionalProperties: true` is stored as an empty node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaNode>>,
    /// Enumerated literals, duplicates preserved
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,
    /// `$ref` target token; mutually exclusive with an inline definition
    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl SchemaNode {
    /// Parse a node from raw JSON
    pub fn from_json(name: &str, json: &Value) -> Result<Self> {
        parse_node(name, json, "")
    }

    /// Builder: node of a given type
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Builder: bare `$ref` node
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    /// Builder: string enum
    pub fn string_enum<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema_type: Some(SchemaType::String),
            enum_values: values.into_iter().map(|v| Value::String(v.into())).collect(),
            ..Self::default()
        }
    }

    /// Builder: array of `items`
    pub fn array_of(items: SchemaNode) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// Builder: string-keyed map of `values`
    pub fn map_of(values: SchemaNode) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            additional_properties: Some(Box::new(values)),
            ..Self::default()
        }
    }

    /// Builder: add a property, keeping declaration order
    pub fn with_property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties.insert(name.into(), node);
        self
    }

    /// Builder: add an `allOf` member
    pub fn with_all_of(mut self, member: SchemaNode) -> Self {
        self.all_of.push(member);
        self
    }

    /// Builder: set the discriminator
    pub fn with_discriminator(mut self, discriminator: Discriminator) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    /// Effective type, inferring from structure when `type` is absent
    pub fn effective_type(&self) -> Option<SchemaType> {
        if self.schema_type.is_some() {
            return self.schema_type;
        }
        if self.items.is_some() {
            Some(SchemaType::Array)
        } else if !self.properties.is_empty() || self.additional_properties.is_some() {
            Some(SchemaType::Object)
        } else if !self.enum_values.is_empty() {
            if self.enum_values.iter().all(Value::is_string) {
                Some(SchemaType::String)
            } else if self.enum_values.iter().all(|v| v.is_i64() || v.is_u64()) {
                Some(SchemaType::Integer)
            } else if self.enum_values.iter().all(Value::is_number) {
                Some(SchemaType::Number)
            } else {
                None
            }
        } else {
            None
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    pub fn is_composed(&self) -> bool {
        !self.all_of.is_empty() || !self.one_of.is_empty() || !self.any_of.is_empty()
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    /// A map (`additionalProperties`) without declared properties
    pub fn is_map(&self) -> bool {
        self.additional_properties.is_some() && self.properties.is_empty() && !self.is_composed()
    }

    pub fn is_array(&self) -> bool {
        self.effective_type() == Some(SchemaType::Array)
    }

    /// Named schemas of this shape are generated as models, not unwrapped
    pub fn is_model_like(&self) -> bool {
        self.is_enum()
            || self.is_composed()
            || !self.properties.is_empty()
            || self.discriminator.is_some()
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

// =============================================================================
// Schema Table
// =============================================================================

/// The named-schema table: schema name -> node, in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaTable {
    schemas: IndexMap<String, SchemaNode>,
}

impl SchemaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an OpenAPI 3 (`components.schemas`), Swagger 2
    /// (`definitions`) or JSON Schema (`$defs`) document. A bare object whose
    /// values are all schemas is accepted as the table itself.
    pub fn from_document(document: &Value) -> Result<Self> {
        let section = document
            .pointer("/components/schemas")
            .or_else(|| document.get("definitions"))
            .or_else(|| document.get("$defs"))
            .unwrap_or(document);

        let Some(entries) = section.as_object() else {
            return Err(ResolutionError::InvalidSchema {
                schema: "<document>".to_string(),
                reason: "expected an object of named schemas".to_string(),
            });
        };

        let mut table = Self::new();
        for (name, json) in entries {
            let node = parse_node(name, json, "")?;
            table.insert(name.clone(), node);
        }
        Ok(table)
    }

    /// Parse a JSON document from text
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let document: Value = serde_json::from_str(content)?;
        Ok(Self::from_document(&document)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) {
        self.schemas.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    /// Lookup returning the stored name alongside the node
    pub fn get_entry(&self, name: &str) -> Option<(&String, &SchemaNode)> {
        self.schemas.get_key_value(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Schema names in document order
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.schemas.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Schema name a `$ref` token points at
pub fn ref_name(token: &str) -> &str {
    for prefix in REF_PREFIXES {
        if let Some(name) = token.strip_prefix(prefix) {
            return name;
        }
    }
    token
        .rsplit('/')
        .next()
        .unwrap_or(token)
        .trim_end_matches(".schema.json")
        .trim_end_matches(".json")
}

// =============================================================================
// Parsing
// =============================================================================

fn parse_node(schema: &str, json: &Value, path: &str) -> Result<SchemaNode> {
    let Some(obj) = json.as_object() else {
        // `true` / `{}` style schemas accept anything
        if json.is_boolean() {
            return Ok(SchemaNode::default());
        }
        return Err(invalid(schema, path, "schema must be an object"));
    };

    let schema_type = match obj.get("type") {
        Some(Value::String(t)) => Some(
            SchemaType::from_json_type(t)
                .ok_or_else(|| invalid(schema, path, &format!("unknown type '{}'", t)))?,
        ),
        // OpenAPI 3.1 style `type: [T, "null"]`
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .filter(|t| *t != "null")
            .find_map(SchemaType::from_json_type),
        _ => None,
    };
    let nullable_from_type = matches!(
        obj.get("type"),
        Some(Value::Array(types)) if types.iter().any(|t| t.as_str() == Some("null"))
    );

    let mut properties = IndexMap::new();
    if let Some(props) = obj.get("properties").and_then(|v| v.as_object()) {
        for (name, prop) in props {
            let child_path = format!("{}.{}", path, name);
            properties.insert(name.clone(), parse_node(schema, prop, &child_path)?);
        }
    }

    let items = match obj.get("items") {
        Some(items) => Some(Box::new(parse_node(schema, items, &format!("{}[]", path))?)),
        None => None,
    };

    let additional_properties = match obj.get("additionalProperties") {
        Some(Value::Bool(false)) | None => None,
        Some(Value::Bool(true)) => Some(Box::new(SchemaNode::default())),
        Some(value) => Some(Box::new(parse_node(schema, value, &format!("{}[*]", path))?)),
    };

    let discriminator = match obj.get("discriminator") {
        Some(Value::String(property_name)) => Some(Discriminator {
            property_name: property_name.clone(),
            mapping: IndexMap::new(),
        }),
        Some(Value::Object(d)) => {
            let property_name = d
                .get("propertyName")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid(schema, path, "discriminator without propertyName"))?;
            let mapping = d
                .get("mapping")
                .and_then(|v| v.as_object())
                .map(|m| {
                    m.iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                        .collect()
                })
                .unwrap_or_default();
            Some(Discriminator {
                property_name: property_name.to_string(),
                mapping,
            })
        }
        _ => None,
    };

    let mut enum_values: Vec<Value> = obj
        .get("enum")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    // `const` is a single-valued enum
    if enum_values.is_empty() {
        if let Some(value) = obj.get("const") {
            enum_values.push(value.clone());
        }
    }

    Ok(SchemaNode {
        description: obj.get("description").and_then(|v| v.as_str()).map(String::from),
        schema_type,
        format: obj.get("format").and_then(|v| v.as_str()).map(String::from),
        properties,
        required: obj
            .get("required")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default(),
        items,
        additional_properties,
        enum_values,
        all_of: parse_members(schema, obj.get("allOf"), path, "allOf")?,
        one_of: parse_members(schema, obj.get("oneOf"), path, "oneOf")?,
        any_of: parse_members(schema, obj.get("anyOf"), path, "anyOf")?,
        reference: obj.get("$ref").and_then(|v| v.as_str()).map(String::from),
        discriminator,
        default: obj.get("default").cloned(),
        nullable: nullable_from_type
            || obj.get("nullable").and_then(|v| v.as_bool()).unwrap_or(false),
        read_only: obj.get("readOnly").and_then(|v| v.as_bool()).unwrap_or(false),
    })
}

fn parse_members(
    schema: &str,
    value: Option<&Value>,
    path: &str,
    keyword: &str,
) -> Result<Vec<SchemaNode>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let Some(members) = value.as_array() else {
        return Err(invalid(schema, path, &format!("{} must be an array", keyword)));
    };
    members
        .iter()
        .enumerate()
        .map(|(i, m)| parse_node(schema, m, &format!("{}<{}:{}>", path, keyword, i)))
        .collect()
}

fn invalid(schema: &str, path: &str, reason: &str) -> ResolutionError {
    let at = if path.is_empty() { "<root>" } else { path };
    ResolutionError::InvalidSchema {
        schema: schema.to_string(),
        reason: format!("{} at {}", reason, at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_name() {
        assert_eq!(ref_name("#/components/schemas/Pet"), "Pet");
        assert_eq!(ref_name("#/definitions/Pet"), "Pet");
        assert_eq!(ref_name("parentModel"), "parentModel");
        assert_eq!(ref_name("entities/Pet.schema.json"), "Pet");
    }

    #[test]
    fn test_parse_preserves_property_order() {
        let node = SchemaNode::from_json(
            "Pet",
            &json!({
                "type": "object",
                "properties": {
                    "zeta": { "type": "string" },
                    "alpha": { "type": "integer", "format": "int64" },
                    "mid": { "type": "boolean" }
                },
                "required": ["alpha"]
            }),
        )
        .unwrap();

        let names: Vec<&String> = node.properties.keys().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(node.is_required("alpha"));
        assert!(!node.is_required("zeta"));
        assert_eq!(node.properties["alpha"].format.as_deref(), Some("int64"));
    }

    #[test]
    fn test_parse_composition_and_discriminator() {
        let node = SchemaNode::from_json(
            "Pet",
            &json!({
                "oneOf": [
                    { "$ref": "#/components/schemas/Cat" },
                    { "$ref": "#/components/schemas/Dog" }
                ],
                "discriminator": {
                    "propertyName": "petType",
                    "mapping": { "cat": "#/components/schemas/Cat" }
                }
            }),
        )
        .unwrap();

        assert_eq!(node.one_of.len(), 2);
        assert_eq!(node.one_of[1].reference.as_deref(), Some("#/components/schemas/Dog"));
        let d = node.discriminator.unwrap();
        assert_eq!(d.property_name, "petType");
        assert_eq!(d.mapping.get("cat").map(String::as_str), Some("#/components/schemas/Cat"));
    }

    #[test]
    fn test_parse_nullable_type_array() {
        let node = SchemaNode::from_json("N", &json!({ "type": ["string", "null"] })).unwrap();
        assert_eq!(node.schema_type, Some(SchemaType::String));
        assert!(node.nullable);
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = SchemaNode::from_json("Bad", &json!({ "properties": { "x": { "type": "strng" } } }))
            .unwrap_err();
        match err {
            ResolutionError::InvalidSchema { schema, reason } => {
                assert_eq!(schema, "Bad");
                assert!(reason.contains(".x"));
            }
            other => panic!("Expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_table_from_openapi_document() {
        let table = SchemaTable::from_document(&json!({
            "openapi": "3.0.0",
            "components": {
                "schemas": {
                    "Category": { "type": "object", "properties": { "id": { "type": "integer" } } },
                    "Tag": { "type": "object" }
                }
            }
        }))
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.names().cloned().collect::<Vec<_>>(), vec!["Category", "Tag"]);
    }

    #[test]
    fn test_effective_type_inference() {
        assert_eq!(SchemaNode::string_enum(["a"]).effective_type(), Some(SchemaType::String));
        let mut ints = SchemaNode::default();
        ints.enum_values = vec![json!(1), json!(2)];
        assert_eq!(ints.effective_type(), Some(SchemaType::Integer));
        assert_eq!(
            SchemaNode::default().with_property("a", SchemaNode::default()).effective_type(),
            Some(SchemaType::Object)
        );
    }
}
