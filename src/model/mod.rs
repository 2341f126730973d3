//! Model IR
//!
//! The language-neutral intermediate representation handed to rendering
//! backends. Every node is built once per generation run and never mutated
//! after [`ModelAssembler`](assemble::ModelAssembler) returns it.
//!
//! Pipeline per named schema:
//! ```text
//! composition -> per property: TypeMapper -> EnumExtractor -> defaults
//!             -> parent dedup -> imports
//! ```

pub mod assemble;
pub mod cache;
pub mod composition;
pub mod enums;
pub mod types;

pub use assemble::{assemble, AssemblySettings, ModelAssembler, ModelFailure, RunReport};
pub use cache::ModelCache;
pub use composition::{CompositionOutcome, CompositionResolver, ResolvedComposition};
pub use enums::EnumExtractor;
pub use types::{MappedType, TypeMapper};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::graph::Diagnostics;

// =============================================================================
// Kinds
// =============================================================================

/// Container layer of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Scalar,
    List,
    Map,
}

impl ContainerKind {
    pub fn is_container(&self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

/// How a model was composed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "allOf-inheritance")]
    AllOfInheritance,
    #[serde(rename = "oneOf-union")]
    OneOfUnion,
    #[serde(rename = "anyOf-union")]
    AnyOfUnion,
}

/// Default value before rendering; the policy turns it into an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultValue {
    /// Declared `default` of a scalar
    Literal { value: Value },
    /// Empty list whose element type is `item_type`
    EmptyList { item_type: String },
    /// Empty string-keyed map whose value type is `value_type`
    EmptyMap { value_type: String },
}

// =============================================================================
// Enum Descriptor
// =============================================================================

/// Synthesized enum type for an enumerated property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    /// `<PropertyBaseName>Enum`
    pub name: String,
    /// Declared literals in order, duplicates preserved
    pub values: Vec<Value>,
    /// Property the enum was extracted from
    pub base_name: String,
    /// Nearest enclosing named model
    pub scope: String,
}

impl EnumDescriptor {
    /// Literal set ignoring order and duplicates
    pub fn value_set(&self) -> BTreeSet<String> {
        value_set(&self.values)
    }
}

pub(crate) fn value_set(values: &[Value]) -> BTreeSet<String> {
    values.iter().map(Value::to_string).collect()
}

// =============================================================================
// Property Model
// =============================================================================

/// One object field, or one container layer of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyModel {
    /// Name as declared in the schema
    pub base_name: String,
    /// Target-legal identifier
    pub name: String,
    /// Resolved type (`List<String>`)
    pub data_type: String,
    /// Type with any synthesized enum substituted (`List<NameEnum>`)
    pub datatype_with_enum: String,
    /// Scalar type, or the container's base name
    pub base_type: String,
    pub container: ContainerKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// `default` rendered by the policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    pub is_enum: bool,
    /// Synthesized enum type name when `is_enum`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowable_values: Vec<Value>,
    /// Refers to a named enum schema rather than an inline one
    pub is_enum_ref: bool,

    pub required: bool,
    pub nullable: bool,
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub is_primitive_type: bool,
    /// Display name of the referenced model, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_type: Option<String>,
    /// The reference closes a cycle through the enclosing model
    pub is_circular_reference: bool,

    /// Exactly one container layer unwrapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertyModel>>,
    /// Every container layer unwrapped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_inner_items: Option<Box<PropertyModel>>,
}

impl PropertyModel {
    pub fn is_container(&self) -> bool {
        self.container.is_container()
    }

    /// Innermost item descriptor, or the property itself when scalar
    pub fn leaf(&self) -> &PropertyModel {
        self.most_inner_items.as_deref().unwrap_or(self)
    }

    /// Same enum shape: both plain, or both enums over the same literal set
    pub fn same_enum_shape(&self, other: &PropertyModel) -> bool {
        match (self.is_enum, other.is_enum) {
            (false, false) => true,
            (true, true) => {
                value_set(&self.leaf().allowable_values) == value_set(&other.leaf().allowable_values)
            }
            _ => false,
        }
    }
}

// =============================================================================
// Model Descriptor
// =============================================================================

/// Discriminated dispatch entry: wire value -> model display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedModel {
    pub value: String,
    pub model: String,
}

/// Discriminator after inheritance and mapping merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscriminatorModel {
    pub property_name: String,
    /// Explicit mapping as declared (merged down the parent chain)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mapped_models: Vec<MappedModel>,
}

/// Fully resolved model for one named schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Schema name as it appears in the table
    pub name: String,
    /// Display class name
    pub classname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Local properties, declaration order
    pub vars: Vec<PropertyModel>,
    /// Inherited then local; a local shadow replaces the inherited entry in place
    pub all_vars: Vec<PropertyModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_vars: Vec<PropertyModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_vars: Vec<PropertyModel>,

    /// Parent display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Parent schema name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<DiscriminatorModel>,
    pub imports: BTreeSet<String>,
    pub composition: CompositionKind,
    /// Union members and allOf mixins, display names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    pub has_enums: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumDescriptor>,

    /// Top-level enum schema
    pub is_enum: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowable_values: Vec<Value>,
    /// Non-object schema: the type it stands for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
    /// Value type of `additionalProperties` on an object with properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties_type: Option<String>,
    /// Schema participates in a reference cycle
    pub is_cyclic: bool,

    #[serde(default, skip_serializing_if = "Diagnostics::is_empty")]
    pub diagnostics: Diagnostics,
}

impl ModelDescriptor {
    pub fn var(&self, base_name: &str) -> Option<&PropertyModel> {
        self.vars.iter().find(|v| v.base_name == base_name)
    }

    pub fn all_var(&self, base_name: &str) -> Option<&PropertyModel> {
        self.all_vars.iter().find(|v| v.base_name == base_name)
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }
}
