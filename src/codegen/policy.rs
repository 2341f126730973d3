//! Naming and Type Policy
//!
//! The per-target strategy injected into the Type Mapper and Enum Extractor.
//! The resolution core only walks structure; every target-specific string
//! (scalar names, container wrappers, empty-container expressions, enum and
//! model names, reserved-word escapes) comes from here.
//!
//! [`TypePolicy`] is the table-driven implementation, with presets for Java,
//! a neutral notation, Rust and TypeScript.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::names::{sanitize_identifier, Casing};
use crate::model::{ContainerKind, DefaultValue};
use crate::schema::SchemaType;

// =============================================================================
// Policy Trait
// =============================================================================

/// Strategy consulted for every target-language decision
pub trait NamingPolicy: fmt::Debug + Send + Sync {
    /// Semantic type for a scalar, keyed by type and optional format
    fn scalar_type(&self, schema_type: SchemaType, format: Option<&str>) -> String;

    /// Free-form value type (untyped schemas, flattened inline objects)
    fn any_type(&self) -> String;

    /// Wrap `inner` in a container of the given kind
    fn wrap(&self, kind: ContainerKind, inner: &str) -> String;

    /// Base name of a container (`List`, `Map`)
    fn container_base(&self, kind: ContainerKind) -> String;

    /// Expression constructing an empty container of `inner`
    fn empty_container(&self, kind: ContainerKind, inner: &str) -> String;

    /// Synthesized enum type name for a property base name
    fn enum_type_name(&self, base_name: &str) -> String;

    /// Display class name of a named schema
    fn model_name(&self, schema_name: &str) -> String;

    /// Target-legal identifier for a property
    fn property_name(&self, base_name: &str) -> String;

    /// Literal expression for a declared default value
    fn literal(&self, value: &Value) -> String;

    /// Render a structured default to an expression
    fn render_default(&self, default: &DefaultValue) -> String {
        match default {
            DefaultValue::Literal { value } => self.literal(value),
            DefaultValue::EmptyList { item_type } => self.empty_container(ContainerKind::List, item_type),
            DefaultValue::EmptyMap { value_type } => self.empty_container(ContainerKind::Map, value_type),
        }
    }
}

// =============================================================================
// Table-driven Policy
// =============================================================================

/// Supported presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyPreset {
    #[default]
    Java,
    Neutral,
    Rust,
    TypeScript,
}

impl PolicyPreset {
    pub fn build(&self) -> TypePolicy {
        match self {
            Self::Java => TypePolicy::java(),
            Self::Neutral => TypePolicy::neutral(),
            Self::Rust => TypePolicy::rust(),
            Self::TypeScript => TypePolicy::typescript(),
        }
    }
}

/// Container wrapper templates; `{T}` is replaced by the inner type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSyntax {
    pub list: String,
    pub map: String,
    pub list_base: String,
    pub map_base: String,
    pub empty_list: String,
    pub empty_map: String,
}

/// Naming/type table for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypePolicy {
    pub language: String,

    /// `type` or `type+format` -> semantic type name
    pub types: BTreeMap<String, String>,

    pub any_type: String,

    pub containers: ContainerSyntax,

    /// Appended to the PascalCase property name for synthesized enums
    pub enum_suffix: String,

    pub model_casing: Casing,
    pub property_casing: Casing,

    pub reserved_words: BTreeSet<String>,

    /// Prefix for identifiers colliding with a reserved word
    pub keyword_escape: String,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn words(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn fill(template: &str, inner: &str) -> String {
    template.replace("{T}", inner)
}

impl TypePolicy {
    /// Java bean-style naming, boxed scalars, `java.util` containers
    pub fn java() -> Self {
        Self {
            language: "java".to_string(),
            types: table(&[
                ("string", "String"),
                ("string+date", "LocalDate"),
                ("string+date-time", "OffsetDateTime"),
                ("string+uuid", "UUID"),
                ("string+uri", "URI"),
                ("string+byte", "byte[]"),
                ("string+binary", "File"),
                ("integer", "Integer"),
                ("integer+int32", "Integer"),
                ("integer+int64", "Long"),
                ("number", "BigDecimal"),
                ("number+float", "Float"),
                ("number+double", "Double"),
                ("boolean", "Boolean"),
                ("null", "Object"),
            ]),
            any_type: "Object".to_string(),
            containers: ContainerSyntax {
                list: "List<{T}>".to_string(),
                map: "Map<String, {T}>".to_string(),
                list_base: "List".to_string(),
                map_base: "Map".to_string(),
                empty_list: "new ArrayList<{T}>()".to_string(),
                empty_map: "new HashMap<String, {T}>()".to_string(),
            },
            enum_suffix: "Enum".to_string(),
            model_casing: Casing::PascalCase,
            property_casing: Casing::CamelCase,
            reserved_words: words(JAVA_KEYWORDS),
            keyword_escape: "_".to_string(),
        }
    }

    /// Target-free notation used in documentation and IR dumps
    pub fn neutral() -> Self {
        Self {
            language: "neutral".to_string(),
            types: table(&[
                ("string", "String"),
                ("string+date", "date"),
                ("string+date-time", "datetime"),
                ("string+uuid", "uuid"),
                ("integer", "int"),
                ("integer+int64", "long"),
                ("number", "number"),
                ("number+float", "float"),
                ("number+double", "double"),
                ("boolean", "boolean"),
                ("null", "any"),
            ]),
            any_type: "any".to_string(),
            containers: ContainerSyntax {
                list: "list<{T}>".to_string(),
                map: "map<{T}>".to_string(),
                list_base: "list".to_string(),
                map_base: "map".to_string(),
                empty_list: "list<{T}>()".to_string(),
                empty_map: "map<{T}>()".to_string(),
            },
            enum_suffix: "Enum".to_string(),
            model_casing: Casing::PascalCase,
            property_casing: Casing::CamelCase,
            reserved_words: BTreeSet::new(),
            keyword_escape: "_".to_string(),
        }
    }

    /// serde-friendly Rust types
    pub fn rust() -> Self {
        Self {
            language: "rust".to_string(),
            types: table(&[
                ("string", "String"),
                ("string+date", "chrono::NaiveDate"),
                ("string+date-time", "chrono::DateTime<chrono::Utc>"),
                ("string+uuid", "uuid::Uuid"),
                ("integer", "i32"),
                ("integer+int64", "i64"),
                ("number", "f64"),
                ("number+float", "f32"),
                ("boolean", "bool"),
                ("null", "serde_json::Value"),
            ]),
            any_type: "serde_json::Value".to_string(),
            containers: ContainerSyntax {
                list: "Vec<{T}>".to_string(),
                map: "std::collections::HashMap<String, {T}>".to_string(),
                list_base: "Vec".to_string(),
                map_base: "HashMap".to_string(),
                empty_list: "Vec::<{T}>::new()".to_string(),
                empty_map: "std::collections::HashMap::<String, {T}>::new()".to_string(),
            },
            enum_suffix: "Enum".to_string(),
            model_casing: Casing::PascalCase,
            property_casing: Casing::SnakeCase,
            reserved_words: words(RUST_KEYWORDS),
            keyword_escape: "r#".to_string(),
        }
    }

    pub fn typescript() -> Self {
        Self {
            language: "typescript".to_string(),
            types: table(&[
                ("string", "string"),
                ("string+date", "string"),
                ("string+date-time", "Date"),
                ("string+binary", "Blob"),
                ("integer", "number"),
                ("number", "number"),
                ("boolean", "boolean"),
                ("null", "null"),
            ]),
            any_type: "unknown".to_string(),
            containers: ContainerSyntax {
                list: "Array<{T}>".to_string(),
                map: "Record<string, {T}>".to_string(),
                list_base: "Array".to_string(),
                map_base: "Record".to_string(),
                empty_list: "new Array<{T}>()".to_string(),
                empty_map: "{} as Record<string, {T}>".to_string(),
            },
            enum_suffix: "Enum".to_string(),
            model_casing: Casing::PascalCase,
            property_casing: Casing::CamelCase,
            reserved_words: words(TS_KEYWORDS),
            keyword_escape: "_".to_string(),
        }
    }

    /// Override one table entry (`type` or `type+format`)
    pub fn with_type(mut self, key: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.types.insert(key.into(), type_name.into());
        self
    }

    pub fn with_reserved_words<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words.extend(extra.into_iter().map(Into::into));
        self
    }

    fn escape_reserved(&self, name: String) -> String {
        if self.reserved_words.contains(&name) {
            format!("{}{}", self.keyword_escape, name)
        } else {
            name
        }
    }
}

impl Default for TypePolicy {
    fn default() -> Self {
        Self::java()
    }
}

impl NamingPolicy for TypePolicy {
    fn scalar_type(&self, schema_type: SchemaType, format: Option<&str>) -> String {
        let base = schema_type.as_str();
        format
            .and_then(|f| self.types.get(&format!("{}+{}", base, f)))
            .or_else(|| self.types.get(base))
            .cloned()
            .unwrap_or_else(|| self.any_type.clone())
    }

    fn any_type(&self) -> String {
        self.any_type.clone()
    }

    fn wrap(&self, kind: ContainerKind, inner: &str) -> String {
        match kind {
            ContainerKind::Scalar => inner.to_string(),
            ContainerKind::List => fill(&self.containers.list, inner),
            ContainerKind::Map => fill(&self.containers.map, inner),
        }
    }

    fn container_base(&self, kind: ContainerKind) -> String {
        match kind {
            ContainerKind::Scalar => String::new(),
            ContainerKind::List => self.containers.list_base.clone(),
            ContainerKind::Map => self.containers.map_base.clone(),
        }
    }

    fn empty_container(&self, kind: ContainerKind, inner: &str) -> String {
        match kind {
            ContainerKind::Scalar => String::new(),
            ContainerKind::List => fill(&self.containers.empty_list, inner),
            ContainerKind::Map => fill(&self.containers.empty_map, inner),
        }
    }

    fn enum_type_name(&self, base_name: &str) -> String {
        format!("{}{}", Casing::PascalCase.apply(base_name), self.enum_suffix)
    }

    fn model_name(&self, schema_name: &str) -> String {
        sanitize_identifier(&self.model_casing.apply(schema_name))
    }

    fn property_name(&self, base_name: &str) -> String {
        let cased = self.property_casing.apply(&sanitize_identifier(base_name));
        self.escape_reserved(sanitize_identifier(&cased))
    }

    fn literal(&self, value: &Value) -> String {
        match value {
            Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Value::Null => "null".to_string(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Keywords
// =============================================================================

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "default", "do", "double", "else", "enum",
    "extends", "final", "finally", "float", "for", "goto", "if", "implements",
    "import", "instanceof", "int", "interface", "long", "native", "new",
    "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "null", "true", "false",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct",
    "super", "trait", "true", "type", "unsafe", "use", "where", "while",
    "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield",
];

const TS_KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false",
    "finally", "for", "function", "if", "import", "in", "instanceof", "new",
    "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "implements", "interface",
    "let", "package", "private", "protected", "public", "static", "yield",
];
