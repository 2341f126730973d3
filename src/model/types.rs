//! Type Mapper
//!
//! Walks a property schema through its container layers and asks the policy
//! for every type string. Structure is the only thing decided here: scalar
//! layers go to the policy table, arrays become `list` layers, maps
//! (`additionalProperties`) become `map` layers, and references either stay
//! named types or, for plain aliases, are unwrapped to the type they stand for.

use serde_json::Value;

use super::ContainerKind;
use crate::codegen::NamingPolicy;
use crate::error::Result;
use crate::graph::{CycleAnalysis, DiagnosticCode, Diagnostics, ReferenceResolver, Resolved, ResolutionChain};
use crate::schema::{SchemaNode, SchemaType};

/// One layer of a mapped property type; container layers own the next one
#[derive(Debug, Clone, PartialEq)]
pub struct MappedType {
    pub container: ContainerKind,
    /// Full wrapped type
    pub data_type: String,
    /// Scalar type, or the container's base name
    pub base_type: String,
    pub items: Option<Box<MappedType>>,
    /// Inline literals on a scalar layer
    pub enum_values: Vec<Value>,
    /// Display name of a referenced model
    pub complex_type: Option<String>,
    /// The reference targets a named enum schema
    pub is_enum_ref: bool,
    pub is_primitive: bool,
    /// The reference closes a cycle through the enclosing model
    pub is_circular: bool,
}

impl MappedType {
    /// Innermost non-container layer
    pub fn leaf(&self) -> &MappedType {
        match &self.items {
            Some(items) => items.leaf(),
            None => self,
        }
    }

    /// Number of container layers
    pub fn depth(&self) -> usize {
        match &self.items {
            Some(items) => 1 + items.depth(),
            None => 0,
        }
    }

    fn scalar(type_name: String, enum_values: Vec<Value>) -> Self {
        Self {
            container: ContainerKind::Scalar,
            data_type: type_name.clone(),
            base_type: type_name,
            items: None,
            enum_values,
            complex_type: None,
            is_enum_ref: false,
            is_primitive: true,
            is_circular: false,
        }
    }
}

/// Maps property schemas to [`MappedType`]s for one policy
#[derive(Clone, Copy)]
pub struct TypeMapper<'a> {
    resolver: ReferenceResolver<'a>,
    policy: &'a dyn NamingPolicy,
    analysis: Option<&'a CycleAnalysis>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(resolver: ReferenceResolver<'a>, policy: &'a dyn NamingPolicy) -> Self {
        Self {
            resolver,
            policy,
            analysis: None,
        }
    }

    /// Use precomputed cycle membership to flag circular references
    pub fn with_analysis(mut self, analysis: &'a CycleAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Map `node`, found in `schema` at `path`, along `chain`
    pub fn map(
        &self,
        schema: &str,
        path: &str,
        node: &SchemaNode,
        chain: &mut ResolutionChain,
        diags: &mut Diagnostics,
    ) -> Result<MappedType> {
        if let Some(token) = &node.reference {
            return self.map_reference(schema, path, token, chain, diags);
        }

        if node.is_array() {
            let inner = match &node.items {
                Some(items) => self.map(schema, &format!("{}[]", path), items, chain, diags)?,
                None => self.any(),
            };
            return Ok(self.wrap(ContainerKind::List, inner));
        }

        if node.is_map() {
            let inner = match &node.additional_properties {
                Some(values) => self.map(schema, &format!("{}[*]", path), values, chain, diags)?,
                None => self.any(),
            };
            return Ok(self.wrap(ContainerKind::Map, inner));
        }

        if node.is_composed() {
            // `allOf: [{$ref}]` is the usual way to attach siblings to a reference
            if let [single] = node.all_of.as_slice() {
                if single.is_reference() && node.properties.is_empty() && node.one_of.is_empty() && node.any_of.is_empty() {
                    return self.map(schema, path, single, chain, diags);
                }
            }
            return Ok(self.flatten(schema, path, "composition", diags));
        }

        if !node.properties.is_empty() {
            return Ok(self.flatten(schema, path, "object", diags));
        }

        match node.effective_type() {
            Some(t) if t.is_scalar() => Ok(MappedType::scalar(
                self.policy.scalar_type(t, node.format.as_deref()),
                node.enum_values.clone(),
            )),
            // free-form object, or literals of mixed types
            _ => {
                let mut any = self.any();
                any.enum_values = node.enum_values.clone();
                Ok(any)
            }
        }
    }

    fn map_reference(
        &self,
        schema: &str,
        path: &str,
        token: &str,
        chain: &mut ResolutionChain,
        diags: &mut Diagnostics,
    ) -> Result<MappedType> {
        match self.resolver.resolve(schema, token, path, chain)? {
            Resolved::Cycle { name } => {
                diags.cyclic_reference(schema, name, path);
                let is_enum = self.resolver.lookup(name).is_some_and(|(_, n)| n.is_enum());
                Ok(self.named(name, is_enum, true))
            }
            Resolved::Node { name, node } if is_alias(node) => {
                tracing::debug!(schema, alias = name, path, "unwrapping alias");
                chain.push(name);
                let mapped = self.map(schema, path, node, chain, diags);
                chain.pop();
                mapped
            }
            Resolved::Node { name, node } => {
                let circular = self.closes_cycle(schema, name);
                if circular {
                    diags.cyclic_reference(schema, name, path);
                }
                Ok(self.named(name, node.is_enum(), circular))
            }
        }
    }

    fn closes_cycle(&self, schema: &str, target: &str) -> bool {
        schema == target || self.analysis.is_some_and(|a| a.same_cycle(schema, target))
    }

    fn named(&self, name: &str, is_enum_ref: bool, is_circular: bool) -> MappedType {
        let display = self.policy.model_name(name);
        MappedType {
            container: ContainerKind::Scalar,
            data_type: display.clone(),
            base_type: display.clone(),
            items: None,
            enum_values: Vec::new(),
            complex_type: Some(display),
            is_enum_ref,
            is_primitive: false,
            is_circular,
        }
    }

    fn wrap(&self, kind: ContainerKind, inner: MappedType) -> MappedType {
        MappedType {
            container: kind,
            data_type: self.policy.wrap(kind, &inner.data_type),
            base_type: self.policy.container_base(kind),
            enum_values: Vec::new(),
            complex_type: inner.complex_type.clone(),
            is_enum_ref: inner.is_enum_ref,
            is_primitive: inner.is_primitive,
            is_circular: inner.is_circular,
            items: Some(Box::new(inner)),
        }
    }

    fn any(&self) -> MappedType {
        MappedType::scalar(self.policy.any_type(), Vec::new())
    }

    fn flatten(&self, schema: &str, path: &str, what: &str, diags: &mut Diagnostics) -> MappedType {
        let any = self.any();
        diags.report(
            schema,
            DiagnosticCode::InlineObjectFlattened,
            format!("Inline {} at {} mapped to '{}'", what, display_path(path), any.data_type),
        );
        any
    }
}

/// Named schemas that stand for another type and are unwrapped on reference
fn is_alias(node: &SchemaNode) -> bool {
    if node.is_model_like() {
        return false;
    }
    node.is_reference()
        || node.is_array()
        || node.is_map()
        || node.effective_type().is_some_and(|t| t.is_scalar() && t != SchemaType::Null)
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
