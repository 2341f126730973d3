//! Composition Resolver
//!
//! Classifies `allOf` / `oneOf` / `anyOf` into a closed set of outcomes and
//! collects the property set that stays local to the model:
//!
//! - `allOf` with one reference: inheritance, inline members become locals
//! - `allOf` with several references: the one that declares or inherits a
//!   discriminator is the parent, the others are mixins flattened into locals
//!
//! References nested in inline `allOf` members count as direct members.
//! - `oneOf` / `anyOf`: union over the referenced member models
//! - anything else: plain object

use indexmap::IndexMap;
use std::collections::BTreeSet;

use super::CompositionKind;
use crate::error::{ResolutionError, Result};
use crate::graph::{DiagnosticCode, Diagnostics, ReferenceResolver, Resolved, ResolutionChain};
use crate::schema::{Discriminator, SchemaNode};

/// How a schema composes other schemas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionOutcome {
    None,
    /// Single parent schema
    Inheritance { parent: String },
    /// Named candidate members, dispatched by the renderer
    Union { kind: CompositionKind, members: Vec<String> },
}

impl CompositionOutcome {
    pub fn kind(&self) -> CompositionKind {
        match self {
            Self::None => CompositionKind::None,
            Self::Inheritance { .. } => CompositionKind::AllOfInheritance,
            Self::Union { kind, .. } => *kind,
        }
    }

    pub fn parent(&self) -> Option<&str> {
        match self {
            Self::Inheritance { parent } => Some(parent),
            _ => None,
        }
    }
}

/// Outcome plus the locally declared pieces of the schema
#[derive(Debug, Clone)]
pub struct ResolvedComposition<'n> {
    pub outcome: CompositionOutcome,
    /// Local properties in declaration order: own, inline allOf members, mixins
    pub properties: IndexMap<&'n str, &'n SchemaNode>,
    pub required: BTreeSet<&'n str>,
    /// Discriminator declared by the schema itself or an inline member
    pub discriminator: Option<&'n Discriminator>,
    pub additional_properties: Option<&'n SchemaNode>,
    /// Mixin and union member schema names
    pub interfaces: Vec<String>,
}

impl<'n> ResolvedComposition<'n> {
    fn new() -> Self {
        Self {
            outcome: CompositionOutcome::None,
            properties: IndexMap::new(),
            required: BTreeSet::new(),
            discriminator: None,
            additional_properties: None,
            interfaces: Vec::new(),
        }
    }

    /// Fold a node's own declarations (and its inline allOf members) in
    fn absorb(&mut self, node: &'n SchemaNode) {
        for (name, prop) in &node.properties {
            self.properties.entry(name.as_str()).or_insert(prop);
        }
        self.required.extend(node.required.iter().map(String::as_str));
        if self.discriminator.is_none() {
            self.discriminator = node.discriminator.as_ref();
        }
        if self.additional_properties.is_none() {
            self.additional_properties = node.additional_properties.as_deref();
        }
        for member in node.all_of.iter().filter(|m| !m.is_reference()) {
            self.absorb(member);
        }
    }
}

#[derive(Clone, Copy)]
pub struct CompositionResolver<'a> {
    resolver: ReferenceResolver<'a>,
}

impl<'a> CompositionResolver<'a> {
    pub fn new(resolver: ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn resolve<'n>(
        &self,
        schema: &str,
        node: &'n SchemaNode,
        diags: &mut Diagnostics,
    ) -> Result<ResolvedComposition<'n>>
    where
        'a: 'n,
    {
        let mut out = ResolvedComposition::new();
        out.absorb(node);

        let chain = ResolutionChain::rooted(schema);
        let mut refs = Vec::new();
        all_of_refs(node, "", &mut refs);
        let mut parents: Vec<(&'a str, &'a SchemaNode)> = Vec::new();
        for (path, token) in refs {
            match self.resolver.resolve(schema, token, &path, &chain)? {
                Resolved::Node { name, node } => {
                    if !parents.iter().any(|(p, _)| *p == name) {
                        parents.push((name, node));
                    }
                }
                Resolved::Cycle { .. } => {
                    return Err(ResolutionError::InvalidSchema {
                        schema: schema.to_string(),
                        reason: format!("allOf member at {} inherits from the schema itself", path),
                    });
                }
            }
        }

        out.outcome = match parents.as_slice() {
            [] => CompositionOutcome::None,
            [(parent, _)] => CompositionOutcome::Inheritance {
                parent: parent.to_string(),
            },
            _ => {
                let parent = self.choose_parent(schema, &parents)?;
                for &(name, target) in &parents {
                    if name == parent {
                        continue;
                    }
                    out.absorb(target);
                    out.interfaces.push(name.to_string());
                }
                tracing::debug!(schema, parent, mixins = ?out.interfaces, "allOf with mixins");
                CompositionOutcome::Inheritance {
                    parent: parent.to_string(),
                }
            }
        };

        let (kind, members) = if !node.one_of.is_empty() {
            (CompositionKind::OneOfUnion, &node.one_of)
        } else {
            (CompositionKind::AnyOfUnion, &node.any_of)
        };
        if !members.is_empty() {
            let names = self.union_members(schema, kind, members, diags)?;
            if out.outcome == CompositionOutcome::None {
                out.outcome = CompositionOutcome::Union {
                    kind,
                    members: names.clone(),
                };
            }
            out.interfaces.extend(names);
        }

        Ok(out)
    }

    /// Among several allOf references, the single one with a discriminator
    fn choose_parent(&self, schema: &str, candidates: &[(&'a str, &'a SchemaNode)]) -> Result<&'a str> {
        let with_discriminator: Vec<&str> = candidates
            .iter()
            .filter(|(name, node)| {
                let mut visited = BTreeSet::from([schema.to_string(), name.to_string()]);
                self.has_discriminator(*node, &mut visited)
            })
            .map(|(name, _)| *name)
            .collect();

        match with_discriminator.as_slice() {
            [parent] => Ok(*parent),
            _ => {
                let names: Vec<&str> = candidates.iter().map(|(name, _)| *name).collect();
                Err(ResolutionError::AmbiguousComposition {
                    schema: schema.to_string(),
                    reason: format!(
                        "allOf references {} schemas ({}) and {} of them declare or inherit a discriminator; cannot choose a parent",
                        names.len(),
                        names.join(", "),
                        with_discriminator.len()
                    ),
                })
            }
        }
    }

    fn union_members(
        &self,
        schema: &str,
        kind: CompositionKind,
        members: &[SchemaNode],
        diags: &mut Diagnostics,
    ) -> Result<Vec<String>> {
        let keyword = if kind == CompositionKind::OneOfUnion { "oneOf" } else { "anyOf" };
        let chain = ResolutionChain::new();
        let mut names = Vec::with_capacity(members.len());

        for (i, member) in members.iter().enumerate() {
            match &member.reference {
                Some(token) => {
                    let path = format!("<{}:{}>", keyword, i);
                    let resolved = self.resolver.resolve(schema, token, &path, &chain)?;
                    names.push(resolved.name().to_string());
                }
                None => diags.report(
                    schema,
                    DiagnosticCode::UnnamedUnionMember,
                    format!("Inline {} member {} has no model name to dispatch on", keyword, i),
                ),
            }
        }
        Ok(names)
    }

    /// Declares a discriminator itself, in an inline allOf member, or through its allOf parents
    fn has_discriminator(&self, node: &'a SchemaNode, visited: &mut BTreeSet<String>) -> bool {
        if node.discriminator.is_some() {
            return true;
        }
        node.all_of.iter().any(|member| match &member.reference {
            None => self.has_discriminator(member, visited),
            Some(token) => match self.resolver.lookup(token) {
                Some((name, target)) if visited.insert(name.to_string()) => self.has_discriminator(target, visited),
                _ => false,
            },
        })
    }
}

/// `$ref` members of `allOf` with their paths, including refs nested in inline members
fn all_of_refs<'n>(node: &'n SchemaNode, prefix: &str, out: &mut Vec<(String, &'n str)>) {
    for (i, member) in node.all_of.iter().enumerate() {
        let path = format!("{}<allOf:{}>", prefix, i);
        match &member.reference {
            Some(token) => out.push((path, token.as_str())),
            None => all_of_refs(member, &path, out),
        }
    }
}
