//! Schema Reference Graph
//!
//! petgraph view of the `$ref`/`allOf`/`oneOf`/`anyOf` dependencies between
//! named schemas. Built once from the immutable [`SchemaTable`] before any
//! model is assembled, so cycles are known before property expansion.
//!
//! Inheritance edges (`allOf` members of a top-level schema) are tracked
//! separately: the assembler only waits on a parent's assembly when the edge
//! is not part of an inheritance cycle.

pub mod analysis;
pub mod diagnostics;
pub mod resolver;

pub use analysis::{compute_cycle_analysis, dependency_order, CycleAnalysis, SccGroup};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use resolver::{Resolved, ReferenceResolver, ResolutionChain};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::schema::{ref_name, SchemaNode, SchemaTable};

/// Types of edges in the schema reference graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Whole-schema alias (`{"$ref": ...}` at the top level)
    Ref,
    /// allOf member of a top-level schema (inheritance or mixin)
    AllOf,
    /// oneOf union member
    OneOf,
    /// anyOf union member
    AnyOf,
    /// Array element type
    Items,
    /// additionalProperties map value type
    AdditionalProperties,
    /// Property field type
    Property,
}

impl EdgeKind {
    pub fn is_inheritance(&self) -> bool {
        matches!(self, Self::AllOf)
    }
}

/// The schema reference graph
pub struct ReferenceGraph {
    pub(crate) graph: DiGraph<String, EdgeKind>,
    pub(crate) node_indices: HashMap<String, NodeIndex>,
}

impl ReferenceGraph {
    /// Build the graph from a table
    pub fn build(table: &SchemaTable) -> Self {
        let mut graph = DiGraph::with_capacity(table.len(), table.len() * 3);
        let mut node_indices = HashMap::with_capacity(table.len());

        for name in table.names() {
            let idx = graph.add_node(name.clone());
            node_indices.insert(name.clone(), idx);
        }

        let mut pending: Vec<(String, String, EdgeKind)> = Vec::new();
        for (name, node) in table.iter() {
            collect_refs(node, name, EdgeKind::Ref, true, &mut pending);
        }

        // missing targets fail the referencing model at assembly time
        let mut dangling = 0usize;
        for (from, reference, kind) in pending {
            let target = ref_name(&reference);
            match (node_indices.get(&from), node_indices.get(target)) {
                (Some(&from_idx), Some(&to_idx)) => {
                    graph.add_edge(from_idx, to_idx, kind);
                }
                _ => dangling += 1,
            }
        }

        tracing::debug!(
            schemas = graph.node_count(),
            edges = graph.edge_count(),
            dangling,
            "built reference graph"
        );

        Self { graph, node_indices }
    }

    pub fn schema_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Immediate outgoing references (dependencies)
    pub fn refs_out(&self, name: &str) -> Vec<(&str, EdgeKind)> {
        self.edges(name, Direction::Outgoing)
    }

    /// Immediate incoming references (dependents)
    pub fn refs_in(&self, name: &str) -> Vec<(&str, EdgeKind)> {
        self.edges(name, Direction::Incoming)
    }

    /// Schemas that inherit from `name` via allOf
    pub fn children_of(&self, name: &str) -> Vec<&str> {
        self.refs_in(name)
            .into_iter()
            .filter(|(_, kind)| kind.is_inheritance())
            .map(|(child, _)| child)
            .collect()
    }

    fn edges(&self, name: &str, direction: Direction) -> Vec<(&str, EdgeKind)> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut out: Vec<(&str, EdgeKind)> = self
            .graph
            .edges_directed(idx, direction)
            .filter_map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.graph.node_weight(other).map(|n| (n.as_str(), *e.weight()))
            })
            .collect();
        // petgraph yields edges newest-first
        out.reverse();
        out
    }
}

/// Collect every `$ref` reachable from a node with the position it occurs in.
///
/// Only allOf members of the top-level node become inheritance edges; an
/// allOf nested inside a property is a property type.
fn collect_refs(
    node: &SchemaNode,
    from: &str,
    kind: EdgeKind,
    top_level: bool,
    refs: &mut Vec<(String, String, EdgeKind)>,
) {
    if let Some(reference) = &node.reference {
        refs.push((from.to_string(), reference.clone(), kind));
    }

    for prop in node.properties.values() {
        collect_refs(prop, from, EdgeKind::Property, false, refs);
    }
    if let Some(items) = &node.items {
        let kind = if top_level { EdgeKind::Items } else { kind };
        collect_refs(items, from, kind, false, refs);
    }
    if let Some(values) = &node.additional_properties {
        let kind = if top_level { EdgeKind::AdditionalProperties } else { kind };
        collect_refs(values, from, kind, false, refs);
    }

    for (members, member_kind) in [
        (&node.all_of, EdgeKind::AllOf),
        (&node.one_of, EdgeKind::OneOf),
        (&node.any_of, EdgeKind::AnyOf),
    ] {
        let kind = if top_level { member_kind } else { kind };
        for member in members {
            collect_refs(member, from, kind, top_level && member.reference.is_none(), refs);
        }
    }
}
