//! Reference Cycle Analysis
//!
//! Computes strongly connected components (SCCs) over the reference graph.
//! Two views are kept: cycles over every reference (a property that closes
//! one is marked circular), and cycles over inheritance edges only (a parent
//! in such a cycle is never assembled eagerly).

use petgraph::algo::{condensation, kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{EdgeKind, ReferenceGraph};

// =============================================================================
// SCC Group
// =============================================================================

/// A strongly connected component (cycle group) in the reference graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SccGroup {
    pub id: usize,
    pub members: Vec<String>,
    /// Single schema referencing itself
    pub is_self_referential: bool,
}

// =============================================================================
// Analysis Result
// =============================================================================

/// Cycle membership for every schema in the graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleAnalysis {
    /// Cycles over all reference edges
    pub groups: Vec<SccGroup>,
    /// Cycles over allOf edges only
    pub inheritance_groups: Vec<SccGroup>,
    membership: HashMap<String, usize>,
    inheritance_membership: HashMap<String, usize>,
}

impl CycleAnalysis {
    /// Is this schema part of any reference cycle?
    pub fn is_cyclic(&self, name: &str) -> bool {
        self.membership.contains_key(name)
    }

    /// Do both schemas sit in the same reference cycle?
    pub fn same_cycle(&self, a: &str, b: &str) -> bool {
        match (self.membership.get(a), self.membership.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Does the inheritance edge `child -> parent` close an allOf cycle?
    pub fn is_inheritance_cycle(&self, child: &str, parent: &str) -> bool {
        match (
            self.inheritance_membership.get(child),
            self.inheritance_membership.get(parent),
        ) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn group_of(&self, name: &str) -> Option<&SccGroup> {
        self.membership.get(name).and_then(|id| self.groups.get(*id))
    }
}

// =============================================================================
// Analysis Functions
// =============================================================================

/// Compute both cycle views for a reference graph
pub fn compute_cycle_analysis(graph: &ReferenceGraph) -> CycleAnalysis {
    let (groups, membership) = cyclic_components(&graph.graph);

    let inheritance_only = graph
        .graph
        .filter_map(|_, n| Some(n.clone()), |_, e| e.is_inheritance().then_some(*e));
    let (inheritance_groups, inheritance_membership) = cyclic_components(&inheritance_only);

    if !groups.is_empty() {
        tracing::debug!(
            cycles = groups.len(),
            inheritance_cycles = inheritance_groups.len(),
            "reference cycles detected"
        );
    }

    CycleAnalysis {
        groups,
        inheritance_groups,
        membership,
        inheritance_membership,
    }
}

/// Schemas ordered so dependencies come before their dependents.
///
/// Members of one cycle are adjacent, in name order.
pub fn dependency_order(graph: &ReferenceGraph) -> Vec<String> {
    let condensed = condensation(graph.graph.clone(), true);
    // acyclic after condensation
    let order = toposort(&condensed, None).unwrap_or_default();

    order
        .into_iter()
        .rev()
        .flat_map(|idx| {
            let mut members = condensed[idx].clone();
            members.sort();
            members
        })
        .collect()
}

/// SCCs with more than one member, or a single member with a self edge
fn cyclic_components(
    graph: &DiGraph<String, EdgeKind>,
) -> (Vec<SccGroup>, HashMap<String, usize>) {
    let mut groups = Vec::new();
    let mut membership = HashMap::new();

    for scc in kosaraju_scc(graph) {
        let is_self_referential = scc.len() == 1 && has_self_edge(graph, scc[0]);
        if scc.len() == 1 && !is_self_referential {
            continue;
        }

        let id = groups.len();
        let mut members: Vec<String> = scc
            .iter()
            .filter_map(|idx| graph.node_weight(*idx).cloned())
            .collect();
        members.sort();

        for member in &members {
            membership.insert(member.clone(), id);
        }
        groups.push(SccGroup {
            id,
            members,
            is_self_referential,
        });
    }

    (groups, membership)
}

fn has_self_edge(graph: &DiGraph<String, EdgeKind>, idx: NodeIndex) -> bool {
    graph.edges(idx).any(|e| e.target() == idx)
}
