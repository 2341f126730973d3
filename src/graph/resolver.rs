//! Reference Resolver
//!
//! Pure lookup of `$ref` tokens in the named-schema table. Each resolution
//! chain carries its own visited set; revisiting a schema already on the
//! chain yields [`Resolved::Cycle`] instead of recursing.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::error::{ResolutionError, Result};
use crate::schema::{ref_name, SchemaNode, SchemaTable};

/// Outcome of resolving one reference
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Target found and not yet on the chain
    Node { name: &'a str, node: &'a SchemaNode },
    /// Target already on the chain: treat as a named type, do not expand
    Cycle { name: &'a str },
}

impl<'a> Resolved<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Node { name, .. } | Self::Cycle { name } => name,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle { .. })
    }
}

/// Schemas visited along one resolution chain, in visiting order
#[derive(Debug, Clone, Default)]
pub struct ResolutionChain {
    visited: Vec<String>,
}

impl ResolutionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain starting at a named schema
    pub fn rooted(name: &str) -> Self {
        Self {
            visited: vec![name.to_string()],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.visited.iter().any(|v| v == name)
    }

    pub fn push(&mut self, name: &str) {
        self.visited.push(name.to_string());
    }

    pub fn pop(&mut self) {
        self.visited.pop();
    }

    /// `A -> B -> C`
    pub fn describe(&self) -> String {
        self.visited.join(" -> ")
    }
}

/// Resolves reference tokens against a table it never mutates
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    table: &'a SchemaTable,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(table: &'a SchemaTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a SchemaTable {
        self.table
    }

    /// Plain lookup, ignoring cycles
    pub fn lookup(&self, token: &str) -> Option<(&'a str, &'a SchemaNode)> {
        self.table
            .get_entry(ref_name(token))
            .map(|(name, node)| (name.as_str(), node))
    }

    /// Resolve `token`, referenced from `schema` at `path`, along `chain`
    pub fn resolve(
        &self,
        schema: &str,
        token: &str,
        path: &str,
        chain: &ResolutionChain,
    ) -> Result<Resolved<'a>> {
        let Some((name, node)) = self.lookup(token) else {
            return Err(ResolutionError::UnresolvedReference {
                schema: schema.to_string(),
                reference: token.to_string(),
                path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
                suggestion: self.suggest(ref_name(token)),
            });
        };

        if chain.contains(name) {
            tracing::debug!(schema, target = name, chain = %chain.describe(), "reference cycle");
            return Ok(Resolved::Cycle { name });
        }

        Ok(Resolved::Node { name, node })
    }

    /// Closest table name to a missing one
    pub fn suggest(&self, missing: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        self.table
            .names()
            .filter_map(|name| matcher.fuzzy_match(name, missing).map(|score| (score, name)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, name)| name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SchemaTable {
        let mut table = SchemaTable::new();
        table.insert("Category", SchemaNode::default());
        table.insert("Pet", SchemaNode::default());
        table
    }

    #[test]
    fn test_resolve_found() {
        let table = table();
        let resolver = ReferenceResolver::new(&table);
        let resolved = resolver
            .resolve("Pet", "#/components/schemas/Category", ".category", &ResolutionChain::rooted("Pet"))
            .unwrap();
        assert!(matches!(resolved, Resolved::Node { name: "Category", .. }));
    }

    #[test]
    fn test_resolve_cycle_marker() {
        let table = table();
        let resolver = ReferenceResolver::new(&table);
        let mut chain = ResolutionChain::rooted("Pet");
        chain.push("Category");
        let resolved = resolver.resolve("Category", "Pet", ".pet", &chain).unwrap();
        assert!(resolved.is_cycle());
        assert_eq!(resolved.name(), "Pet");
        assert_eq!(chain.describe(), "Pet -> Category");
    }

    #[test]
    fn test_resolve_missing_suggests() {
        let table = table();
        let resolver = ReferenceResolver::new(&table);
        let err = resolver
            .resolve("Pet", "#/components/schemas/Categ", ".category", &ResolutionChain::new())
            .unwrap_err();
        match err {
            ResolutionError::UnresolvedReference { schema, reference, path, suggestion } => {
                assert_eq!(schema, "Pet");
                assert_eq!(reference, "#/components/schemas/Categ");
                assert_eq!(path, ".category");
                assert_eq!(suggestion.as_deref(), Some("Category"));
            }
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
    }
}
