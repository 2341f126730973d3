//! Schema Model
//!
//! Resolves OpenAPI / JSON Schema documents into a language-neutral model IR
//! that template backends render into source code for any target language.
//!
//! ## Features
//!
//! - **Reference resolution**: per-chain visited sets, cycles resolve to named types
//! - **Type mapping**: pluggable per-target naming/type policy
//! - **Enum extraction**: one synthesized enum per property at any container depth
//! - **Composition**: allOf inheritance and mixins, oneOf/anyOf unions, discriminators
//! - **Assembly**: parent dedup, imports, parallel runs with an at-most-once cache
//!
//! ## Architecture
//!
//! ```text
//! SchemaTable ──> ReferenceGraph ──> CycleAnalysis
//!      │                                  │
//!      └──> ModelAssembler <──────────────┘
//!              │  CompositionResolver
//!              │  TypeMapper ──> NamingPolicy
//!              │  EnumExtractor
//!              └──> ModelDescriptor { vars, parent, imports, ... }
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod schema;

pub use codegen::{NamingPolicy, PolicyPreset, TypePolicy};
pub use config::GeneratorConfig;
pub use error::{ResolutionError, Result};
pub use graph::{DiagnosticCode, Diagnostics, ReferenceGraph, ReferenceResolver};
pub use model::{
    assemble, CompositionKind, ContainerKind, DefaultValue, EnumDescriptor, ModelAssembler, ModelDescriptor,
    PropertyModel, RunReport,
};
pub use schema::{SchemaNode, SchemaTable, SchemaType};
