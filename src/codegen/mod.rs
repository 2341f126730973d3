//! Target Policy
//!
//! Everything language-specific the resolution core consults: the injected
//! [`NamingPolicy`] strategy, its table-driven [`TypePolicy`] presets, and
//! the casing helpers they share.

pub mod names;
pub mod policy;

pub use names::{sanitize_identifier, split_words, to_camel_case, to_pascal_case, to_snake_case, Casing};
pub use policy::{ContainerSyntax, NamingPolicy, PolicyPreset, TypePolicy};
