//! Enum Extractor
//!
//! Finds inline literal sets on the innermost layer of a mapped property and
//! synthesizes one enum per property. The enum name depends only on the
//! property's base name, so `name` yields `NameEnum` whether the literals sit
//! on the field itself or under any number of container layers.

use super::{ContainerKind, DefaultValue, EnumDescriptor, MappedType};
use crate::codegen::NamingPolicy;

#[derive(Clone, Copy)]
pub struct EnumExtractor<'a> {
    policy: &'a dyn NamingPolicy,
}

impl<'a> EnumExtractor<'a> {
    pub fn new(policy: &'a dyn NamingPolicy) -> Self {
        Self { policy }
    }

    /// Enum for property `base_name` of model `scope`, if its leaf is enumerated.
    ///
    /// References to named enum schemas are left alone: that enum already has
    /// a model of its own.
    pub fn extract(&self, mapped: &MappedType, base_name: &str, scope: &str) -> Option<EnumDescriptor> {
        let leaf = mapped.leaf();
        if leaf.enum_values.is_empty() || leaf.is_enum_ref {
            return None;
        }

        let descriptor = EnumDescriptor {
            name: self.policy.enum_type_name(base_name),
            values: leaf.enum_values.clone(),
            base_name: base_name.to_string(),
            scope: scope.to_string(),
        };
        tracing::debug!(
            schema = scope,
            property = base_name,
            enum_name = %descriptor.name,
            depth = mapped.depth(),
            "synthesized enum"
        );
        Some(descriptor)
    }

    /// `data_type` with the leaf replaced by the enum: `List<List<NameEnum>>`
    pub fn datatype_with_enum(&self, mapped: &MappedType, enum_name: Option<&str>) -> String {
        match (enum_name, &mapped.items) {
            (None, _) => mapped.data_type.clone(),
            (Some(name), None) => name.to_string(),
            (Some(name), Some(items)) => self
                .policy
                .wrap(mapped.container, &self.datatype_with_enum(items, Some(name))),
        }
    }

    /// Empty container of the element type, with the enum substituted.
    ///
    /// Scalars have no container default.
    pub fn container_default(&self, mapped: &MappedType, enum_name: Option<&str>) -> Option<DefaultValue> {
        let items = mapped.items.as_deref()?;
        let inner = self.datatype_with_enum(items, enum_name);
        match mapped.container {
            ContainerKind::List => Some(DefaultValue::EmptyList { item_type: inner }),
            ContainerKind::Map => Some(DefaultValue::EmptyMap { value_type: inner }),
            ContainerKind::Scalar => None,
        }
    }
}
