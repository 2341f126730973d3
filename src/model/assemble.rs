//! Model Assembler
//!
//! Drives resolution of one named schema into a [`ModelDescriptor`]:
//!
//! 1. Resolve composition to find the parent and the local property set.
//! 2. Map every local property (type, enum, defaults, innermost items).
//! 3. Drop locals the parent already declares with the same shape.
//! 4. Inherit and merge the discriminator.
//! 5. Collect imports.
//!
//! Parents are assembled through the shared [`ModelCache`]. A parent that
//! sits in an inheritance cycle with the child is referenced by name only and
//! never awaited, so concurrent assembly cannot deadlock on a cycle.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    CompositionOutcome, CompositionResolver, DefaultValue, DiscriminatorModel,
    EnumDescriptor, EnumExtractor, MappedModel, MappedType, ModelCache, ModelDescriptor, PropertyModel,
    TypeMapper,
};
use crate::codegen::NamingPolicy;
use crate::error::{ResolutionError, Result};
use crate::graph::{
    compute_cycle_analysis, CycleAnalysis, DiagnosticCode, DiagnosticItem, Diagnostics, ReferenceGraph,
    ReferenceResolver, ResolutionChain,
};
use crate::schema::{ref_name, Discriminator, SchemaNode, SchemaTable};

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    /// Give non-enum containers an empty-container default
    pub container_defaults: bool,
    /// Assemble models on the rayon pool in `assemble_all`
    pub parallel: bool,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            container_defaults: true,
            parallel: true,
        }
    }
}

// =============================================================================
// Run Report
// =============================================================================

/// A named schema whose assembly failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFailure {
    pub schema: String,
    pub error: ResolutionError,
}

/// Outcome of assembling every schema in the table
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Successful models, table order
    pub models: Vec<Arc<ModelDescriptor>>,
    pub failures: Vec<ModelFailure>,
}

impl RunReport {
    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name).map(|m| m.as_ref())
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Models whose parent is the schema `parent`
    pub fn children_of(&self, parent: &str) -> Vec<&ModelDescriptor> {
        self.models
            .iter()
            .filter(|m| m.parent_schema.as_deref() == Some(parent))
            .map(|m| m.as_ref())
            .collect()
    }

    /// Every model's diagnostics followed by one error per failure
    pub fn diagnostics(&self) -> Diagnostics {
        let mut all = Diagnostics::new();
        for model in &self.models {
            all.merge(model.diagnostics.clone());
        }
        let mut failures = Diagnostics::new();
        for failure in &self.failures {
            failures.push(DiagnosticItem::from(&failure.error));
        }
        all.merge(failures);
        all
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Assembles models from one immutable table with one policy
pub struct ModelAssembler<'a> {
    table: &'a SchemaTable,
    policy: &'a dyn NamingPolicy,
    settings: AssemblySettings,
    graph: ReferenceGraph,
    analysis: CycleAnalysis,
    cache: ModelCache,
}

impl<'a> ModelAssembler<'a> {
    pub fn new(table: &'a SchemaTable, policy: &'a dyn NamingPolicy) -> Self {
        let graph = ReferenceGraph::build(table);
        let analysis = compute_cycle_analysis(&graph);
        Self {
            table,
            policy,
            settings: AssemblySettings::default(),
            graph,
            analysis,
            cache: ModelCache::new(),
        }
    }

    pub fn with_settings(mut self, settings: AssemblySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn graph(&self) -> &ReferenceGraph {
        &self.graph
    }

    pub fn analysis(&self) -> &CycleAnalysis {
        &self.analysis
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Assemble `node` under `name`. The result itself is not cached;
    /// parents it needs are.
    pub fn assemble(&self, name: &str, node: &SchemaNode) -> Result<ModelDescriptor> {
        self.build(name, node, &ResolutionChain::new())
    }

    /// Assemble the table entry `name`, at most once per assembler
    pub fn assemble_named(&self, name: &str) -> Result<Arc<ModelDescriptor>> {
        self.assemble_within(name, &ResolutionChain::new())
    }

    /// Assemble every schema in the table; one failure never stops the others
    pub fn assemble_all(&self) -> RunReport {
        let names: Vec<&String> = self.table.names().collect();
        let results: Vec<(&String, Result<Arc<ModelDescriptor>>)> = if self.settings.parallel {
            names.par_iter().map(|n| (*n, self.assemble_named(n))).collect()
        } else {
            names.iter().map(|n| (*n, self.assemble_named(n))).collect()
        };

        let mut report = RunReport::default();
        for (name, result) in results {
            match result {
                Ok(model) => report.models.push(model),
                Err(error) => {
                    tracing::warn!(schema = %name, error = %error, "model assembly failed");
                    report.failures.push(ModelFailure {
                        schema: name.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            models = report.models.len(),
            failures = report.failures.len(),
            assemblies = self.cache.assemblies(),
            "generation run complete"
        );
        report
    }

    fn assemble_within(&self, name: &str, lineage: &ResolutionChain) -> Result<Arc<ModelDescriptor>> {
        let resolver = ReferenceResolver::new(self.table);
        let Some((name, node)) = resolver.lookup(name) else {
            return Err(ResolutionError::UnresolvedReference {
                schema: name.to_string(),
                reference: name.to_string(),
                path: "<root>".to_string(),
                suggestion: resolver.suggest(name),
            });
        };
        self.cache.get_or_assemble(name, || self.build(name, node, lineage))
    }

    // =========================================================================
    // Per-model assembly
    // =========================================================================

    fn build(&self, name: &str, node: &SchemaNode, lineage: &ResolutionChain) -> Result<ModelDescriptor> {
        tracing::debug!(schema = name, "assembling model");
        let resolver = ReferenceResolver::new(self.table);
        let mapper = TypeMapper::new(resolver, self.policy).with_analysis(&self.analysis);
        let mut diags = Diagnostics::new();

        let mut model = ModelDescriptor {
            name: name.to_string(),
            classname: self.policy.model_name(name),
            description: node.description.clone(),
            is_cyclic: self.analysis.is_cyclic(name),
            ..ModelDescriptor::default()
        };

        // Top-level enum
        if node.is_enum() && node.properties.is_empty() && !node.is_composed() {
            model.is_enum = true;
            model.allowable_values = node.enum_values.clone();
            model.alias_of = node
                .effective_type()
                .filter(|t| t.is_scalar())
                .map(|t| self.policy.scalar_type(t, node.format.as_deref()));
            return Ok(model);
        }

        // Alias of a scalar, container or other schema
        if !node.is_model_like() && (node.is_reference() || node.is_array() || node.is_map()) {
            let mut chain = ResolutionChain::rooted(name);
            let mapped = mapper.map(name, "", node, &mut chain, &mut diags)?;
            if let Some(import) = self.import_of(&mapped, &model.classname) {
                model.imports.insert(import);
            }
            model.alias_of = Some(mapped.data_type);
            model.diagnostics = diags;
            return Ok(model);
        }
        if let Some(t) = node.effective_type().filter(|t| t.is_scalar() && !node.is_model_like()) {
            model.alias_of = Some(self.policy.scalar_type(t, node.format.as_deref()));
            return Ok(model);
        }

        // 1. composition
        let composition = CompositionResolver::new(resolver).resolve(name, node, &mut diags)?;
        model.composition = composition.outcome.kind();

        let parent_model = match &composition.outcome {
            CompositionOutcome::Inheritance { parent } => {
                model.parent = Some(self.policy.model_name(parent));
                model.parent_schema = Some(parent.clone());
                self.parent_model(name, parent, lineage, &mut diags)?
            }
            _ => None,
        };

        // 2. local properties
        let mut chain = ResolutionChain::rooted(name);
        let mut locals = Vec::with_capacity(composition.properties.len());
        for (base_name, prop_node) in &composition.properties {
            let required = composition.required.contains(base_name);
            locals.push(self.build_property(name, base_name, prop_node, required, &mapper, &mut chain, &mut diags)?);
        }

        if let Some(values) = composition.additional_properties.filter(|_| !composition.properties.is_empty()) {
            let mapped = mapper.map(name, "[*]", values, &mut chain, &mut diags)?;
            if let Some(import) = self.import_of(&mapped, &model.classname) {
                model.imports.insert(import);
            }
            model.additional_properties_type = Some(mapped.data_type);
        }

        // 3. parent dedup
        let inherited: &[PropertyModel] = parent_model
            .as_deref()
            .map(|p| p.all_vars.as_slice())
            .unwrap_or_default();
        let parent_display = model.parent.clone().unwrap_or_default();
        let mut vars = Vec::new();
        let mut enums = Vec::new();
        for (prop, descriptor) in locals {
            if let Some(existing) = inherited.iter().find(|p| p.base_name == prop.base_name) {
                if !keep_local(name, &parent_display, existing, &prop, &mut diags) {
                    tracing::debug!(schema = name, property = %prop.base_name, "inherited, not redeclared");
                    continue;
                }
            }
            enums.extend(descriptor);
            vars.push(prop);
        }

        model.all_vars = inherited
            .iter()
            .map(|p| vars.iter().find(|v| v.base_name == p.base_name).unwrap_or(p).clone())
            .chain(
                vars.iter()
                    .filter(|v| !inherited.iter().any(|p| p.base_name == v.base_name))
                    .cloned(),
            )
            .collect();
        model.required_vars = model.all_vars.iter().filter(|v| v.required).cloned().collect();
        model.parent_vars = inherited.to_vec();
        model.has_enums = vars.iter().any(|v| v.is_enum);
        model.enums = enums;
        model.vars = vars;

        // 4. discriminator
        model.discriminator = self.discriminator(
            name,
            parent_model.as_deref().and_then(|p| p.discriminator.clone()),
            composition.discriminator,
            &composition.outcome,
            &mut diags,
        );

        // 5. imports
        if let Some(parent) = &model.parent {
            model.imports.insert(parent.clone());
        }
        for var in &model.vars {
            if let Some(import) = &var.complex_type {
                model.imports.insert(import.clone());
            }
        }
        model.interfaces = composition
            .interfaces
            .iter()
            .map(|i| self.policy.model_name(i))
            .collect();
        model.imports.extend(model.interfaces.iter().cloned());
        model.imports.remove(&model.classname);

        tracing::debug!(
            schema = name,
            vars = model.vars.len(),
            imports = model.imports.len(),
            "model assembled"
        );
        model.diagnostics = diags;
        Ok(model)
    }

    /// Assembled parent, or `None` when waiting on it would close a cycle
    fn parent_model(
        &self,
        name: &str,
        parent: &str,
        lineage: &ResolutionChain,
        diags: &mut Diagnostics,
    ) -> Result<Option<Arc<ModelDescriptor>>> {
        if parent == name || lineage.contains(parent) || self.analysis.is_inheritance_cycle(name, parent) {
            diags.cyclic_reference(name, parent, "allOf");
            return Ok(None);
        }

        let mut lineage = lineage.clone();
        lineage.push(name);
        self.assemble_within(parent, &lineage)
            .map(Some)
            .map_err(|e| e.within(name))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_property(
        &self,
        schema: &str,
        base_name: &str,
        node: &SchemaNode,
        required: bool,
        mapper: &TypeMapper<'_>,
        chain: &mut ResolutionChain,
        diags: &mut Diagnostics,
    ) -> Result<(PropertyModel, Option<EnumDescriptor>)> {
        let mapped = mapper.map(schema, &format!(".{}", base_name), node, chain, diags)?;
        let extractor = EnumExtractor::new(self.policy);
        let descriptor = extractor.extract(&mapped, base_name, schema);
        let enum_name = descriptor.as_ref().map(|d| d.name.as_str());

        let mut prop = self.layer(base_name, &mapped, enum_name, &extractor);
        prop.default = if prop.is_container() {
            if enum_name.is_some() || self.settings.container_defaults {
                extractor.container_default(&mapped, enum_name)
            } else {
                None
            }
        } else {
            node.default.clone().map(|value| DefaultValue::Literal { value })
        };
        prop.default_value = prop.default.as_ref().map(|d| self.policy.render_default(d));
        prop.required = required;
        prop.nullable = node.nullable;
        prop.read_only = node.read_only;
        prop.description = node.description.clone();

        Ok((prop, descriptor))
    }

    /// Property for one mapped layer; container layers recurse into their items
    fn layer(
        &self,
        base_name: &str,
        mapped: &MappedType,
        enum_name: Option<&str>,
        extractor: &EnumExtractor<'_>,
    ) -> PropertyModel {
        let items = mapped
            .items
            .as_deref()
            .map(|inner| Box::new(self.layer(base_name, inner, enum_name, extractor)));
        let most_inner_items = items.as_deref().map(|i| Box::new(i.leaf().clone()));
        let leaf = mapped.leaf();

        PropertyModel {
            base_name: base_name.to_string(),
            name: self.policy.property_name(base_name),
            data_type: mapped.data_type.clone(),
            datatype_with_enum: extractor.datatype_with_enum(mapped, enum_name),
            base_type: mapped.base_type.clone(),
            container: mapped.container,
            default: None,
            default_value: None,
            is_enum: enum_name.is_some(),
            enum_name: enum_name.map(String::from),
            allowable_values: if enum_name.is_some() { leaf.enum_values.clone() } else { Vec::new() },
            is_enum_ref: leaf.is_enum_ref,
            required: false,
            nullable: false,
            read_only: false,
            description: None,
            is_primitive_type: mapped.is_primitive,
            complex_type: mapped.complex_type.clone(),
            is_circular_reference: mapped.is_circular,
            items,
            most_inner_items,
        }
    }

    /// Referenced model a mapped type needs, never the model itself
    fn import_of(&self, mapped: &MappedType, classname: &str) -> Option<String> {
        mapped.complex_type.clone().filter(|t| t != classname)
    }

    /// Inherited discriminator wins; a local one only adds mappings
    fn discriminator(
        &self,
        name: &str,
        inherited: Option<DiscriminatorModel>,
        local: Option<&Discriminator>,
        outcome: &CompositionOutcome,
        diags: &mut Diagnostics,
    ) -> Option<DiscriminatorModel> {
        let mut merged = match (inherited, local) {
            (Some(mut d), Some(own)) => {
                if own.property_name != d.property_name {
                    diags.push(
                        DiagnosticItem::new(
                            name,
                            DiagnosticCode::DiscriminatorOverride,
                            format!(
                                "Discriminator property '{}' cannot override inherited '{}'; keeping the inherited one",
                                own.property_name, d.property_name
                            ),
                        )
                        .with_context(format!("Parent discriminator: {}", d.property_name)),
                    );
                }
                for (value, target) in &own.mapping {
                    d.mapping.entry(value.clone()).or_insert_with(|| target.clone());
                }
                d
            }
            (Some(d), None) => d,
            (None, Some(own)) => DiscriminatorModel {
                property_name: own.property_name.clone(),
                mapping: own.mapping.clone(),
                mapped_models: Vec::new(),
            },
            (None, None) => return None,
        };

        merged.mapped_models = if merged.mapping.values().any(|t| !t.is_empty()) {
            merged
                .mapping
                .iter()
                .filter(|(_, target)| !target.is_empty())
                .map(|(value, target)| MappedModel {
                    value: value.clone(),
                    model: self.policy.model_name(ref_name(target)),
                })
                .collect()
        } else {
            let implicit: Vec<String> = match outcome {
                CompositionOutcome::Union { members, .. } => members.clone(),
                _ => self.graph.children_of(name).into_iter().map(String::from).collect(),
            };
            implicit
                .into_iter()
                .map(|member| MappedModel {
                    model: self.policy.model_name(&member),
                    value: member,
                })
                .collect()
        };
        Some(merged)
    }
}

/// Decide whether a local property survives next to an inherited one
fn keep_local(
    schema: &str,
    parent: &str,
    inherited: &PropertyModel,
    local: &PropertyModel,
    diags: &mut Diagnostics,
) -> bool {
    let same_type = inherited.data_type == local.data_type;
    match (inherited.is_enum, local.is_enum) {
        (false, false) if same_type => false,
        (true, true) if same_type && inherited.same_enum_shape(local) => false,
        (true, true) if same_type => {
            diags.push(
                DiagnosticItem::new(
                    schema,
                    DiagnosticCode::EnumShadow,
                    format!(
                        "Enum property '{}' shadows the one inherited from '{}' with a different literal set",
                        local.base_name, parent
                    ),
                )
                .with_context(format!("Local enum: {}", local.datatype_with_enum)),
            );
            true
        }
        _ => {
            diags.conflicting_enum_override(schema, &local.base_name, parent);
            true
        }
    }
}

/// Assemble one schema against a table with a policy.
///
/// Convenience over [`ModelAssembler::assemble`] for a single call; runs that
/// assemble many models should share one assembler so parents are cached.
pub fn assemble(
    name: &str,
    node: &SchemaNode,
    table: &SchemaTable,
    policy: &dyn NamingPolicy,
) -> Result<ModelDescriptor> {
    ModelAssembler::new(table, policy).assemble(name, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::TypePolicy;
    use crate::model::ContainerKind;
    use crate::schema::SchemaType;
    use indexmap::IndexMap;
    use serde_json::json;

    fn string_prop() -> SchemaNode {
        SchemaNode::of_type(SchemaType::String)
    }

    #[test]
    fn test_flat_enum_property() {
        let table = SchemaTable::new();
        let policy = TypePolicy::java();
        let node = SchemaNode::default().with_property("name", SchemaNode::string_enum(["VALUE1", "VALUE2", "VALUE3"]));
        let model = assemble("sample", &node, &table, &policy).unwrap();

        let var = model.var("name").unwrap();
        assert_eq!(var.data_type, "String");
        assert_eq!(var.datatype_with_enum, "NameEnum");
        assert_eq!(var.base_type, "String");
        assert_eq!(var.default_value, None);
        assert!(var.is_enum);
        assert!(var.most_inner_items.is_none());
        assert!(model.has_enums);
        assert_eq!(model.enums[0].name, "NameEnum");
    }

    #[test]
    fn test_declared_scalar_default() {
        let table = SchemaTable::new();
        let policy = TypePolicy::java();
        let mut status = string_prop();
        status.default = Some(json!("active"));
        let node = SchemaNode::default().with_property("status", status);
        let model = assemble("Account", &node, &table, &policy).unwrap();

        assert_eq!(model.var("status").unwrap().default_value.as_deref(), Some("\"active\""));
    }

    #[test]
    fn test_container_defaults_setting() {
        let table = SchemaTable::new();
        let policy = TypePolicy::java();
        let node = SchemaNode::default().with_property("tags", SchemaNode::array_of(string_prop()));

        let with = ModelAssembler::new(&table, &policy).assemble("Pet", &node).unwrap();
        assert_eq!(with.var("tags").unwrap().default_value.as_deref(), Some("new ArrayList<String>()"));

        let without = ModelAssembler::new(&table, &policy)
            .with_settings(AssemblySettings {
                container_defaults: false,
                parallel: false,
            })
            .assemble("Pet", &node)
            .unwrap();
        assert_eq!(without.var("tags").unwrap().default_value, None);
    }

    #[test]
    fn test_enum_shadow_kept() {
        let mut table = SchemaTable::new();
        table.insert(
            "Parent",
            SchemaNode::default().with_property("kind", SchemaNode::string_enum(["A", "B"])),
        );
        let policy = TypePolicy::java();
        let child = SchemaNode::default()
            .with_all_of(SchemaNode::reference("Parent"))
            .with_property("kind", SchemaNode::string_enum(["C"]));
        let model = assemble("Child", &child, &table, &policy).unwrap();

        assert_eq!(model.vars.len(), 1);
        assert_eq!(model.all_vars.len(), 1);
        assert_eq!(model.all_vars[0].allowable_values, vec![json!("C")]);
        assert_eq!(model.diagnostics.with_code(DiagnosticCode::EnumShadow).count(), 1);
    }

    #[test]
    fn test_enum_over_plain_conflicts() {
        let mut table = SchemaTable::new();
        table.insert("Parent", SchemaNode::default().with_property("kind", string_prop()));
        let policy = TypePolicy::java();
        let child = SchemaNode::default()
            .with_all_of(SchemaNode::reference("Parent"))
            .with_property("kind", SchemaNode::string_enum(["C"]));
        let model = assemble("Child", &child, &table, &policy).unwrap();

        assert_eq!(model.vars.len(), 1);
        assert_eq!(model.diagnostics.warning_count(), 1);
        assert_eq!(
            model.diagnostics.with_code(DiagnosticCode::ConflictingEnumOverride).count(),
            1
        );
    }

    #[test]
    fn test_enum_with_other_container_shape_conflicts() {
        let mut table = SchemaTable::new();
        table.insert(
            "Parent",
            SchemaNode::default().with_property("tags", SchemaNode::array_of(SchemaNode::string_enum(["A", "B"]))),
        );
        let policy = TypePolicy::java();
        let child = SchemaNode::default()
            .with_all_of(SchemaNode::reference("Parent"))
            .with_property("tags", SchemaNode::string_enum(["A", "B"]));
        let model = assemble("Child", &child, &table, &policy).unwrap();

        assert_eq!(model.vars.len(), 1);
        assert_eq!(model.var("tags").unwrap().datatype_with_enum, "TagsEnum");
        assert_eq!(model.all_vars[0].data_type, "String");
        assert_eq!(
            model.diagnostics.with_code(DiagnosticCode::ConflictingEnumOverride).count(),
            1
        );
    }

    #[test]
    fn test_model_named_like_builtin_is_imported() {
        let mut table = SchemaTable::new();
        table.insert("File", SchemaNode::default().with_property("path", string_prop()));
        let policy = TypePolicy::java();
        let node = SchemaNode::default()
            .with_property("attachment", SchemaNode::reference("File"))
            .with_property("raw", {
                let mut raw = string_prop();
                raw.format = Some("binary".to_string());
                raw
            });
        let model = assemble("Upload", &node, &table, &policy).unwrap();

        assert_eq!(model.var("raw").unwrap().data_type, "File");
        assert!(model.var("raw").unwrap().complex_type.is_none());
        assert_eq!(model.imports.iter().collect::<Vec<_>>(), vec!["File"]);
    }

    #[test]
    fn test_self_reference_not_imported() {
        let mut table = SchemaTable::new();
        let node = SchemaNode::default()
            .with_property("next", SchemaNode::reference("Link"))
            .with_property("peers", SchemaNode::map_of(SchemaNode::reference("Link")));
        table.insert("Link", node);
        let policy = TypePolicy::java();
        let assembler = ModelAssembler::new(&table, &policy);
        let link = assembler.assemble_named("Link").unwrap();

        assert!(link.var("next").unwrap().is_circular_reference);
        assert!(link.imports.is_empty());
    }

    #[test]
    fn test_discriminator_inherited_not_overridden() {
        let mut table = SchemaTable::new();
        let mut mapping = IndexMap::new();
        mapping.insert("dog".to_string(), "#/components/schemas/Dog".to_string());
        table.insert(
            "Pet",
            SchemaNode::default()
                .with_property("pet_type", string_prop())
                .with_discriminator(Discriminator {
                    property_name: "pet_type".to_string(),
                    mapping,
                }),
        );
        table.insert(
            "Dog",
            SchemaNode::default()
                .with_all_of(SchemaNode::reference("Pet"))
                .with_discriminator(Discriminator {
                    property_name: "kind".to_string(),
                    mapping: IndexMap::new(),
                }),
        );
        let policy = TypePolicy::java();
        let assembler = ModelAssembler::new(&table, &policy);
        let dog = assembler.assemble_named("Dog").unwrap();

        let d = dog.discriminator.as_ref().unwrap();
        assert_eq!(d.property_name, "pet_type");
        assert_eq!(
            d.mapped_models,
            vec![MappedModel {
                value: "dog".to_string(),
                model: "Dog".to_string()
            }]
        );
        assert_eq!(dog.diagnostics.with_code(DiagnosticCode::DiscriminatorOverride).count(), 1);
    }

    #[test]
    fn test_alias_and_enum_models() {
        let mut table = SchemaTable::new();
        let mut ids = SchemaNode::array_of(string_prop());
        ids.items.as_mut().unwrap().format = Some("uuid".to_string());
        table.insert("Ids", ids);
        table.insert("Color", SchemaNode::string_enum(["red", "green"]));
        let policy = TypePolicy::java();
        let assembler = ModelAssembler::new(&table, &policy);

        let ids = assembler.assemble_named("Ids").unwrap();
        assert_eq!(ids.alias_of.as_deref(), Some("List<UUID>"));
        let color = assembler.assemble_named("Color").unwrap();
        assert!(color.is_enum);
        assert_eq!(color.alias_of.as_deref(), Some("String"));
        assert_eq!(color.allowable_values.len(), 2);
    }

    #[test]
    fn test_most_inner_items_of_map_of_list() {
        let table = SchemaTable::new();
        let policy = TypePolicy::java();
        let node = SchemaNode::default().with_property(
            "levels",
            SchemaNode::map_of(SchemaNode::array_of(SchemaNode::string_enum(["LOW", "HIGH"]))),
        );
        let model = assemble("Config", &node, &table, &policy).unwrap();
        let var = model.var("levels").unwrap();

        assert_eq!(var.container, ContainerKind::Map);
        assert_eq!(var.data_type, "Map<String, List<String>>");
        assert_eq!(var.datatype_with_enum, "Map<String, List<LevelsEnum>>");
        assert_eq!(var.default_value.as_deref(), Some("new HashMap<String, List<LevelsEnum>>()"));
        let leaf = var.most_inner_items.as_ref().unwrap();
        assert_eq!(leaf.container, ContainerKind::Scalar);
        assert_eq!(leaf.datatype_with_enum, "LevelsEnum");
        assert!(leaf.is_enum);
    }

    #[test]
    fn test_unknown_named_schema() {
        let mut table = SchemaTable::new();
        table.insert("Category", SchemaNode::default());
        let policy = TypePolicy::java();
        let assembler = ModelAssembler::new(&table, &policy);
        match assembler.assemble_named("Categroy").unwrap_err() {
            ResolutionError::UnresolvedReference { schema, .. } => assert_eq!(schema, "Categroy"),
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
    }
}
