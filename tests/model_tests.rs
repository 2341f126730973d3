//! End-to-end model assembly tests
//!
//! Each fixture is a small OpenAPI document; assertions are made against the
//! assembled model IR for the Java and neutral policies.

use std::collections::BTreeSet;

use schema_model::graph::dependency_order;
use schema_model::model::MappedModel;
use schema_model::{
    CompositionKind, ContainerKind, DiagnosticCode, ModelAssembler, ResolutionError, RunReport, SchemaTable,
    TypePolicy,
};
use serde_json::json;

fn load(fixture: &str) -> SchemaTable {
    SchemaTable::from_json_str(fixture).unwrap()
}

fn enum_table() -> SchemaTable {
    load(include_str!("fixtures/enum_properties.json"))
}

fn run(table: &SchemaTable, policy: &TypePolicy) -> RunReport {
    ModelAssembler::new(table, policy).assemble_all()
}

// =============================================================================
// Enum properties
// =============================================================================

#[test]
fn test_flat_enum_property() {
    let table = enum_table();
    let policy = TypePolicy::java();
    let report = run(&table, &policy);
    let var = report.model("FlatEnum").unwrap().var("name").unwrap();

    assert_eq!(var.data_type, "String");
    assert_eq!(var.datatype_with_enum, "NameEnum");
    assert_eq!(var.base_type, "String");
    assert_eq!(var.default_value, None);
    assert!(var.is_enum);
    assert!(var.items.is_none());
    assert!(var.most_inner_items.is_none());
    assert_eq!(var.allowable_values, vec![json!("VALUE1"), json!("VALUE2"), json!("VALUE3")]);
}

#[test]
fn test_array_enum_property() {
    let table = enum_table();
    let policy = TypePolicy::java();
    let report = run(&table, &policy);
    let model = report.model("ArrayEnum").unwrap();
    let var = model.var("name").unwrap();

    assert_eq!(var.container, ContainerKind::List);
    assert_eq!(var.data_type, "List<String>");
    assert_eq!(var.datatype_with_enum, "List<NameEnum>");
    assert_eq!(var.default_value.as_deref(), Some("new ArrayList<NameEnum>()"));

    let inner = var.most_inner_items.as_ref().unwrap();
    assert_eq!(inner.base_name, "name");
    assert_eq!(inner.data_type, "String");
    assert_eq!(inner.datatype_with_enum, "NameEnum");
    assert_eq!(inner.base_type, "String");
    assert_eq!(inner.default_value, None);
    assert_eq!(var.items.as_ref().unwrap().base_type, inner.base_type);

    assert_eq!(model.enums.len(), 1);
    assert_eq!(model.enums[0].name, "NameEnum");
}

#[test]
fn test_nested_array_enum_property() {
    let table = enum_table();
    let policy = TypePolicy::java();
    let report = run(&table, &policy);
    let var = report.model("NestedEnum").unwrap().var("name").unwrap();

    assert_eq!(var.data_type, "List<List<String>>");
    assert_eq!(var.datatype_with_enum, "List<List<NameEnum>>");
    assert_eq!(var.default_value.as_deref(), Some("new ArrayList<List<NameEnum>>()"));

    let items = var.items.as_ref().unwrap();
    assert_eq!(items.container, ContainerKind::List);
    assert_eq!(items.datatype_with_enum, "List<NameEnum>");
    assert_eq!(items.default_value, None);

    let inner = var.most_inner_items.as_ref().unwrap();
    assert_eq!(inner.container, ContainerKind::Scalar);
    assert_eq!(inner.base_name, "name");
    assert_eq!(inner.data_type, "String");
    assert_eq!(inner.datatype_with_enum, "NameEnum");
    assert!(inner.is_enum);
}

#[test]
fn test_neutral_policy_notation() {
    let table = enum_table();
    let policy = TypePolicy::neutral();
    let report = run(&table, &policy);
    let var = report.model("ArrayEnum").unwrap().var("name").unwrap();

    assert_eq!(var.data_type, "list<String>");
    assert_eq!(var.datatype_with_enum, "list<NameEnum>");
    assert_eq!(var.default_value.as_deref(), Some("list<NameEnum>()"));
}

// =============================================================================
// Parent dedup
// =============================================================================

#[test]
fn test_override_enum_suppressed() {
    let table = load(include_str!("fixtures/override_enum.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);
    assert!(report.is_success());

    let sample = report.model("sample").unwrap();
    assert_eq!(sample.classname, "Sample");
    assert_eq!(sample.parent.as_deref(), Some("ParentModel"));
    assert!(sample.imports.contains("ParentModel"));
    assert_eq!(sample.composition, CompositionKind::AllOfInheritance);

    // same literal set in another order is still the inherited property
    assert!(sample.var("sharedThing").is_none());
    let unshared = sample.var("unsharedThing").unwrap();
    assert_eq!(unshared.datatype_with_enum, "UnsharedThingEnum");
    assert_eq!(sample.vars.len(), 1);

    let all: Vec<&str> = sample.all_vars.iter().map(|v| v.base_name.as_str()).collect();
    assert_eq!(all, vec!["model_type", "sharedThing", "unsharedThing"]);
    assert_eq!(sample.parent_vars.len(), 2);
    assert_eq!(sample.required_vars.len(), 1);
    assert_eq!(sample.required_vars[0].base_name, "model_type");

    let discriminator = sample.discriminator.as_ref().unwrap();
    assert_eq!(discriminator.property_name, "model_type");
    assert!(sample.diagnostics.is_empty());
}

#[test]
fn test_disjoint_enum_shadows_parent() {
    let table = load(include_str!("fixtures/override_enum.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);

    let narrowed = report.model("narrowed").unwrap();
    let shared = narrowed.var("sharedThing").unwrap();
    assert_eq!(shared.allowable_values, vec![json!("valueThree")]);
    assert_eq!(narrowed.all_vars.len(), 2);
    assert_eq!(
        narrowed.all_var("sharedThing").unwrap().allowable_values,
        vec![json!("valueThree")]
    );
    assert_eq!(narrowed.diagnostics.with_code(DiagnosticCode::EnumShadow).count(), 1);
    assert_eq!(narrowed.diagnostics.warning_count(), 0);
}

#[test]
fn test_parent_discriminator_lists_children() {
    let table = load(include_str!("fixtures/override_enum.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);

    let parent = report.model("ParentModel").unwrap();
    let models: BTreeSet<&str> = parent
        .discriminator
        .as_ref()
        .unwrap()
        .mapped_models
        .iter()
        .map(|m| m.model.as_str())
        .collect();
    assert_eq!(models, BTreeSet::from(["Narrowed", "Sample"]));

    let children: BTreeSet<&str> = report.children_of("ParentModel").iter().map(|m| m.name.as_str()).collect();
    assert_eq!(children, BTreeSet::from(["narrowed", "sample"]));
}

#[test]
fn test_empty_mapping_target_is_kept_but_not_dispatched() {
    let table = load(include_str!("fixtures/override_enum.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);

    let parent = report.model("ParentModel").unwrap().discriminator.clone().unwrap();
    assert_eq!(parent.mapping.get("name").map(String::as_str), Some(""));
    assert!(parent.mapped_models.iter().all(|m| m.value != "name"));
    assert_eq!(parent.mapped_models.len(), 2);

    let sample = report.model("sample").unwrap().discriminator.clone().unwrap();
    assert_eq!(sample.property_name, "model_type");
    assert_eq!(sample.mapping.get("name").map(String::as_str), Some(""));
    assert!(sample.mapped_models.is_empty());
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_all_of_parent_and_mixin() {
    let table = load(include_str!("fixtures/composition.json"));
    let policy = TypePolicy::java();
    let assembler = ModelAssembler::new(&table, &policy);
    let dog = assembler.assemble_named("Dog").unwrap();

    assert_eq!(dog.parent.as_deref(), Some("Animal"));
    assert_eq!(dog.interfaces, vec!["Audited"]);
    let locals: Vec<&str> = dog.vars.iter().map(|v| v.base_name.as_str()).collect();
    assert_eq!(locals, vec!["bark", "owner", "createdAt"]);
    assert!(dog.var("bark").unwrap().required);
    assert_eq!(dog.var("createdAt").unwrap().data_type, "OffsetDateTime");
    assert_eq!(dog.var("owner").unwrap().complex_type.as_deref(), Some("Owner"));

    let imports: Vec<&str> = dog.imports.iter().map(String::as_str).collect();
    assert_eq!(imports, vec!["Animal", "Audited", "Owner"]);

    let discriminator = dog.discriminator.as_ref().unwrap();
    assert_eq!(discriminator.property_name, "kind");
    assert_eq!(
        discriminator.mapped_models,
        vec![MappedModel {
            value: "dog".to_string(),
            model: "Dog".to_string()
        }]
    );
}

#[test]
fn test_one_of_union() {
    let table = load(include_str!("fixtures/composition.json"));
    let policy = TypePolicy::java();
    let assembler = ModelAssembler::new(&table, &policy);
    let pet = assembler.assemble_named("Pet").unwrap();

    assert_eq!(pet.composition, CompositionKind::OneOfUnion);
    assert!(pet.parent.is_none());
    assert_eq!(pet.interfaces, vec!["Cat", "Dog"]);
    assert_eq!(pet.diagnostics.with_code(DiagnosticCode::UnnamedUnionMember).count(), 1);

    let mapped: Vec<&str> = pet
        .discriminator
        .as_ref()
        .unwrap()
        .mapped_models
        .iter()
        .map(|m| m.model.as_str())
        .collect();
    assert_eq!(mapped, vec!["Cat", "Dog"]);
}

#[test]
fn test_one_of_alias_member_keeps_its_name() {
    let table = load(include_str!("fixtures/composition.json"));
    let policy = TypePolicy::java();
    let assembler = ModelAssembler::new(&table, &policy);

    let lookup = assembler.assemble_named("Lookup").unwrap();
    assert_eq!(lookup.composition, CompositionKind::OneOfUnion);
    assert_eq!(lookup.interfaces, vec!["PetId", "Cat"]);
    assert!(lookup.imports.contains("PetId"));

    let pet_id = assembler.assemble_named("PetId").unwrap();
    assert_eq!(pet_id.alias_of.as_deref(), Some("UUID"));
    assert!(pet_id.vars.is_empty());
}

#[test]
fn test_additional_properties_type_is_imported() {
    let table = load(include_str!("fixtures/composition.json"));
    let policy = TypePolicy::java();
    let assembler = ModelAssembler::new(&table, &policy);
    let registry = assembler.assemble_named("Registry").unwrap();

    assert_eq!(registry.var("label").unwrap().data_type, "String");
    assert_eq!(registry.additional_properties_type.as_deref(), Some("Owner"));
    assert_eq!(registry.imports.iter().collect::<Vec<_>>(), vec!["Owner"]);
}

#[test]
fn test_failures_are_isolated() {
    let table = load(include_str!("fixtures/composition.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);

    assert!(!report.is_success());
    assert_eq!(report.models.len() + report.failures.len(), table.len());

    let failed: BTreeSet<&str> = report.failures.iter().map(|f| f.schema.as_str()).collect();
    assert_eq!(failed, BTreeSet::from(["Ambiguous", "Broken"]));

    for failure in &report.failures {
        match (&failure.schema[..], &failure.error) {
            ("Ambiguous", ResolutionError::AmbiguousComposition { schema, .. }) => assert_eq!(schema, "Ambiguous"),
            ("Broken", ResolutionError::UnresolvedReference { reference, .. }) => {
                assert_eq!(reference, "#/components/schemas/Categroy")
            }
            other => panic!("Expected Ambiguous or Broken failure, got {:?}", other),
        }
    }
    assert!(report.model("Dog").is_some());
    assert!(report.diagnostics().has_errors());
}

#[test]
fn test_shared_parents_assembled_once() {
    let table = load(include_str!("fixtures/composition.json"));
    let policy = TypePolicy::java();
    let assembler = ModelAssembler::new(&table, &policy);
    let report = assembler.assemble_all();

    assert_eq!(assembler.cache().assemblies(), table.len());

    // a second run is served entirely from the cache
    let again = assembler.assemble_all();
    assert_eq!(assembler.cache().assemblies(), table.len());
    assert_eq!(again.models.len(), report.models.len());
}

#[test]
fn test_dependency_order_puts_parents_first() {
    let table = load(include_str!("fixtures/composition.json"));
    let policy = TypePolicy::java();
    let assembler = ModelAssembler::new(&table, &policy);
    let order = dependency_order(assembler.graph());
    let position = |name: &str| order.iter().position(|n| n == name).unwrap();

    assert_eq!(order.len(), table.len());
    assert!(position("Animal") < position("Owner"));
    assert!(position("Owner") < position("Dog"));
    assert!(position("Audited") < position("Dog"));
    assert!(position("Dog") < position("Pet"));
}

// =============================================================================
// Cycles
// =============================================================================

#[test]
fn test_self_reference_terminates() {
    let table = load(include_str!("fixtures/cycles.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);
    let tree = report.model("TreeNode").unwrap();

    assert!(tree.is_cyclic);
    let parent = tree.var("parent").unwrap();
    assert_eq!(parent.data_type, "TreeNode");
    assert!(parent.is_circular_reference);
    let children = tree.var("children").unwrap();
    assert_eq!(children.data_type, "List<TreeNode>");
    assert!(children.most_inner_items.as_ref().unwrap().is_circular_reference);
    assert!(tree.diagnostics.with_code(DiagnosticCode::CyclicReference).count() >= 2);
    assert!(tree.imports.is_empty());
}

#[test]
fn test_mutual_reference_terminates() {
    let table = load(include_str!("fixtures/cycles.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);

    let author = report.model("Author").unwrap();
    assert_eq!(author.var("books").unwrap().data_type, "List<Book>");
    assert!(author.var("books").unwrap().is_circular_reference);
    let book = report.model("Book").unwrap();
    assert_eq!(book.var("author").unwrap().complex_type.as_deref(), Some("Author"));
    assert!(book.imports.contains("Author"));
}

#[test]
fn test_inheritance_cycle_does_not_deadlock() {
    let table = load(include_str!("fixtures/cycles.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);

    let left = report.model("Left").unwrap();
    assert_eq!(left.parent.as_deref(), Some("Right"));
    assert!(left.parent_vars.is_empty());
    assert_eq!(left.vars.len(), 1);
    assert_eq!(left.diagnostics.with_code(DiagnosticCode::CyclicReference).count(), 1);
    assert!(report.model("Right").is_some());
}

#[test]
fn test_alias_cycle_resolves_to_name() {
    let table = load(include_str!("fixtures/cycles.json"));
    let policy = TypePolicy::java();
    let report = run(&table, &policy);

    assert!(report.is_success());
    let ping = report.model("Ping").unwrap();
    assert_eq!(ping.alias_of.as_deref(), Some("Ping"));
    assert!(ping.imports.is_empty());
    let pong = report.model("Pong").unwrap();
    assert_eq!(pong.alias_of.as_deref(), Some("Pong"));
}
