use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_registered_type_matches_itself() {
    let registry = ResourceRegistry::default().with_type(ResourceType::new("demo.Resource"));
    assert!(registry.is_resource_type("demo.Resource"));
    assert!(registry.is_resource_type("demo/Resource"));
    assert!(!registry.is_resource_type("demo.Other"));
}

#[test]
fn test_subtypes_match_through_hierarchy() {
    let registry = ResourceRegistry::jdk_defaults();
    assert!(registry.is_resource_type("java.io.FileInputStream"));
    assert!(registry.is_resource_type("java/io/BufferedReader"));
    assert!(registry.is_resource_type("java.util.jar.JarFile"));
    assert!(registry.is_resource_type("java.sql.CallableStatement"));
    assert!(!registry.is_resource_type("java.lang.String"));
    assert!(!registry.is_resource_type("com.example.Unknown"));
}

#[test]
fn test_matching_type_picks_nearest_ancestor() {
    let hierarchy = ClassHierarchy::new()
        .with("demo.Pooled", ["demo.Handle"])
        .with("demo.Handle", ["demo.Base"]);
    let registry = ResourceRegistry::new(hierarchy)
        .with_type(ResourceType::new("demo.Base"))
        .with_type(ResourceType::new("demo.Handle").with_release_method("release"));

    let ty = registry.matching_type("demo.Pooled");
    assert_eq!(ty.map(ResourceType::name), Some("demo.Handle"));
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let hierarchy = ClassHierarchy::new()
        .with("demo.A", ["demo.B"])
        .with("demo.B", ["demo.A"]);
    let registry = ResourceRegistry::new(hierarchy).with_type(ResourceType::new("demo.Res"));
    assert!(!registry.is_resource_type("demo.A"));
}

#[test]
fn test_empty_registry_matches_nothing() {
    let registry = ResourceRegistry::new(ClassHierarchy::jdk());
    assert!(registry.is_empty());
    assert!(!registry.is_resource_type("java.io.FileInputStream"));
}

#[test]
fn test_release_methods() {
    let registry = ResourceRegistry::jdk_defaults()
        .with_type(ResourceType::new("demo.Lease").with_release_method("release"));

    assert!(registry.is_release_method("java.io.FileInputStream", "close"));
    assert!(registry.is_release_method("java.lang.AutoCloseable", "close"));
    assert!(registry.is_release_method("java/io/Closeable", "close"));
    assert!(registry.is_release_method("demo.Lease", "release"));
    assert!(registry.is_release_method("demo.Lease", "close"));
    assert!(!registry.is_release_method("java.io.FileInputStream", "read"));
    assert!(!registry.is_release_method("java.lang.String", "close"));
}

#[test]
fn test_reregister_replaces() {
    let mut registry = ResourceRegistry::default();
    registry.register(ResourceType::new("demo.R"));
    registry.register(ResourceType::new("demo.R").with_release_method("dispose"));
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.types()[0].release_methods(),
        &["close".to_string(), "dispose".to_string()]
    );
}

#[test]
fn test_hierarchy_add_dedups_edges() {
    let mut h = ClassHierarchy::new();
    h.add("demo/A", ["demo/B"]).add("demo.A", ["demo.B", "demo.C"]);
    assert_eq!(
        h.direct_supertypes("demo.A"),
        Some(vec!["demo.B".to_string(), "demo.C".to_string()])
    );
    assert_eq!(h.direct_supertypes("demo.Z"), None);
    assert_eq!(h.len(), 1);
}
