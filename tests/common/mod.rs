// Test utility module for wrapgen integration tests
#![allow(dead_code)]

use std::path::PathBuf;

use wrapgen::types::{ManifestFormat, PackageSet};
use wrapgen::wrap::{resolve, Method, WrappedType};

/// Packages `io` and `store`, shared by the integration suites
pub const STORE_MANIFEST: &str = include_str!("../data/store.yaml");

/// Package the fixtures generate code into
pub const TARGET: &str = "metrics";

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn store_packages() -> PackageSet {
    PackageSet::from_manifest_str(STORE_MANIFEST, ManifestFormat::Yaml)
        .expect("fixture manifest should load")
}

pub fn packages_from_yaml(yaml: &str) -> PackageSet {
    PackageSet::from_manifest_str(yaml, ManifestFormat::Yaml)
        .expect("inline manifest should load")
}

/// Resolve a type from the shared fixture into [`TARGET`]
pub fn resolve_store(type_name: &str) -> WrappedType {
    resolve(type_name, &store_packages(), TARGET).expect("fixture type should resolve")
}

pub fn method_names(wrapped: &WrappedType) -> Vec<&str> {
    wrapped.methods.iter().map(|m| m.name.as_str()).collect()
}

pub fn find_method<'a>(wrapped: &'a WrappedType, name: &str) -> &'a Method {
    wrapped
        .methods
        .iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| panic!("method {} missing from {}", name, wrapped.name))
}
