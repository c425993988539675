//! Property-based tests for method-set resolution
//!
//! These tests verify invariants that should hold for all inputs:
//! - Resolution is deterministic
//! - Parameter and result names are unique within their list
//! - Unexported methods never surface
//! - Variadic and context tagging follow the declared signature

mod common;

use common::{packages_from_yaml, TARGET};
use proptest::prelude::*;
use std::collections::HashSet;
use wrapgen::wrap::resolve;

/// Type as written in the manifest, and as rendered from `TARGET`
const PARAM_TYPES: &[(&str, &str)] = &[
    ("string", "string"),
    ("int", "int"),
    ("error", "error"),
    ("context.Context", "context.Context"),
    ("[]byte", "[]byte"),
    ("*Item", "*p.Item"),
    ("Item", "p.Item"),
    ("map[string]int", "map[string]int"),
    ("func() error", "func() error"),
];

const EXPLICIT_NAMES: &[&str] = &["s", "i", "ctx", "err", "b", "id"];

#[derive(Debug, Clone)]
struct MethodCase {
    name: String,
    params: Vec<(Option<usize>, usize)>,
    results: Vec<(Option<usize>, usize)>,
    variadic: bool,
}

fn var_list() -> impl Strategy<Value = Vec<(Option<usize>, usize)>> {
    prop::collection::vec(
        (
            prop::option::of(0..EXPLICIT_NAMES.len()),
            0..PARAM_TYPES.len(),
        ),
        0..5,
    )
}

fn method_case(name: String) -> impl Strategy<Value = MethodCase> {
    (var_list(), var_list(), any::<bool>()).prop_map(move |(params, results, variadic)| {
        MethodCase {
            name: name.clone(),
            params,
            results,
            variadic,
        }
    })
}

fn interface_cases() -> impl Strategy<Value = Vec<MethodCase>> {
    prop::collection::btree_set("[A-Za-z][a-z0-9]{0,5}", 1..6).prop_flat_map(|names| {
        names
            .into_iter()
            .map(method_case)
            .collect::<Vec<_>>()
    })
}

/// Drop repeated explicit names so every list is valid Go
fn dedup_names(vars: &[(Option<usize>, usize)]) -> Vec<(Option<usize>, usize)> {
    let mut seen = HashSet::new();
    vars.iter()
        .map(|&(name, ty)| match name {
            Some(n) if seen.insert(n) => (Some(n), ty),
            _ => (None, ty),
        })
        .collect()
}

fn yaml_vars(vars: &[(Option<usize>, usize)], variadic: bool) -> String {
    let last = vars.len().saturating_sub(1);
    let items: Vec<String> = vars
        .iter()
        .enumerate()
        .map(|(i, &(name, ty))| {
            let dots = if variadic && i == last { "..." } else { "" };
            let ty = format!("{}{}", dots, PARAM_TYPES[ty].0);
            match name {
                Some(n) => format!("{{name: {}, type: \"{}\"}}", EXPLICIT_NAMES[n], ty),
                None => format!("{{type: \"{}\"}}", ty),
            }
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn manifest(cases: &[MethodCase]) -> String {
    let mut yaml = String::from(
        "packages:\n  - name: p\n    types:\n      - name: Item\n        kind: struct\n      - name: Svc\n        kind: interface\n        methods:\n",
    );
    for case in cases {
        yaml.push_str(&format!(
            "          - name: \"{}\"\n            params: {}\n            results: {}\n",
            case.name,
            yaml_vars(&case.params, case.variadic),
            yaml_vars(&case.results, false),
        ));
    }
    yaml
}

fn normalized(cases: Vec<MethodCase>) -> Vec<MethodCase> {
    cases
        .into_iter()
        .map(|c| MethodCase {
            params: dedup_names(&c.params),
            results: dedup_names(&c.results),
            variadic: c.variadic && !c.params.is_empty(),
            ..c
        })
        .collect()
}

proptest! {
    /// Property: resolving the same type twice gives identical models
    #[test]
    fn prop_resolution_is_deterministic(cases in interface_cases()) {
        let cases = normalized(cases);
        let set = packages_from_yaml(&manifest(&cases));

        let first = resolve("Svc", &set, TARGET).unwrap();
        let second = resolve("Svc", &set, TARGET).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// Property: names within one parameter or result list never repeat
    #[test]
    fn prop_names_are_unique_per_list(cases in interface_cases()) {
        let cases = normalized(cases);
        let set = packages_from_yaml(&manifest(&cases));
        let wrapped = resolve("Svc", &set, TARGET).unwrap();

        for method in &wrapped.methods {
            for list in [&method.params, &method.results] {
                let names: HashSet<_> = list.iter().map(|p| p.name.as_str()).collect();
                prop_assert_eq!(names.len(), list.len(), "duplicate name in {}", method.name);
                prop_assert!(list.iter().all(|p| !p.name.is_empty()));
            }
        }
    }

    /// Property: exactly the exported methods surface, in declaration order
    #[test]
    fn prop_only_exported_methods_surface(cases in interface_cases()) {
        let cases = normalized(cases);
        let set = packages_from_yaml(&manifest(&cases));
        let wrapped = resolve("Svc", &set, TARGET).unwrap();

        let expected: Vec<&str> = cases
            .iter()
            .map(|c| c.name.as_str())
            .filter(|n| n.starts_with(|c: char| c.is_uppercase()))
            .collect();
        let actual: Vec<&str> = wrapped.methods.iter().map(|m| m.name.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: rendered types, variadic flags and the context flag follow
    /// the declared signature
    #[test]
    fn prop_signatures_follow_declaration(cases in interface_cases()) {
        let cases = normalized(cases);
        let set = packages_from_yaml(&manifest(&cases));
        let wrapped = resolve("Svc", &set, TARGET).unwrap();

        for case in cases.iter().filter(|c| c.name.starts_with(|c: char| c.is_uppercase())) {
            let method = wrapped.method(&case.name).unwrap();
            prop_assert_eq!(method.params.len(), case.params.len());

            for (i, (param, &(name, ty))) in method.params.iter().zip(&case.params).enumerate() {
                prop_assert_eq!(param.ty.as_str(), PARAM_TYPES[ty].1);
                prop_assert_eq!(param.variadic, case.variadic && i + 1 == case.params.len());
                if let Some(n) = name {
                    prop_assert_eq!(param.name.as_str(), EXPLICIT_NAMES[n]);
                }
            }

            let first_is_context = case
                .params
                .first()
                .is_some_and(|&(_, ty)| PARAM_TYPES[ty].0 == "context.Context")
                && !(case.variadic && case.params.len() == 1);
            prop_assert_eq!(method.accepts_context, first_is_context);

            let last_is_error = case
                .results
                .last()
                .is_some_and(|&(_, ty)| PARAM_TYPES[ty].0 == "error");
            prop_assert_eq!(method.returns_error, last_is_error);
        }
    }
}
