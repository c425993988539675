mod common;

use common::{find_method, method_names, packages_from_yaml, resolve_store, store_packages, TARGET};
use indoc::indoc;
use pretty_assertions::assert_eq;
use wrapgen::wrap::{resolve, Method, Param};
use wrapgen::Error;

#[test]
fn test_reader_end_to_end() {
    let reader = resolve_store("Reader");

    assert_eq!(reader.name, "Reader");
    assert_eq!(reader.source_package, "io");
    assert_eq!(reader.target_package, TARGET);
    assert!(reader.is_interface);
    assert_eq!(
        reader.methods,
        vec![Method {
            name: "Read".into(),
            params: vec![Param::new("p", "[]byte")],
            results: vec![Param::new("n", "int"), Param::new("err", "error")],
            accepts_context: false,
            returns_error: true,
        }]
    );
}

#[test]
fn test_interface_methods_include_embeds_and_skip_unexported() {
    let store = resolve_store("Store");
    assert_eq!(
        method_names(&store),
        vec!["Fetch", "Len", "Put", "Append", "Close"]
    );
}

#[test]
fn test_context_and_error_classification() {
    let store = resolve_store("Store");

    let fetch = find_method(&store, "Fetch");
    assert!(fetch.accepts_context);
    assert!(fetch.returns_error);
    assert_eq!(
        fetch.results,
        vec![Param::new("i", "store.Item"), Param::new("err", "error")]
    );

    let len = find_method(&store, "Len");
    assert!(!len.accepts_context);
    assert!(!len.returns_error);
}

#[test]
fn test_variadic_contexts_do_not_accept_context() {
    let set = packages_from_yaml(indoc! {r#"
        packages:
          - name: svc
            types:
              - name: Svc
                kind: interface
                methods:
                  - name: Do
                    params: [{name: ctxs, type: "...context.Context"}]
    "#});

    let svc = resolve("Svc", &set, TARGET).unwrap();
    let call = find_method(&svc, "Do");
    assert_eq!(call.params, vec![Param::variadic("ctxs", "context.Context")]);
    assert!(!call.accepts_context);
}

#[test]
fn test_unnamed_params_get_distinct_names() {
    let store = resolve_store("Store");
    let put = find_method(&store, "Put");
    assert_eq!(put.params_names(), "ctx, s, s1");
    assert_eq!(put.results_names(), "err");
    assert!(put.accepts_context);
}

#[test]
fn test_variadic_param_carries_element_type() {
    let store = resolve_store("Store");
    let append = find_method(&store, "Append");
    let values = append.params.last().unwrap();
    assert_eq!(values.name, "values");
    assert_eq!(values.ty, "string");
    assert!(values.variadic);
    assert!(!append.params[0].variadic);
    assert_eq!(append.call(), "Append(key, values...)");
    assert_eq!(
        append.declaration(),
        "Append(key string, values ...string) (int, error)"
    );
}

#[test]
fn test_locally_declared_error_interface() {
    let checker = resolve_store("Checker");
    assert!(find_method(&checker, "Validate").returns_error);
    assert!(!find_method(&checker, "Describe").returns_error);
}

#[test]
fn test_struct_merges_value_and_pointer_forms() {
    let cache = resolve_store("Cache");
    assert!(!cache.is_interface);
    assert_eq!(
        method_names(&cache),
        vec!["Len", "Get", "ID", "Flush", "Reset"]
    );

    let get = find_method(&cache, "Get");
    assert_eq!(
        get.params
            .iter()
            .chain(&get.results)
            .map(|p| p.declaration())
            .collect::<Vec<_>>(),
        vec!["s string", "i *store.Item", "b bool"]
    );
}

#[test]
fn test_method_in_both_forms_appears_once() {
    let cache = resolve_store("Cache");
    let lens = cache.methods.iter().filter(|m| m.name == "Len").count();
    assert_eq!(lens, 1);
}

#[test]
fn test_target_package_sees_unexported_types() {
    let set = store_packages();

    let base = resolve("base", &set, "store").unwrap();
    assert_eq!(method_names(&base), vec!["ID", "Reset"]);
    assert!(!base.needs_qualifier());

    let err = resolve("base", &set, TARGET).unwrap_err();
    assert!(matches!(err, Error::TypeNotFound { .. }));
}

#[test]
fn test_same_package_types_are_unqualified() {
    let store = resolve("Store", &store_packages(), "store").unwrap();
    let fetch = find_method(&store, "Fetch");
    assert_eq!(fetch.results[0], Param::new("i", "Item"));
    assert_eq!(store.base(), "Store");
}

#[test]
fn test_missing_type_is_fatal() {
    match resolve("Missing", &store_packages(), TARGET) {
        Err(Error::TypeNotFound { name }) => assert_eq!(name, "Missing"),
        other => panic!("expected TypeNotFound, got {:?}", other),
    }
}

#[test]
fn test_special_names_for_unnamed_context_and_error() {
    let set = packages_from_yaml(indoc! {r#"
        packages:
          - name: jobs
            types:
              - name: Runner
                kind: interface
                methods:
                  - name: Run
                    params: [{type: context.Context}, {type: "...Job"}]
                    results: [{type: int}, {type: error}]
              - name: Job
                kind: struct
    "#});

    let runner = resolve("Runner", &set, TARGET).unwrap();
    let run = find_method(&runner, "Run");
    assert_eq!(run.params_names(), "ctx, j");
    assert_eq!(run.params[1].ty, "jobs.Job");
    assert!(run.params[1].variadic);
    assert_eq!(run.results_names(), "i, err");
}

#[test]
fn test_promoted_pointer_methods_through_embedded_pointer() {
    let set = packages_from_yaml(indoc! {r#"
        packages:
          - name: p
            types:
              - name: Conn
                kind: struct
                methods:
                  - {name: Close, receiver: pointer, results: [{type: error}]}
                  - {name: Addr, receiver: value, results: [{type: string}]}
              - name: Pooled
                kind: struct
                fields:
                  - {type: "*Conn", embedded: true}
    "#});

    let pooled = resolve("Pooled", &set, TARGET).unwrap();
    assert_eq!(method_names(&pooled), vec!["Close", "Addr"]);
    assert!(find_method(&pooled, "Close").returns_error);
}
