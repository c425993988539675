//! Method-set computation following Go's rules.
//!
//! - The value form of `T` holds value-receiver methods; the pointer form
//!   `*T` additionally holds pointer-receiver methods.
//! - Methods of embedded fields are promoted. A pointer-receiver method of
//!   an embedded `S` is promoted only when reached through a pointer
//!   (`*T`, or an embedded `*S`).
//! - A name found at a shallower embedding depth shadows deeper ones; two
//!   candidates for one name at the same depth cancel each other out.
//!   Field names take part in shadowing.
//! - An interface's method set is its own members plus those of embedded
//!   interfaces. A pointer to an interface has an empty method set.

use super::{Func, InterfaceType, Receiver, TypeExpr, TypeLoader, TypeName};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Bound on named-type chains when resolving an underlying type.
const MAX_NAMED_HOPS: usize = 64;

/// Ordered method set borrowed from a loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet<'a> {
    methods: Vec<&'a Func>,
}

impl<'a> MethodSet<'a> {
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Func> + '_ {
        self.methods.iter().copied()
    }

    pub fn lookup(&self, name: &str) -> Option<&'a Func> {
        self.iter().find(|m| m.name == name)
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.iter().map(|m| m.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for MethodSet<'a> {
    type Item = &'a Func;
    type IntoIter = std::vec::IntoIter<&'a Func>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.into_iter()
    }
}

/// Follow named types to their underlying type. Unknown names are returned
/// unchanged.
pub fn underlying<'a, L: TypeLoader + ?Sized>(loader: &'a L, ty: &'a TypeExpr) -> &'a TypeExpr {
    let mut current = ty;
    for _ in 0..MAX_NAMED_HOPS {
        let TypeExpr::Named(name) = current else {
            return current;
        };
        match loader.declaration(name) {
            Some(decl) => current = &decl.underlying,
            None => return current,
        }
    }
    current
}

pub fn compute<'a, L: TypeLoader + ?Sized>(loader: &'a L, ty: &'a TypeExpr) -> MethodSet<'a> {
    let (base, indirect) = match ty {
        TypeExpr::Pointer(inner) => (inner.as_ref(), true),
        other => (other, false),
    };

    match underlying(loader, base) {
        TypeExpr::Interface(_) if indirect => MethodSet::default(),
        TypeExpr::Interface(iface) => MethodSet {
            methods: interface_methods(loader, iface),
        },
        TypeExpr::Pointer(_) => MethodSet::default(),
        _ => promoted_methods(loader, base, indirect),
    }
}

fn interface_methods<'a, L: TypeLoader + ?Sized>(
    loader: &'a L,
    iface: &'a InterfaceType,
) -> Vec<&'a Func> {
    let mut methods = Vec::new();
    let mut names = HashSet::new();
    let mut visited = HashSet::new();
    collect_interface(loader, iface, &mut methods, &mut names, &mut visited);
    methods
}

fn collect_interface<'a, L: TypeLoader + ?Sized>(
    loader: &'a L,
    iface: &'a InterfaceType,
    methods: &mut Vec<&'a Func>,
    names: &mut HashSet<&'a str>,
    visited: &mut HashSet<&'a TypeName>,
) {
    for method in &iface.methods {
        if names.insert(method.name.as_str()) {
            methods.push(method);
        }
    }
    for embed in &iface.embeds {
        if let TypeExpr::Named(name) = embed {
            if !visited.insert(name) {
                continue;
            }
        }
        match underlying(loader, embed) {
            TypeExpr::Interface(inner) => collect_interface(loader, inner, methods, names, visited),
            other => warn!(embedded = ?other, "embedded type is not a loaded interface; skipping"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Embedding<'a> {
    ty: &'a TypeExpr,
    indirect: bool,
    /// Reached through more than one path at this depth
    multiples: bool,
}

#[derive(Debug)]
struct Candidate<'a> {
    func: Option<&'a Func>,
    callable: bool,
    count: usize,
}

#[derive(Default)]
struct Level<'a> {
    order: Vec<&'a str>,
    candidates: HashMap<&'a str, Candidate<'a>>,
}

impl<'a> Level<'a> {
    fn add(&mut self, name: &'a str, func: Option<&'a Func>, callable: bool, multiples: bool) {
        let weight = if multiples { 2 } else { 1 };
        match self.candidates.get_mut(name) {
            Some(existing) => existing.count += weight,
            None => {
                self.order.push(name);
                self.candidates.insert(
                    name,
                    Candidate {
                        func,
                        callable,
                        count: weight,
                    },
                );
            }
        }
    }
}

/// Breadth-first walk over embedded fields, one depth per iteration.
fn promoted_methods<'a, L: TypeLoader + ?Sized>(
    loader: &'a L,
    root: &'a TypeExpr,
    indirect: bool,
) -> MethodSet<'a> {
    let mut methods = Vec::new();
    let mut claimed: HashSet<&'a str> = HashSet::new();
    let mut seen: HashSet<&'a TypeName> = HashSet::new();
    let mut current = vec![Embedding {
        ty: root,
        indirect,
        multiples: false,
    }];

    while !current.is_empty() {
        let mut level = Level::default();
        let mut next = Vec::new();

        for embedding in consolidate(current) {
            if let TypeExpr::Named(name) = embedding.ty {
                if !seen.insert(name) {
                    continue;
                }
                let Some(decl) = loader.declaration(name) else {
                    warn!(type_name = %name.name, "embedded type is not loaded; its methods are skipped");
                    continue;
                };
                for func in &decl.methods {
                    let callable = func.receiver == Receiver::Value || embedding.indirect;
                    level.add(&func.name, Some(func), callable, embedding.multiples);
                }
            }

            match underlying(loader, embedding.ty) {
                TypeExpr::Struct(fields) => {
                    for field in fields {
                        level.add(&field.name, None, false, embedding.multiples);
                        if field.embedded {
                            let (inner, through_pointer) = match &field.ty {
                                TypeExpr::Pointer(inner) => (inner.as_ref(), true),
                                other => (other, false),
                            };
                            next.push(Embedding {
                                ty: inner,
                                indirect: embedding.indirect || through_pointer,
                                multiples: embedding.multiples,
                            });
                        }
                    }
                }
                TypeExpr::Interface(iface) => {
                    for func in interface_methods(loader, iface) {
                        level.add(&func.name, Some(func), true, embedding.multiples);
                    }
                }
                _ => {}
            }
        }

        for name in level.order {
            if !claimed.insert(name) {
                continue;
            }
            let Some(candidate) = level.candidates.get(name) else {
                continue;
            };
            if candidate.count > 1 {
                continue;
            }
            if let (Some(func), true) = (candidate.func, candidate.callable) {
                methods.push(func);
            }
        }

        current = next;
    }

    MethodSet { methods }
}

/// Merge repeated named types at one depth, flagging them as multiples.
fn consolidate(list: Vec<Embedding<'_>>) -> Vec<Embedding<'_>> {
    let mut out: Vec<Embedding<'_>> = Vec::with_capacity(list.len());
    for embedding in list {
        let duplicate = embedding.ty.as_named().and_then(|name| {
            out.iter_mut()
                .find(|existing| existing.ty.as_named() == Some(name))
        });
        match duplicate {
            Some(existing) => existing.multiples = true,
            None => out.push(embedding),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ManifestFormat, PackageSet};
    use indoc::indoc;

    fn load(yaml: &str) -> PackageSet {
        PackageSet::from_manifest_str(yaml, ManifestFormat::Yaml).unwrap()
    }

    fn names(set: &PackageSet, ty: &TypeExpr) -> Vec<String> {
        set.method_set(ty)
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    const EMBEDDING: &str = indoc! {r#"
        packages:
          - name: p
            types:
              - name: Base
                kind: struct
                methods:
                  - {name: ID, receiver: value, results: [{type: string}]}
                  - {name: Reset, receiver: pointer}
              - name: Wrapper
                kind: struct
                fields:
                  - {type: Base, embedded: true}
                methods:
                  - {name: Close, receiver: pointer, results: [{type: error}]}
              - name: PtrWrapper
                kind: struct
                fields:
                  - {type: "*Base", embedded: true}
    "#};

    #[test]
    fn test_value_form_excludes_pointer_receivers() {
        let set = load(EMBEDDING);
        let base = TypeExpr::named("p", "Base");
        assert_eq!(names(&set, &base), vec!["ID"]);
        assert_eq!(names(&set, &TypeExpr::pointer(base)), vec!["ID", "Reset"]);
    }

    #[test]
    fn test_promotion_through_embedded_value() {
        let set = load(EMBEDDING);
        let wrapper = TypeExpr::named("p", "Wrapper");
        assert_eq!(names(&set, &wrapper), vec!["ID"]);
        assert_eq!(
            names(&set, &TypeExpr::pointer(wrapper)),
            vec!["Close", "ID", "Reset"]
        );
    }

    #[test]
    fn test_promotion_through_embedded_pointer() {
        let set = load(EMBEDDING);
        let wrapper = TypeExpr::named("p", "PtrWrapper");
        assert_eq!(names(&set, &wrapper), vec!["ID", "Reset"]);
    }

    #[test]
    fn test_interface_method_set_and_pointer_to_interface() {
        let set = load(indoc! {r#"
            packages:
              - name: io
                types:
                  - name: Reader
                    kind: interface
                    methods:
                      - {name: Read, params: [{name: p, type: "[]byte"}], results: [{type: int}, {type: error}]}
                  - name: Closer
                    kind: interface
                    methods:
                      - {name: Close, results: [{type: error}]}
                  - name: ReadCloser
                    kind: interface
                    embeds: [Reader, Closer, Reader]
        "#});
        let rc = TypeExpr::named("io", "ReadCloser");
        assert_eq!(names(&set, &rc), vec!["Read", "Close"]);
        assert!(set.method_set(&TypeExpr::pointer(rc)).is_empty());
        assert!(set.is_interface(&TypeExpr::named("io", "Reader")));
    }

    #[test]
    fn test_shallow_method_shadows_promoted_one() {
        let set = load(indoc! {r#"
            packages:
              - name: p
                types:
                  - name: Inner
                    kind: struct
                    methods:
                      - {name: Close, results: [{type: error}]}
                      - {name: Flush}
                  - name: Outer
                    kind: struct
                    fields:
                      - {type: Inner, embedded: true}
                    methods:
                      - {name: Close}
        "#});
        let outer = TypeExpr::named("p", "Outer");
        let ms = set.method_set(&outer);
        assert_eq!(ms.names(), vec!["Close", "Flush"]);
        assert!(ms.lookup("Close").unwrap().signature.results.is_empty());
    }

    #[test]
    fn test_same_depth_collision_cancels() {
        let set = load(indoc! {r#"
            packages:
              - name: p
                types:
                  - name: A
                    kind: struct
                    methods: [{name: Name}, {name: OnlyA}]
                  - name: B
                    kind: struct
                    methods: [{name: Name}]
                  - name: Both
                    kind: struct
                    fields:
                      - {type: A, embedded: true}
                      - {type: B, embedded: true}
        "#});
        assert_eq!(names(&set, &TypeExpr::named("p", "Both")), vec!["OnlyA"]);
    }

    #[test]
    fn test_field_name_shadows_promoted_method() {
        let set = load(indoc! {r#"
            packages:
              - name: p
                types:
                  - name: Counter
                    kind: struct
                    methods: [{name: Len, results: [{type: int}]}, {name: Add}]
                  - name: Bag
                    kind: struct
                    fields:
                      - {type: Counter, embedded: true}
                      - {name: Len, type: int}
        "#});
        assert_eq!(names(&set, &TypeExpr::named("p", "Bag")), vec!["Add"]);
    }

    #[test]
    fn test_embedded_interface_in_struct() {
        let set = load(indoc! {r#"
            packages:
              - name: p
                types:
                  - name: Logger
                    kind: interface
                    methods: [{name: Log, params: [{type: string}]}]
                  - name: Service
                    kind: struct
                    fields:
                      - {type: Logger, embedded: true}
        "#});
        assert_eq!(names(&set, &TypeExpr::named("p", "Service")), vec!["Log"]);
    }

    #[test]
    fn test_self_embedding_terminates() {
        let set = load(indoc! {r#"
            packages:
              - name: p
                types:
                  - name: Node
                    kind: struct
                    fields:
                      - {type: "*Node", embedded: true}
                    methods: [{name: Next, receiver: pointer, results: [{type: "*Node"}]}]
        "#});
        let node = TypeExpr::pointer(TypeExpr::named("p", "Node"));
        assert_eq!(names(&set, &node), vec!["Next"]);
    }

    #[test]
    fn test_defined_type_keeps_declared_methods_only() {
        let set = load(indoc! {r#"
            packages:
              - name: p
                types:
                  - name: Celsius
                    kind: defined
                    underlying: float64
                    methods: [{name: String, results: [{type: string}]}]
        "#});
        assert_eq!(names(&set, &TypeExpr::named("p", "Celsius")), vec!["String"]);
    }

    #[test]
    fn test_unloaded_embedded_type_is_skipped() {
        let set = load(indoc! {r#"
            packages:
              - name: p
                types:
                  - name: Guarded
                    kind: struct
                    fields:
                      - {type: sync.Mutex, embedded: true}
                    methods: [{name: Get, results: [{type: int}]}]
        "#});
        assert_eq!(names(&set, &TypeExpr::named("p", "Guarded")), vec!["Get"]);
    }
}
