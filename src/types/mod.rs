//! Read-only type model for Go-style packages.
//!
//! The resolver never inspects source text directly. It works against the
//! structures in this module, which a [`TypeLoader`] exposes:
//!
//! - [`TypeExpr`]: a type expression (`[]byte`, `*store.Item`, `func() error`)
//! - [`TypeName`]: a reference to a declared named type
//! - [`Func`] / [`Signature`] / [`Var`]: methods and their parameter lists
//! - [`TypeDecl`] / [`Package`]: declarations grouped by package
//!
//! Type expressions render back to Go syntax through a [`Qualifier`], which
//! decides whether a named type needs its package prefix in the generated
//! file.

pub mod loader;
pub mod manifest;
pub mod method_set;
pub mod package;
pub mod parse;

use serde::Deserialize;
use std::fmt::Write as _;

pub use loader::TypeLoader;
pub use manifest::{Manifest, ManifestFormat};
pub use method_set::MethodSet;
pub use package::{Package, PackageSet, TypeDecl};

/// Predeclared non-interface types.
pub const BASIC_TYPES: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "byte",
    "rune",
    "float32",
    "float64",
    "complex64",
    "complex128",
];

/// Predeclared named types that carry an underlying declaration.
pub const UNIVERSE_TYPES: &[&str] = &["error", "any", "comparable"];

/// Whether an identifier is exported (first rune is uppercase).
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Reference to a named type.
///
/// `package` is `None` for predeclared names such as `error`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub package: Option<String>,
    pub name: String,
}

impl TypeName {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: Some(package.into()),
            name: name.into(),
        }
    }

    pub fn universe(name: impl Into<String>) -> Self {
        Self {
            package: None,
            name: name.into(),
        }
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Receiver form a method is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Receiver {
    #[default]
    Value,
    Pointer,
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// One parameter or result. An empty or blank (`_`) name means the value
/// cannot be referred to by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var {
    pub name: String,
    pub ty: TypeExpr,
}

impl Var {
    pub fn named(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            name: String::new(),
            ty,
        }
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty() && self.name != "_"
    }
}

/// Function signature. When `variadic` is set the final parameter has
/// slice type and stands for `...elem` in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    pub params: Vec<Var>,
    pub results: Vec<Var>,
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<Var>, results: Vec<Var>) -> Self {
        Self {
            params,
            results,
            variadic: false,
        }
    }

    /// Mark the final parameter as variadic.
    pub fn variadic(mut self) -> Self {
        self.variadic = !self.params.is_empty();
        self
    }
}

/// A method, either declared on a named type or listed by an interface.
/// Interface members always use [`Receiver::Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Func {
    pub name: String,
    pub receiver: Receiver,
    pub signature: Signature,
}

impl Func {
    pub fn new(name: impl Into<String>, receiver: Receiver, signature: Signature) -> Self {
        Self {
            name: name.into(),
            receiver,
            signature,
        }
    }

    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Struct field. Embedded fields are named after their type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: TypeExpr,
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    /// Embedded field; its name is the simple name of the (dereferenced) type.
    pub fn embedded(ty: TypeExpr) -> Self {
        let name = ty.deref().simple_name().unwrap_or_default().to_string();
        Self {
            name,
            ty,
            embedded: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InterfaceType {
    pub methods: Vec<Func>,
    pub embeds: Vec<TypeExpr>,
}

impl InterfaceType {
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.embeds.is_empty()
    }
}

/// A Go type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Basic(String),
    Named(TypeName),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array { len: String, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Func(Signature),
    Interface(InterfaceType),
    Struct(Vec<Field>),
}

impl TypeExpr {
    pub fn basic(name: impl Into<String>) -> Self {
        Self::Basic(name.into())
    }

    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named(TypeName::new(package, name))
    }

    pub fn error() -> Self {
        Self::Named(TypeName::universe("error"))
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        Self::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeExpr) -> Self {
        Self::Slice(Box::new(elem))
    }

    /// Strip one level of pointer indirection.
    pub fn deref(&self) -> &TypeExpr {
        match self {
            Self::Pointer(inner) => inner,
            other => other,
        }
    }

    /// Element type of a slice, used for variadic parameters.
    pub fn slice_elem(&self) -> Option<&TypeExpr> {
        match self {
            Self::Slice(elem) => Some(elem.as_ref()),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&TypeName> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Simple identifier of a named or basic type.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name.name.as_str()),
            Self::Basic(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Render as Go source, qualifying named types through `qualifier`.
    pub fn render(&self, qualifier: &Qualifier) -> String {
        let mut out = String::new();
        self.write_to(&mut out, qualifier);
        out
    }

    fn write_to(&self, out: &mut String, q: &Qualifier) {
        match self {
            Self::Basic(name) => out.push_str(name),
            Self::Named(name) => {
                if let Some(pkg) = name.package.as_deref().and_then(|p| q.prefix_for(p)) {
                    out.push_str(pkg);
                    out.push('.');
                }
                out.push_str(&name.name);
            }
            Self::Pointer(inner) => {
                out.push('*');
                inner.write_to(out, q);
            }
            Self::Slice(elem) => {
                out.push_str("[]");
                elem.write_to(out, q);
            }
            Self::Array { len, elem } => {
                let _ = write!(out, "[{}]", len);
                elem.write_to(out, q);
            }
            Self::Map { key, value } => {
                out.push_str("map[");
                key.write_to(out, q);
                out.push(']');
                value.write_to(out, q);
            }
            Self::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                elem.write_to(out, q);
            }
            Self::Func(sig) => {
                out.push_str("func");
                write_signature(out, sig, q);
            }
            Self::Interface(iface) => {
                if iface.is_empty() {
                    out.push_str("interface{}");
                    return;
                }
                out.push_str("interface{");
                let mut first = true;
                for embed in &iface.embeds {
                    if !first {
                        out.push_str("; ");
                    }
                    first = false;
                    embed.write_to(out, q);
                }
                for method in &iface.methods {
                    if !first {
                        out.push_str("; ");
                    }
                    first = false;
                    out.push_str(&method.name);
                    write_signature(out, &method.signature, q);
                }
                out.push('}');
            }
            Self::Struct(fields) => {
                out.push_str("struct{");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    field.ty.write_to(out, q);
                }
                out.push('}');
            }
        }
    }
}

fn write_signature(out: &mut String, sig: &Signature, q: &Qualifier) {
    out.push('(');
    write_vars(out, &sig.params, sig.variadic, q);
    out.push(')');

    match sig.results.as_slice() {
        [] => {}
        [only] if only.name.is_empty() => {
            out.push(' ');
            only.ty.write_to(out, q);
        }
        results => {
            out.push_str(" (");
            write_vars(out, results, false, q);
            out.push(')');
        }
    }
}

fn write_vars(out: &mut String, vars: &[Var], variadic: bool, q: &Qualifier) {
    for (i, var) in vars.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if !var.name.is_empty() {
            out.push_str(&var.name);
            out.push(' ');
        }
        match var.ty.slice_elem() {
            Some(elem) if variadic && i + 1 == vars.len() => {
                out.push_str("...");
                elem.write_to(out, q);
            }
            _ => var.ty.write_to(out, q),
        }
    }
}

/// Decides when a named type needs its package prefix.
///
/// Types declared in the package that hosts the generated code are written
/// bare; everything else keeps its package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
    target_package: String,
}

impl Qualifier {
    pub fn new(target_package: impl Into<String>) -> Self {
        Self {
            target_package: target_package.into(),
        }
    }

    pub fn target_package(&self) -> &str {
        &self.target_package
    }

    fn prefix_for<'p>(&self, package: &'p str) -> Option<&'p str> {
        (package != self.target_package).then_some(package)
    }
}
