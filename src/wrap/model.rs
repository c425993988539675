//! The wrapped-type model handed to the renderer.
//!
//! Besides the plain fields, each record exposes derived strings that
//! templates splice into generated Go code: declarations, call expressions,
//! struct and map literals built from parameter lists.

use serde::Serialize;

/// One function input or output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Param {
    pub name: String,
    /// Rendered type; the element type when `variadic` is set
    #[serde(rename = "type")]
    pub ty: String,
    pub variadic: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            variadic: false,
        }
    }

    pub fn variadic(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            variadic: true,
            ..Self::new(name, ty)
        }
    }

    /// Argument expression when forwarding the parameter: `name` or `name...`
    pub fn pass(&self) -> String {
        if self.variadic {
            format!("{}...", self.name)
        } else {
            self.name.clone()
        }
    }

    /// `name T`, or `name ...T` for a variadic parameter
    pub fn declaration(&self) -> String {
        if self.variadic {
            format!("{} ...{}", self.name, self.ty)
        } else {
            format!("{} {}", self.name, self.ty)
        }
    }

    /// Type as a struct field: variadic parameters become slices
    pub fn field_type(&self) -> String {
        if self.variadic {
            format!("[]{}", self.ty)
        } else {
            self.ty.clone()
        }
    }
}

/// One exported method of the wrapped type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub accepts_context: bool,
    pub returns_error: bool,
}

impl Method {
    /// Parameter list followed by the result types, e.g.
    /// `(ctx context.Context, id string) (*Item, error)`
    pub fn signature(&self) -> String {
        let params = join(&self.params, Param::declaration);
        if self.results.is_empty() {
            return format!("({})", params);
        }
        let results = join(&self.results, |r| r.ty.clone());
        format!("({}) ({})", params, results)
    }

    /// Method name followed by its signature
    pub fn declaration(&self) -> String {
        format!("{}{}", self.name, self.signature())
    }

    /// Call expression forwarding every parameter
    pub fn call(&self) -> String {
        format!("{}({})", self.name, join(&self.params, Param::pass))
    }

    pub fn params_names(&self) -> String {
        join(&self.params, |p| p.name.clone())
    }

    pub fn results_names(&self) -> String {
        join(&self.results, |r| r.name.clone())
    }

    /// Anonymous struct type with one field per parameter
    pub fn params_struct(&self) -> String {
        struct_literal(&self.params)
    }

    /// Anonymous struct type with one field per result
    pub fn results_struct(&self) -> String {
        struct_literal(&self.results)
    }

    /// `map[string]interface{}` literal keyed by parameter name
    pub fn params_map(&self) -> String {
        map_literal(&self.params)
    }

    /// `map[string]interface{}` literal keyed by result name
    pub fn results_map(&self) -> String {
        map_literal(&self.results)
    }

    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Return statement reading every result from `struct_name`
    pub fn return_struct(&self, struct_name: &str) -> String {
        if self.results.is_empty() {
            return "return".to_string();
        }
        let fields = join(&self.results, |r| format!("{}.{}", struct_name, r.name));
        format!("return {}", fields)
    }
}

/// The resolved target type and its normalized methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrappedType {
    pub name: String,
    pub source_package: String,
    pub target_package: String,
    pub is_interface: bool,
    pub methods: Vec<Method>,
}

impl WrappedType {
    /// Receiver variable name: the type name with a lowercased first letter
    pub fn receiver_name(&self) -> String {
        lower_first(&self.name)
    }

    /// Whether references to the type need a package prefix
    pub fn needs_qualifier(&self) -> bool {
        self.source_package != self.target_package
    }

    pub fn qualified_name(&self) -> String {
        if self.needs_qualifier() {
            format!("{}.{}", self.source_package, self.name)
        } else {
            self.name.clone()
        }
    }

    /// Type a wrapper embeds or holds: the interface itself, or a pointer to
    /// a concrete type
    pub fn base(&self) -> String {
        if self.is_interface {
            self.qualified_name()
        } else {
            format!("*{}", self.qualified_name())
        }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Lowercase the first character, keeping the rest as is
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join(params: &[Param], f: impl Fn(&Param) -> String) -> String {
    params.iter().map(f).collect::<Vec<_>>().join(", ")
}

fn struct_literal(params: &[Param]) -> String {
    let fields = params
        .iter()
        .map(|p| format!("{} {}", p.name, p.field_type()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("struct{{\n{}}}", fields)
}

fn map_literal(params: &[Param]) -> String {
    let entries = params
        .iter()
        .map(|p| format!("\"{}\": {},", p.name, p.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!("map[string]interface{{}}{{\n{}}}", entries)
}
