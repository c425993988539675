use super::manifest::{Manifest, ManifestFormat};
use super::{is_exported, Func, InterfaceType, Receiver, Signature, TypeExpr, TypeLoader, TypeName, Var};
use crate::errors::{Error, IoResultExt, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Declaration of a named type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub underlying: TypeExpr,
    /// Methods declared directly on the type (not promoted ones)
    pub methods: Vec<Func>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, underlying: TypeExpr) -> Self {
        Self {
            name: name.into(),
            underlying,
            methods: Vec::new(),
        }
    }

    pub fn with_methods(mut self, methods: Vec<Func>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_method(mut self, method: Func) -> Self {
        self.methods.push(method);
        self
    }
}

/// A loaded package: its name, import path and type declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    path: String,
    decls: Vec<TypeDecl>,
    index: HashMap<String, usize>,
}

impl Package {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            decls: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn decls(&self) -> &[TypeDecl] {
        &self.decls
    }

    /// Add a declaration. A later declaration with the same name replaces
    /// the earlier one.
    pub fn add_decl(&mut self, decl: TypeDecl) {
        match self.index.get(&decl.name) {
            Some(&i) => self.decls[i] = decl,
            None => {
                self.index.insert(decl.name.clone(), self.decls.len());
                self.decls.push(decl);
            }
        }
    }

    pub fn with_decl(mut self, decl: TypeDecl) -> Self {
        self.add_decl(decl);
        self
    }

    /// Look up any name in the package scope
    pub fn lookup(&self, name: &str) -> Option<&TypeDecl> {
        self.index.get(name).map(|&i| &self.decls[i])
    }

    /// Look up a name visible from other packages
    pub fn lookup_exported(&self, name: &str) -> Option<&TypeDecl> {
        if !is_exported(name) {
            return None;
        }
        self.lookup(name)
    }
}

/// Predeclared named types: `error`, `any` and `comparable`.
fn universe() -> Vec<TypeDecl> {
    let error_method = Func::new(
        "Error",
        Receiver::Value,
        Signature::new(vec![], vec![Var::unnamed(TypeExpr::basic("string"))]),
    );
    vec![
        TypeDecl::new(
            "error",
            TypeExpr::Interface(InterfaceType {
                methods: vec![error_method],
                embeds: vec![],
            }),
        ),
        TypeDecl::new("any", TypeExpr::Interface(InterfaceType::default())),
        TypeDecl::new("comparable", TypeExpr::Interface(InterfaceType::default())),
    ]
}

/// The set of packages produced by one load, in load order.
///
/// This is the concrete [`TypeLoader`]: it is built either in code or from a
/// manifest file, and is read-only once constructed.
#[derive(Debug, Clone)]
pub struct PackageSet {
    packages: Vec<Package>,
    universe: Vec<TypeDecl>,
}

impl Default for PackageSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PackageSet {
    pub fn new(packages: Vec<Package>) -> Self {
        Self {
            packages,
            universe: universe(),
        }
    }

    /// Build from manifest text.
    pub fn from_manifest_str(contents: &str, format: ManifestFormat) -> Result<Self> {
        let manifest = Manifest::parse(contents, format)
            .map_err(|message| Error::load("<inline>", message))?;
        Ok(Self::new(manifest.into_packages()?))
    }

    /// Load a manifest file, or the default manifest inside a directory.
    pub fn load(path: &Path) -> Result<Self> {
        let file = resolve_manifest_path(path)?;
        let format = ManifestFormat::from_path(&file).ok_or_else(|| {
            Error::load(&file, "unsupported manifest format (expected .json, .yaml, .yml or .toml)")
        })?;

        let contents = std::fs::read_to_string(&file).with_path(&file)?;
        let manifest =
            Manifest::parse(&contents, format).map_err(|message| Error::load(&file, message))?;
        let packages = manifest.into_packages()?;

        debug!(
            path = %file.display(),
            packages = packages.len(),
            "loaded package manifest"
        );
        Ok(Self::new(packages))
    }
}

fn resolve_manifest_path(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }
    ManifestFormat::DEFAULT_FILE_NAMES
        .iter()
        .map(|name| path.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            Error::load(
                path,
                format!(
                    "no manifest found (looked for {})",
                    ManifestFormat::DEFAULT_FILE_NAMES.join(", ")
                ),
            )
        })
}

impl TypeLoader for PackageSet {
    fn packages(&self) -> &[Package] {
        &self.packages
    }

    fn declaration(&self, name: &TypeName) -> Option<&TypeDecl> {
        match &name.package {
            None => self.universe.iter().find(|d| d.name == name.name),
            Some(pkg) => self
                .packages
                .iter()
                .filter(|p| p.name() == pkg)
                .find_map(|p| p.lookup(&name.name)),
        }
    }
}
