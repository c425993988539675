//! Package manifests: the on-disk description of packages a [`PackageSet`]
//! is built from.
//!
//! A manifest lists packages, their named types, and the methods declared
//! on each type. Type expressions are written in Go syntax and parsed with
//! [`super::parse`]. JSON, YAML and TOML encodings share one schema.
//!
//! [`PackageSet`]: super::PackageSet

use super::parse::{parse_param_type, parse_type};
use super::{Field, Func, InterfaceType, Package, Receiver, Signature, TypeDecl, TypeExpr, Var};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Encoding of a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
    Toml,
}

impl ManifestFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// File names probed when a directory is given instead of a file.
    pub const DEFAULT_FILE_NAMES: &'static [&'static str] =
        &["wrapgen.yaml", "wrapgen.yml", "wrapgen.json", "wrapgen.toml"];
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSpec {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Interface,
    Struct,
    Defined,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
    pub name: String,
    pub kind: TypeKind,
    /// Interface members, or methods declared on a struct/defined type.
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
    /// Embedded interfaces (interface kind only).
    #[serde(default)]
    pub embeds: Vec<String>,
    /// Struct fields (struct kind only).
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    /// Underlying type expression (defined kind only).
    #[serde(default)]
    pub underlying: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default)]
    pub receiver: Receiver,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    #[serde(default)]
    pub results: Vec<ParamSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub embedded: bool,
}

impl Manifest {
    /// Decode manifest text in the given format.
    pub fn parse(contents: &str, format: ManifestFormat) -> std::result::Result<Self, String> {
        match format {
            ManifestFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            ManifestFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            ManifestFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        }
    }

    /// Convert into packages, parsing every type expression.
    pub fn into_packages(self) -> Result<Vec<Package>> {
        self.packages.into_iter().map(PackageSpec::into_package).collect()
    }
}

impl PackageSpec {
    fn into_package(self) -> Result<Package> {
        let path = self.path.unwrap_or_else(|| self.name.clone());
        let mut package = Package::new(self.name, path);
        for spec in self.types {
            let decl = spec.into_decl(package.name())?;
            package.add_decl(decl);
        }
        Ok(package)
    }
}

impl TypeSpec {
    fn into_decl(self, package: &str) -> Result<TypeDecl> {
        let methods_of = |specs: Vec<MethodSpec>, receiver: Option<Receiver>| {
            specs
                .into_iter()
                .map(|m| m.into_func(package, receiver))
                .collect::<Result<Vec<_>>>()
        };

        match self.kind {
            TypeKind::Interface => {
                self.reject_extra("interface", !self.fields.is_empty() || self.underlying.is_some())?;
                let embeds = self
                    .embeds
                    .iter()
                    .map(|e| parse_type(e, package))
                    .collect::<Result<Vec<_>>>()?;
                let methods = methods_of(self.methods, Some(Receiver::Value))?;
                Ok(TypeDecl::new(
                    self.name,
                    TypeExpr::Interface(InterfaceType { methods, embeds }),
                ))
            }
            TypeKind::Struct => {
                self.reject_extra("struct", !self.embeds.is_empty() || self.underlying.is_some())?;
                let fields = self
                    .fields
                    .into_iter()
                    .map(|f| f.into_field(package))
                    .collect::<Result<Vec<_>>>()?;
                let methods = methods_of(self.methods, None)?;
                Ok(TypeDecl::new(self.name, TypeExpr::Struct(fields)).with_methods(methods))
            }
            TypeKind::Defined => {
                self.reject_extra("defined", !self.embeds.is_empty() || !self.fields.is_empty())?;
                let underlying = self.underlying.as_deref().ok_or_else(|| {
                    Error::type_syntax(&self.name, "defined type requires `underlying`")
                })?;
                let underlying = parse_type(underlying, package)?;
                let methods = methods_of(self.methods, None)?;
                Ok(TypeDecl::new(self.name, underlying).with_methods(methods))
            }
        }
    }

    fn reject_extra(&self, kind: &str, has_extra: bool) -> Result<()> {
        if has_extra {
            return Err(Error::type_syntax(
                &self.name,
                format!("fields not allowed for a {} type", kind),
            ));
        }
        Ok(())
    }
}

impl MethodSpec {
    /// `receiver` overrides the declared receiver (interface members).
    fn into_func(self, package: &str, receiver: Option<Receiver>) -> Result<Func> {
        let params = self
            .params
            .into_iter()
            .map(|p| p.into_var(package))
            .collect::<Result<Vec<_>>>()?;

        let (last_variadic, earlier_variadic) = match params.split_last() {
            Some(((_, last), rest)) => (*last, rest.iter().any(|(_, v)| *v)),
            None => (false, false),
        };
        if earlier_variadic {
            return Err(Error::type_syntax(
                &self.name,
                "only the final parameter may be variadic",
            ));
        }

        let results = self
            .results
            .into_iter()
            .map(|r| {
                let ty = parse_type(&r.ty, package)?;
                Ok(Var::named(r.name.unwrap_or_default(), ty))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut signature = Signature::new(params.into_iter().map(|(v, _)| v).collect(), results);
        signature.variadic = last_variadic;
        Ok(Func::new(
            self.name,
            receiver.unwrap_or(self.receiver),
            signature,
        ))
    }
}

impl ParamSpec {
    fn into_var(self, package: &str) -> Result<(Var, bool)> {
        let (ty, variadic) = parse_param_type(&self.ty, package)?;
        Ok((Var::named(self.name.unwrap_or_default(), ty), variadic))
    }
}

impl FieldSpec {
    fn into_field(self, package: &str) -> Result<Field> {
        let ty = parse_type(&self.ty, package)?;
        if self.embedded {
            return Ok(Field::embedded(ty));
        }
        let name = self
            .name
            .ok_or_else(|| Error::type_syntax(&self.ty, "non-embedded field requires a name"))?;
        Ok(Field::new(name, ty))
    }
}
