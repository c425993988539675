//! Configuration for a generation run.
//!
//! Settings come from two places. An optional `.wrapgen.toml` in the
//! working directory or one of its ancestors supplies project defaults.
//! Command-line flags override them. The merged, validated result is a
//! [`GenerateConfig`].

mod loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

pub use loader::{directory_ancestors, load_config, parse_config, CONFIG_FILE_NAME};

/// Contents of a `.wrapgen.toml` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WrapgenConfig {
    /// Default template path
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Default package manifest path
    #[serde(default)]
    pub package: Option<PathBuf>,

    /// Package the generated file belongs to
    #[serde(default)]
    pub target_package: Option<String>,
}

impl WrapgenConfig {
    /// Resolve relative paths against the directory holding the config file.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let anchor = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.template = self.template.map(anchor);
        self.package = self.package.map(anchor);
        self
    }
}

/// Flag values before they are merged with file defaults
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub type_name: String,
    pub template: Option<PathBuf>,
    pub package: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub target_package: Option<String>,
    pub dump_model: bool,
}

/// Everything a generation run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub type_name: String,
    /// Absent only when dumping the model
    pub template_path: Option<PathBuf>,
    pub package_path: PathBuf,
    /// `None` writes to stdout
    pub output_path: Option<PathBuf>,
    pub target_package: String,
    pub dump_model: bool,
    /// Arguments recorded in the `//go:generate` header line
    pub generate_args: Vec<String>,
}

impl GenerateConfig {
    /// Merge flags over file defaults. `cwd` supplies the target package
    /// name when neither source names one.
    pub fn merge(
        overrides: GenerateOverrides,
        file: WrapgenConfig,
        cwd: &Path,
        generate_args: Vec<String>,
    ) -> Result<Self> {
        let package_path = overrides
            .package
            .or(file.package)
            .ok_or_else(|| Error::usage("missing package manifest: pass -p or set `package`"))?;

        let template_path = overrides.template.or(file.template);

        let target_package = match overrides.target_package.or(file.target_package) {
            Some(name) => name,
            None => package_name_from_dir(cwd).ok_or_else(|| {
                Error::usage(format!(
                    "cannot derive a package name from {}; pass --target-package",
                    cwd.display()
                ))
            })?,
        };

        let config = Self {
            type_name: overrides.type_name,
            template_path,
            package_path,
            output_path: overrides.output,
            target_package,
            dump_model: overrides.dump_model,
            generate_args,
        };
        if !config.dump_model {
            config.template()?;
        }
        Ok(config)
    }

    /// The template to render with
    pub fn template(&self) -> Result<&Path> {
        self.template_path
            .as_deref()
            .ok_or_else(|| Error::usage("missing template: pass -t or set `template`"))
    }
}

/// Go package name for a directory: its base name with characters Go
/// identifiers cannot hold replaced by `_`.
pub fn package_name_from_dir(dir: &Path) -> Option<String> {
    let base = dir.file_name()?.to_str()?;
    let name: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match name.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' => Some(name),
        _ => None,
    }
}
