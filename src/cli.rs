use clap::Parser;
use std::path::PathBuf;

use crate::config::GenerateOverrides;

#[derive(Parser, Debug)]
#[command(name = "wrapgen")]
#[command(about = "Generate wrappers for Go types from templates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Template used to render the wrapper
    #[arg(short = 't', long = "template", env = "WRAPGEN_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Package manifest (JSON, YAML or TOML) describing the loaded packages
    #[arg(short = 'p', long = "package", env = "WRAPGEN_PACKAGE")]
    pub package: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Package name of the generated file (defaults to the current directory name)
    #[arg(long = "target-package")]
    pub target_package: Option<String>,

    /// Print the resolved model as JSON instead of rendering a template
    #[arg(long = "dump-model")]
    pub dump_model: bool,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Name of the interface or type to wrap
    #[arg(value_name = "TYPE")]
    pub type_name: String,
}

impl Cli {
    pub fn overrides(&self) -> GenerateOverrides {
        GenerateOverrides {
            type_name: self.type_name.clone(),
            template: self.template.clone(),
            package: self.package.clone(),
            output: self.output.clone(),
            target_package: self.target_package.clone(),
            dump_model: self.dump_model,
        }
    }
}

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags() {
        let cli = Cli::try_parse_from([
            "wrapgen", "-t", "log.tmpl", "-p", "pkgs.yaml", "-o", "out.go", "-vv", "Store",
        ])
        .unwrap();
        assert_eq!(cli.type_name, "Store");
        assert_eq!(cli.verbosity, 2);
        let overrides = cli.overrides();
        assert_eq!(overrides.template, Some(PathBuf::from("log.tmpl")));
        assert_eq!(overrides.output, Some(PathBuf::from("out.go")));
        assert!(!overrides.dump_model);
    }

    #[test]
    fn test_requires_exactly_one_type() {
        assert!(Cli::try_parse_from(["wrapgen", "-p", "x.yaml"]).is_err());
        assert!(Cli::try_parse_from(["wrapgen", "-p", "x.yaml", "A", "B"]).is_err());
    }
}
