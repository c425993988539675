//! The generate command: load packages, resolve the requested type, render
//! it and write the result.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info, info_span};

use crate::config::GenerateConfig;
use crate::errors::{IoResultExt, Result};
use crate::render::{Renderer, TemplateRenderer};
use crate::types::PackageSet;
use crate::wrap::{resolve, WrappedType};

/// Run a full generation as described by `config`.
pub fn run(config: &GenerateConfig) -> Result<()> {
    let _span = info_span!("generate", type_name = %config.type_name).entered();

    let packages = PackageSet::load(&config.package_path)?;
    let wrapped = resolve(&config.type_name, &packages, &config.target_package)?;
    info!(
        source_package = %wrapped.source_package,
        methods = wrapped.methods.len(),
        "resolved {}",
        wrapped.name
    );

    let output = if config.dump_model {
        dump_model(&wrapped)?
    } else {
        let renderer = load_template(config.template()?)?;
        generate(
            &renderer,
            &wrapped,
            &config.target_package,
            &config.generate_args,
        )?
    };

    write_output(config.output_path.as_deref(), &output)
}

/// Parse the template at `path`
pub fn load_template(path: &Path) -> Result<TemplateRenderer> {
    let source = fs::read_to_string(path).with_path(path)?;
    debug!("Loaded template from {}", path.display());
    TemplateRenderer::parse(&source)
}

/// Render `wrapped` and put the package clause and `go:generate` line on top.
pub fn generate<R: Renderer + ?Sized>(
    renderer: &R,
    wrapped: &WrappedType,
    target_package: &str,
    generate_args: &[String],
) -> Result<String> {
    let body = renderer.render(wrapped)?;
    Ok(format!(
        "{}{}",
        file_header(target_package, generate_args),
        body
    ))
}

/// The lines every generated file starts with
pub fn file_header(target_package: &str, generate_args: &[String]) -> String {
    format!(
        "package {}\n\n//go:generate wrapgen {}\n\n",
        target_package,
        generate_args.join(" ")
    )
}

pub fn dump_model(wrapped: &WrappedType) -> Result<String> {
    let mut json = serde_json::to_string_pretty(wrapped)?;
    json.push('\n');
    Ok(json)
}

fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_path(path)?;
            info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(output.as_bytes()).with_path("<stdout>")?;
            lock.flush().with_path("<stdout>")?;
        }
    }
    Ok(())
}
