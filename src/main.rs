use anyhow::{Context, Result};
use colored::Colorize;
use wrapgen::cli::{self, Cli};
use wrapgen::config::{self, GenerateConfig};

fn main() {
    let cli = cli::parse_args();
    wrapgen::observability::init_tracing(cli.verbosity);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(2);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let file_config = config::load_config();
    let generate_args: Vec<String> = std::env::args().skip(1).collect();

    let config = GenerateConfig::merge(cli.overrides(), file_config, &cwd, generate_args)?;
    wrapgen::commands::run(&config)
        .with_context(|| format!("generate wrapper for {}", config.type_name))
}
