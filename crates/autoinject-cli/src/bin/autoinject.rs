#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use autoinject_cli::args::CliArgs;
use autoinject_cli::{driver, reporter::Reporter};

fn resolve_cwd(requested: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(match requested {
        Some(dir) => current.join(dir),
        None => current,
    })
}

fn main() -> Result<()> {
    // Only when AUTOINJECT_LOG or RUST_LOG is set; AUTOINJECT_LOG_FORMAT=tree|json|text
    autoinject_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = resolve_cwd(args.cwd.as_deref())?;

    let stdout = std::io::stdout();
    let summary = driver::run(&args, &cwd, &mut stdout.lock())?;

    let reporter = Reporter::new(std::io::stderr().is_terminal());
    if !summary.warnings.is_empty() {
        eprintln!("{}", reporter.render(&summary.warnings));
    }
    eprintln!("{}", reporter.format_summary(&summary));
    Ok(())
}
