use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the autoinject binary.
#[derive(Parser, Debug)]
#[command(
    name = "autoinject",
    version,
    about = "Inject module imports for free references to configured globals"
)]
pub struct CliArgs {
    /// JSON options file, e.g. `{ "Promise": ["es6-promise", "Promise"] }`.
    #[arg(short = 'c', long)]
    pub config: PathBuf,

    /// Write every input here, at its path relative to the working directory.
    /// Without it exactly one input file is allowed and the result goes to stdout.
    #[arg(short = 'o', long = "out-dir", alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// Working directory for relative inputs and include/exclude globs.
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Never write source maps, whatever the options file says.
    #[arg(long = "no-source-map", alias = "noSourceMap")]
    pub no_source_map: bool,

    /// Number of worker threads (defaults to one per CPU).
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Files or directories to transform. Directories are searched recursively.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}
