//! Batch driver: load options, collect inputs, transform in parallel, write
//! outputs.

use anyhow::{Context, Result, bail};
use autoinject_core::{InjectConfig, InjectOptions, InjectWarning, Injector, TransformOutput};
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::args::CliArgs;

/// Extensions picked up when a directory is given as input.
pub const SOURCE_EXTENSIONS: [&str; 8] = ["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

#[derive(Debug, Default)]
pub struct RunSummary {
    pub scanned: usize,
    pub transformed: usize,
    pub skipped: usize,
    pub warnings: Vec<InjectWarning>,
    /// Files written under the output directory, maps included
    pub written: Vec<PathBuf>,
}

struct FileResult {
    path: PathBuf,
    source: String,
    output: Option<TransformOutput>,
    warnings: Vec<InjectWarning>,
}

impl FileResult {
    fn changed(&self) -> bool {
        self.output.as_ref().is_some_and(|output| output.changed)
    }
}

struct OutputFile {
    path: PathBuf,
    contents: String,
}

/// Read the options file and build the injector, with globs anchored at `cwd`.
pub fn build_injector(args: &CliArgs, cwd: &Path) -> Result<Injector> {
    let config_path = cwd.join(&args.config);
    let text = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read options file {}", config_path.display()))?;
    let mut options = InjectOptions::from_json_str(&text)
        .with_context(|| format!("invalid options in {}", config_path.display()))?;
    if args.no_source_map {
        options = options.source_map(false);
    }

    let config = InjectConfig::normalize(Some(options))?.with_base_dir(cwd);
    debug!(
        keypaths = config.modules.len(),
        source_map = config.source_map,
        "loaded options"
    );
    Ok(Injector::from_config(config)?)
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Expand `paths` into a sorted, deduplicated list of input files.
///
/// Files named explicitly are always included; directories contribute their
/// source files, skipping `node_modules`.
pub fn collect_inputs(cwd: &Path, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        let resolved = cwd.join(path);
        if resolved.is_file() {
            inputs.push(resolved);
        } else if resolved.is_dir() {
            let walker = WalkDir::new(&resolved)
                .follow_links(true)
                .into_iter()
                .filter_entry(|entry| entry.file_name() != "node_modules");
            for entry in walker {
                let entry = entry.with_context(|| format!("failed to walk {}", resolved.display()))?;
                if entry.file_type().is_file() && is_source_file(entry.path()) {
                    inputs.push(entry.into_path());
                }
            }
        } else {
            bail!("input path does not exist: {}", resolved.display());
        }
    }

    inputs.sort();
    inputs.dedup();
    Ok(inputs)
}

/// Output location of `input`: its path relative to `cwd`, under `out_dir`.
/// Inputs outside `cwd` keep only their file name.
pub fn output_path(cwd: &Path, out_dir: &Path, input: &Path) -> PathBuf {
    let relative = match input.strip_prefix(cwd) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => input.file_name().map(PathBuf::from).unwrap_or_default(),
    };
    out_dir.join(relative)
}

fn append_source_mapping_url(contents: &mut String, map_name: &str) {
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str("//# sourceMappingURL=");
    contents.push_str(map_name);
    contents.push('\n');
}

fn transform_file(injector: &Injector, path: &Path) -> Result<FileResult> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let id = path.to_string_lossy();
    let mut warnings = Vec::new();
    let output = injector.transform(&source, &id, &mut warnings);
    Ok(FileResult {
        path: path.to_path_buf(),
        source,
        output,
        warnings,
    })
}

fn planned_outputs(result: FileResult, cwd: &Path, out_dir: &Path) -> Result<Vec<OutputFile>> {
    let path = output_path(cwd, out_dir, &result.path);
    let changed = result.changed();
    let Some(output) = result.output.filter(|_| changed) else {
        return Ok(vec![OutputFile {
            path,
            contents: result.source,
        }]);
    };

    let mut contents = output.code;
    let mut files = Vec::with_capacity(2);
    if let Some(mut map) = output.map {
        let output_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let map_name = format!("{output_name}.map");
        map.file = Some(output_name);
        append_source_mapping_url(&mut contents, &map_name);
        files.push(OutputFile {
            path: path.with_file_name(&map_name),
            contents: map.to_json().context("failed to serialize source map")?,
        });
    }
    files.insert(0, OutputFile { path, contents });
    Ok(files)
}

fn write_outputs(outputs: &[OutputFile]) -> Result<Vec<PathBuf>> {
    outputs.par_iter().try_for_each(|output| -> Result<()> {
        if let Some(parent) = output.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&output.path, &output.contents)
            .with_context(|| format!("failed to write {}", output.path.display()))?;
        Ok(())
    })?;

    Ok(outputs.iter().map(|output| output.path.clone()).collect())
}

/// Run one batch. Transformed code goes to `stdout` when no output
/// directory is given.
pub fn run(args: &CliArgs, cwd: &Path, stdout: &mut impl Write) -> Result<RunSummary> {
    let injector = build_injector(args, cwd)?;
    let inputs = collect_inputs(cwd, &args.paths)?;
    if args.out_dir.is_none() && inputs.len() != 1 {
        bail!(
            "without --out-dir exactly one input file is allowed, found {}",
            inputs.len()
        );
    }

    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = args.jobs {
            builder = builder.num_threads(jobs);
        }
        builder.build().context("failed to start worker threads")?
    };
    let results = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| transform_file(&injector, path))
            .collect::<Result<Vec<_>>>()
    })?;

    let mut summary = RunSummary {
        scanned: results.len(),
        ..RunSummary::default()
    };
    for result in &results {
        if result.changed() {
            summary.transformed += 1;
        } else {
            summary.skipped += 1;
        }
        summary.warnings.extend(result.warnings.iter().cloned());
    }

    match &args.out_dir {
        Some(out_dir) => {
            let out_dir = cwd.join(out_dir);
            let mut outputs = Vec::with_capacity(results.len());
            for result in results {
                outputs.extend(planned_outputs(result, cwd, &out_dir)?);
            }
            summary.written = pool.install(|| write_outputs(&outputs))?;
        }
        None => {
            for result in results {
                let code = match result.output {
                    Some(output) if output.changed => output.code,
                    _ => result.source,
                };
                stdout
                    .write_all(code.as_bytes())
                    .context("failed to write to stdout")?;
            }
            stdout.flush().context("failed to write to stdout")?;
        }
    }

    info!(
        scanned = summary.scanned,
        transformed = summary.transformed,
        skipped = summary.skipped,
        "run complete"
    );
    Ok(summary)
}
