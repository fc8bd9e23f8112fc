//! Per-file transform.
//!
//! [`Injector`] is built once from the options and shared by every file it
//! processes; it is immutable and `Send + Sync`, so hosts may call
//! [`Injector::transform`] from as many threads as they like.

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::{InjectConfig, InjectOptions};
use crate::error::{ConfigError, InjectWarning};
use crate::filter::FileFilter;
use crate::imports::ImportSet;
use crate::patch::{MapOptions, TextPatch};
use crate::prefilter::Prefilter;
use crate::source_map::SourceMap;
use crate::walker::ReferenceWalker;

/// Receives recoverable per-file problems.
pub trait TransformHost {
    fn warn(&mut self, warning: InjectWarning);
}

impl TransformHost for Vec<InjectWarning> {
    fn warn(&mut self, warning: InjectWarning) {
        self.push(warning);
    }
}

/// Result of transforming one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// Present when source maps are enabled
    pub map: Option<SourceMap>,
    /// False when the file was parsed but nothing needed injecting
    pub changed: bool,
}

#[derive(Debug)]
pub struct Injector {
    config: InjectConfig,
    filter: FileFilter,
    prefilter: Prefilter,
}

impl Injector {
    pub fn new(options: InjectOptions) -> Result<Self, ConfigError> {
        Self::from_config(InjectConfig::normalize(Some(options))?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::new(InjectOptions::from_json_str(text)?)
    }

    pub fn from_config(config: InjectConfig) -> Result<Self, ConfigError> {
        let base_dir = match &config.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(ConfigError::BaseDir)?,
        };
        let filter = FileFilter::new(&config.include, &config.exclude, &base_dir, config.separator)?;
        let prefilter = Prefilter::new(config.modules.keypaths()).map_err(|source| {
            ConfigError::InvalidRegex {
                pattern: config.modules.keypaths().collect::<Vec<_>>().join("|"),
                source,
            }
        })?;

        debug!(
            keypaths = config.modules.len(),
            source_map = config.source_map,
            base_dir = %base_dir.display(),
            "injector ready"
        );
        Ok(Injector {
            config: InjectConfig {
                base_dir: Some(base_dir),
                ..config
            },
            filter,
            prefilter,
        })
    }

    pub fn config(&self) -> &InjectConfig {
        &self.config
    }

    pub fn base_dir(&self) -> Option<&PathBuf> {
        self.config.base_dir.as_ref()
    }

    /// Cheap checks only: the include/exclude filter and the textual prefilter.
    pub fn should_transform(&self, code: &str, id: &str) -> bool {
        self.filter.matches(id) && self.prefilter.matches(code)
    }

    /// Inject imports for the free references in `code`.
    ///
    /// Returns `None` when the file is filtered out, cannot contain a
    /// reference, or cannot be processed (a warning is sent to `host` in the
    /// last case). Otherwise returns the output text, which equals `code`
    /// when nothing matched.
    pub fn transform(
        &self,
        code: &str,
        id: &str,
        host: &mut impl TransformHost,
    ) -> Option<TransformOutput> {
        if !self.filter.matches(id) {
            debug!(id, "excluded by filter");
            return None;
        }
        if !self.prefilter.matches(code) {
            debug!(id, "no keypath in text, skipping parse");
            return None;
        }

        let id = self.config.normalize_id(id);
        let allocator = Allocator::default();
        let source_type = SourceType::from_path(id.as_ref()).unwrap_or_else(|_| SourceType::mjs());
        let parsed = Parser::new(&allocator, code, source_type).parse();
        if parsed.panicked || !parsed.errors.is_empty() {
            warn!(id = %id, errors = parsed.errors.len(), "parse failed");
            host.warn(InjectWarning::parse_error(&id));
            return None;
        }

        let matches = ReferenceWalker::new(&self.config.modules, &id).walk(&parsed.program);
        let mut patch = TextPatch::new(code);
        if matches.is_empty() {
            debug!(id = %id, "no free references");
            return Some(TransformOutput {
                code: code.to_string(),
                map: self.map_for(&patch, &id),
                changed: false,
            });
        }

        let mut imports = ImportSet::new();
        for reference in &matches {
            let alias = imports.record(reference);
            if !reference.needs_rewrite() {
                continue;
            }
            let (start, end) = (reference.span.start as usize, reference.span.end as usize);
            if let Err(error) = patch.overwrite(start, end, alias, true) {
                warn!(id = %id, %error, "rewrite failed");
                host.warn(InjectWarning::patch_error(&id, &error));
                return None;
            }
        }
        patch.prepend(&imports.header());

        debug!(
            id = %id,
            references = matches.len(),
            imports = imports.len(),
            "injected imports"
        );
        Some(TransformOutput {
            code: patch.to_code(),
            map: self.map_for(&patch, &id),
            changed: true,
        })
    }

    fn map_for(&self, patch: &TextPatch<'_>, id: &str) -> Option<SourceMap> {
        self.config.source_map.then(|| {
            patch.generate_map(&MapOptions {
                source: id.to_string(),
                file: None,
                include_content: true,
            })
        })
    }
}
