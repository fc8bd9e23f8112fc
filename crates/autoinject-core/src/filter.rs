//! Include/exclude filtering of file identifiers.
//!
//! Semantics follow the usual bundler plugin filter:
//!
//! - identifiers containing a NUL byte (virtual modules) never match
//! - any exclude match rejects the file
//! - otherwise any include match accepts it, and an empty include list
//!   accepts everything
//!
//! Relative globs are anchored at a base directory; absolute globs and globs
//! starting with `**` are used verbatim. `*` never crosses a `/`.

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;

use crate::config::{FilterPattern, Pattern, normalize_separators};
use crate::error::ConfigError;

#[derive(Debug, Clone)]
enum Matcher {
    Glob(GlobMatcher),
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, id: &str) -> bool {
        match self {
            Matcher::Glob(glob) => glob.is_match(id),
            Matcher::Regex(regex) => regex.is_match(id),
        }
    }
}

/// Compiled include/exclude filter.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Vec<Matcher>,
    exclude: Vec<Matcher>,
    separator: char,
}

impl FileFilter {
    pub fn new(
        include: &FilterPattern,
        exclude: &FilterPattern,
        base_dir: &Path,
        separator: char,
    ) -> Result<Self, ConfigError> {
        let base = normalize_separators(&base_dir.to_string_lossy(), separator).into_owned();
        let compile = |patterns: &FilterPattern| -> Result<Vec<Matcher>, ConfigError> {
            patterns
                .patterns()
                .iter()
                .map(|pattern| compile_pattern(pattern, &base, separator))
                .collect()
        };

        Ok(FileFilter {
            include: compile(include)?,
            exclude: compile(exclude)?,
            separator,
        })
    }

    /// A filter that accepts every identifier without a NUL byte.
    pub fn accept_all() -> Self {
        FileFilter {
            include: Vec::new(),
            exclude: Vec::new(),
            separator: '/',
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        if id.contains('\0') {
            return false;
        }

        let id = normalize_separators(id, self.separator);
        if self.exclude.iter().any(|m| m.is_match(&id)) {
            return false;
        }
        if self.include.iter().any(|m| m.is_match(&id)) {
            return true;
        }
        self.include.is_empty()
    }
}

fn compile_pattern(pattern: &Pattern, base: &str, separator: char) -> Result<Matcher, ConfigError> {
    match pattern {
        Pattern::Glob(glob) => {
            let anchored = anchor_glob(glob, base, separator);
            let matcher = GlobBuilder::new(&anchored)
                .literal_separator(true)
                .build()
                .map_err(|source| ConfigError::InvalidGlob {
                    pattern: glob.clone(),
                    source,
                })?
                .compile_matcher();
            Ok(Matcher::Glob(matcher))
        }
        Pattern::Regex { regex } => {
            let compiled = Regex::new(regex).map_err(|source| ConfigError::InvalidRegex {
                pattern: regex.clone(),
                source,
            })?;
            Ok(Matcher::Regex(compiled))
        }
    }
}

fn anchor_glob(glob: &str, base: &str, separator: char) -> String {
    let glob = normalize_separators(glob, separator);
    if glob.starts_with("**") || is_absolute(&glob) {
        return glob.into_owned();
    }

    let relative: Cow<'_, str> = match glob.strip_prefix("./") {
        Some(rest) => Cow::Owned(rest.to_string()),
        None => glob,
    };
    let base = globset::escape(base.trim_end_matches('/'));
    format!("{base}/{relative}")
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    // Windows drive paths after separator normalization, e.g. `C:/src`
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}
