//! Error and warning types.
//!
//! Configuration problems are fatal and surface from [`crate::Injector::new`]
//! before any file is processed. Problems with a single file never abort the
//! host: they are reported as [`InjectWarning`]s and the file passes through
//! unchanged.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Fatal configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing options")]
    MissingOptions,

    #[error("options must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "invalid module for keypath '{keypath}': expected a module specifier string or a [module, export] pair"
    )]
    InvalidTarget { keypath: String },

    #[error("keypaths must not be empty")]
    EmptyKeypath,

    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to resolve the filter base directory: {0}")]
    BaseDir(#[source] std::io::Error),
}

/// Error raised by [`crate::TextPatch`] for an edit it cannot apply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("range {start}..{end} is out of bounds for text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("cannot overwrite an empty range at {start}")]
    EmptyRange { start: usize },

    #[error("range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },

    #[error("range {start}..{end} overlaps an existing edit at {other_start}..{other_end}")]
    Overlap {
        start: usize,
        end: usize,
        other_start: usize,
        other_end: usize,
    },
}

/// Warning codes reported to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    ParseError,
    PatchError,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::ParseError => "PARSE_ERROR",
            WarningCode::PatchError => "PATCH_ERROR",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable per-file problem. The file it names was left unmodified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InjectWarning {
    pub code: WarningCode,
    /// Normalized identifier of the file the warning is about
    pub id: String,
    pub message: String,
}

impl InjectWarning {
    pub fn parse_error(id: &str) -> Self {
        InjectWarning {
            code: WarningCode::ParseError,
            id: id.to_string(),
            message: format!(
                "failed to parse {id}. Consider restricting the plugin to particular files via options.include"
            ),
        }
    }

    pub fn patch_error(id: &str, error: &PatchError) -> Self {
        InjectWarning {
            code: WarningCode::PatchError,
            id: id.to_string(),
            message: format!("failed to rewrite {id}: {error}"),
        }
    }
}

impl fmt::Display for InjectWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
