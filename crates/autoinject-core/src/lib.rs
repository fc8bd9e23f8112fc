//! Import injection for free global references.
//!
//! Given a mapping from identifier names or dotted keypaths (`Promise`,
//! `process.env`) to module specifiers, this crate finds free references to
//! those names in JavaScript/TypeScript source text and injects the matching
//! `import` statements:
//!
//! ```text
//! { "process.env": ["my-env", "default"] }
//!
//! console.log(process.env)
//! ```
//!
//! Becomes:
//!
//! ```text
//! import { default as $inject_process_env } from 'my-env';
//!
//! console.log($inject_process_env)
//! ```
//!
//! Pipeline per file: filter -> prefilter -> parse -> reference walk ->
//! import synthesis -> patch (+ source map).

// Configuration - raw options, keypath mapping, normalization
pub mod config;
pub use config::{
    ExportName, FilterPattern, InjectConfig, InjectOptions, KeypathMapping, ModuleSpec, Pattern,
    Target,
};

// Errors and warnings
pub mod error;
pub use error::{ConfigError, InjectWarning, PatchError};

// Include/exclude file filter
pub mod filter;
pub use filter::FileFilter;

// Textual candidate prefilter
pub mod prefilter;
pub use prefilter::Prefilter;

// Legal identifier generation
pub mod identifier;
pub use identifier::make_legal_identifier;

// Lexical scope tracking
pub mod scope;
pub use scope::{Scope, ScopeChain};

// Scope-aware reference walker
pub mod walker;
pub use walker::{ReferenceMatch, ReferenceWalker};

// Import statement synthesis
pub mod imports;
pub use imports::ImportSet;

// Source map generation (Source Map v3, base64 VLQ)
pub mod source_map;
pub use source_map::{SourceMap, SourceMapGenerator};

// Text patching with source map output
pub mod patch;
pub use patch::{MapOptions, TextPatch};

// Per-file transform entry point
pub mod injector;
pub use injector::{Injector, TransformHost, TransformOutput};

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod filter_tests;
#[cfg(test)]
#[path = "tests/identifier_tests.rs"]
mod identifier_tests;
#[cfg(test)]
#[path = "tests/patch_tests.rs"]
mod patch_tests;
#[cfg(test)]
#[path = "tests/prefilter_tests.rs"]
mod prefilter_tests;
#[cfg(test)]
#[path = "tests/scope_tests.rs"]
mod scope_tests;
#[cfg(test)]
#[path = "tests/walker_tests.rs"]
mod walker_tests;
