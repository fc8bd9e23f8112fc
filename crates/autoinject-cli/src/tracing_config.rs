//! Tracing configuration.
//!
//! Supports three output formats controlled by `AUTOINJECT_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! # Which files were skipped, parsed and rewritten
//! AUTOINJECT_LOG=debug autoinject -c inject.json -o dist src
//!
//! # Every match and scope push, as a tree
//! AUTOINJECT_LOG=autoinject_core=trace AUTOINJECT_LOG_FORMAT=tree autoinject -c inject.json src/main.js
//! ```
//!
//! The subscriber is only initialised when `AUTOINJECT_LOG` (or `RUST_LOG`)
//! is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("AUTOINJECT_LOG_FORMAT").unwrap_or_default())
    }
}

/// `AUTOINJECT_LOG` takes precedence over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("AUTOINJECT_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber. All output goes to stderr so
/// it never mixes with transformed code printed to stdout.
pub fn init_tracing() {
    let requested = std::env::var("AUTOINJECT_LOG").is_ok() || std::env::var("RUST_LOG").is_ok();
    if !requested {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
