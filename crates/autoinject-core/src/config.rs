//! Configuration normalization.
//!
//! Options arrive in one of two shapes:
//!
//! ```json
//! { "include": "src/**", "modules": { "Promise": ["es6-promise", "Promise"] } }
//! { "include": "src/**", "Promise": ["es6-promise", "Promise"] }
//! ```
//!
//! Without an explicit `modules` object, every key other than the reserved
//! control keys is a mapping entry. [`InjectConfig::normalize`] performs that
//! split once and produces the strongly typed configuration used by the
//! injector: control options plus a [`KeypathMapping`].

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::path::{MAIN_SEPARATOR, PathBuf};

use crate::error::ConfigError;

/// Keys that control the injector and never become mapping entries.
pub const RESERVED_KEYS: [&str; 4] = ["include", "exclude", "sourceMap", "sourcemap"];

// =============================================================================
// Targets
// =============================================================================

/// The binding an injected import pulls from its module.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExportName {
    /// `import { name as alias } from 'module'`
    Named(String),
    /// `import * as alias from 'module'`
    Namespace,
}

impl ExportName {
    pub fn new(name: &str) -> Self {
        if name == "*" {
            ExportName::Namespace
        } else {
            ExportName::Named(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExportName::Named(name) => name,
            ExportName::Namespace => "*",
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self, ExportName::Namespace)
    }
}

impl fmt::Display for ExportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Module specifier plus exported binding for one keypath.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    pub module: String,
    pub export: ExportName,
}

impl Target {
    pub fn new(module: impl Into<String>, export: &str) -> Self {
        Target {
            module: module.into(),
            export: ExportName::new(export),
        }
    }

    /// A bare module specifier imports the module's default export.
    pub fn default_export(module: impl Into<String>) -> Self {
        Target {
            module: module.into(),
            export: ExportName::Named("default".to_string()),
        }
    }
}

/// Raw mapping value: `"module"` or `["module", "export"]`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ModuleSpec {
    Module(String),
    Export(String, String),
}

impl ModuleSpec {
    pub fn into_target(self) -> Target {
        match self {
            ModuleSpec::Module(module) => Target::default_export(module),
            ModuleSpec::Export(module, export) => Target::new(module, &export),
        }
    }

    fn into_value(self) -> Value {
        match self {
            ModuleSpec::Module(module) => Value::String(module),
            ModuleSpec::Export(module, export) => {
                Value::Array(vec![Value::String(module), Value::String(export)])
            }
        }
    }
}

impl From<&str> for ModuleSpec {
    fn from(module: &str) -> Self {
        ModuleSpec::Module(module.to_string())
    }
}

impl From<(&str, &str)> for ModuleSpec {
    fn from((module, export): (&str, &str)) -> Self {
        ModuleSpec::Export(module.to_string(), export.to_string())
    }
}

// =============================================================================
// Keypath mapping
// =============================================================================

/// Insertion-ordered keypath -> target mapping. Immutable once normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeypathMapping {
    entries: IndexMap<String, Target>,
}

impl KeypathMapping {
    pub fn get(&self, keypath: &str) -> Option<&Target> {
        self.entries.get(keypath)
    }

    pub fn contains(&self, keypath: &str) -> bool {
        self.entries.contains_key(keypath)
    }

    pub fn keypaths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Target)> for KeypathMapping {
    fn from_iter<I: IntoIterator<Item = (String, Target)>>(iter: I) -> Self {
        KeypathMapping {
            entries: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Filter patterns
// =============================================================================

/// A single include/exclude pattern.
///
/// In JSON a plain string is a glob and `{ "regex": "..." }` is a regular
/// expression tested against the normalized file identifier.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    Glob(String),
    Regex { regex: String },
}

impl Pattern {
    pub fn glob(pattern: impl Into<String>) -> Self {
        Pattern::Glob(pattern.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Pattern::Regex {
            regex: pattern.into(),
        }
    }
}

// `Many` first: an untagged struct variant would also accept a one-element array
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Pattern>),
    One(Pattern),
}

/// One pattern or a list of patterns. Empty means "no patterns".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct FilterPattern(Vec<Pattern>);

impl FilterPattern {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        FilterPattern(patterns)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<OneOrMany> for FilterPattern {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(pattern) => FilterPattern(vec![pattern]),
            OneOrMany::Many(patterns) => FilterPattern(patterns),
        }
    }
}

impl From<Pattern> for FilterPattern {
    fn from(pattern: Pattern) -> Self {
        FilterPattern(vec![pattern])
    }
}

// =============================================================================
// Raw options
// =============================================================================

/// Options as supplied by the user, before normalization.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InjectOptions {
    #[serde(default)]
    pub include: Option<FilterPattern>,
    #[serde(default)]
    pub exclude: Option<FilterPattern>,
    #[serde(default, rename = "sourceMap")]
    pub source_map: Option<bool>,
    #[serde(default)]
    pub sourcemap: Option<bool>,
    /// Explicit mapping. When absent, `implicit` is used instead.
    #[serde(default)]
    pub modules: Option<IndexMap<String, Value>>,
    /// Every non-reserved key.
    #[serde(flatten)]
    pub implicit: IndexMap<String, Value>,
}

impl InjectOptions {
    pub fn new() -> Self {
        InjectOptions::default()
    }

    /// Parse options from a JSON value. `None` and `null` are fatal.
    pub fn from_json_value(value: Option<&Value>) -> Result<Self, ConfigError> {
        match value {
            None | Some(Value::Null) => Err(ConfigError::MissingOptions),
            Some(object @ Value::Object(_)) => Ok(serde_json::from_value(object.clone())?),
            Some(other) => Err(ConfigError::NotAnObject {
                found: json_type_name(other),
            }),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(Some(&value))
    }

    /// Add an explicit mapping entry.
    pub fn module(mut self, keypath: impl Into<String>, spec: impl Into<ModuleSpec>) -> Self {
        self.modules
            .get_or_insert_with(IndexMap::new)
            .insert(keypath.into(), spec.into().into_value());
        self
    }

    pub fn include(mut self, pattern: impl Into<FilterPattern>) -> Self {
        self.include = Some(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<FilterPattern>) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    pub fn source_map(mut self, enabled: bool) -> Self {
        self.source_map = Some(enabled);
        self
    }

    /// Source maps stay on unless either spelling of the toggle is `false`.
    pub fn source_maps_enabled(&self) -> bool {
        self.source_map != Some(false) && self.sourcemap != Some(false)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Normalized configuration
// =============================================================================

/// Canonical configuration built once at startup.
#[derive(Clone, Debug)]
pub struct InjectConfig {
    pub include: FilterPattern,
    pub exclude: FilterPattern,
    pub source_map: bool,
    pub modules: KeypathMapping,
    /// Host path separator; module specifiers and file ids use `/` after normalization.
    pub separator: char,
    /// Base directory relative include/exclude globs resolve against (cwd when `None`).
    pub base_dir: Option<PathBuf>,
}

impl InjectConfig {
    pub fn normalize(options: Option<InjectOptions>) -> Result<Self, ConfigError> {
        Self::normalize_with_separator(options, MAIN_SEPARATOR)
    }

    pub fn normalize_with_separator(
        options: Option<InjectOptions>,
        separator: char,
    ) -> Result<Self, ConfigError> {
        let options = options.ok_or(ConfigError::MissingOptions)?;
        let source_map = options.source_maps_enabled();

        let raw = match options.modules {
            Some(explicit) => explicit,
            None => options
                .implicit
                .into_iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                .collect(),
        };

        let mut entries = IndexMap::with_capacity(raw.len());
        for (keypath, value) in raw {
            if keypath.is_empty() {
                return Err(ConfigError::EmptyKeypath);
            }
            let mut target = parse_target(&keypath, value)?;
            if let Cow::Owned(module) = normalize_separators(&target.module, separator) {
                target.module = module;
            }
            entries.insert(keypath, target);
        }

        Ok(InjectConfig {
            include: options.include.unwrap_or_default(),
            exclude: options.exclude.unwrap_or_default(),
            source_map,
            modules: KeypathMapping { entries },
            separator,
            base_dir: None,
        })
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Normalize a file identifier the same way module specifiers were.
    pub fn normalize_id<'s>(&self, id: &'s str) -> Cow<'s, str> {
        normalize_separators(id, self.separator)
    }
}

fn parse_target(keypath: &str, value: Value) -> Result<Target, ConfigError> {
    serde_json::from_value::<ModuleSpec>(value)
        .map(ModuleSpec::into_target)
        .map_err(|_| ConfigError::InvalidTarget {
            keypath: keypath.to_string(),
        })
}

/// Replace `separator` with `/`. Borrowed when nothing changes.
pub fn normalize_separators(path: &str, separator: char) -> Cow<'_, str> {
    if separator == '/' || !path.contains(separator) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(path.replace(separator, "/"))
    }
}
