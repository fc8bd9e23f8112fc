//! Import statement synthesis.
//!
//! Every distinct `(keypath, module, export)` triple produces exactly one
//! import statement per file, in first-seen order:
//!
//! ```javascript
//! import { Promise as Promise } from 'es6-promise';
//! import * as $inject_fs from 'node:fs';
//! ```

use indexmap::IndexMap;
use std::borrow::Cow;

use crate::config::{ExportName, Target};
use crate::identifier::make_legal_identifier;
use crate::walker::ReferenceMatch;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ImportKey {
    keypath: String,
    module: String,
    export: ExportName,
}

/// A synthesized import and the local name it binds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingImport {
    pub alias: String,
    pub statement: String,
}

/// Deduplicated imports for one file.
#[derive(Clone, Debug, Default)]
pub struct ImportSet {
    entries: IndexMap<ImportKey, PendingImport>,
}

impl ImportSet {
    pub fn new() -> Self {
        ImportSet::default()
    }

    /// Record the import `reference` needs and return its local alias.
    pub fn record(&mut self, reference: &ReferenceMatch<'_>) -> &str {
        let key = ImportKey {
            keypath: reference.keypath.clone(),
            module: reference.target.module.clone(),
            export: reference.target.export.clone(),
        };
        let pending = self.entries.entry(key).or_insert_with(|| {
            let alias = local_alias(&reference.name, &reference.keypath).into_owned();
            let statement = import_statement(reference.target, &alias);
            PendingImport { alias, statement }
        });
        &pending.alias
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingImport> {
        self.entries.values()
    }

    /// All statements separated by a blank line, followed by one blank line.
    pub fn header(&self) -> String {
        let mut header = String::new();
        for pending in self.entries.values() {
            header.push_str(&pending.statement);
            header.push_str("\n\n");
        }
        header
    }
}

/// The name a reference binds locally.
///
/// A bare name keeps itself; a keypath like `process.env` needs a synthetic
/// alias since `process.env` is not a binding.
pub fn local_alias<'s>(name: &'s str, keypath: &str) -> Cow<'s, str> {
    if name == keypath {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(make_legal_identifier(&format!("$inject_{keypath}")))
    }
}

pub fn import_statement(target: &Target, alias: &str) -> String {
    let module = escape_module_specifier(&target.module);
    match &target.export {
        ExportName::Namespace => format!("import * as {alias} from '{module}';"),
        ExportName::Named(export) => {
            format!("import {{ {export} as {alias} }} from '{module}';")
        }
    }
}

/// Escape `\` and `'` for a single-quoted string literal.
pub fn escape_module_specifier(module: &str) -> Cow<'_, str> {
    if !module.contains(['\\', '\'']) {
        return Cow::Borrowed(module);
    }

    let mut escaped = String::with_capacity(module.len() + 2);
    for ch in module.chars() {
        if ch == '\\' || ch == '\'' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}
