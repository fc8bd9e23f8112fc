use autoinject_core::InjectWarning;
use colored::Colorize;

use crate::driver::RunSummary;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, warnings: &[InjectWarning]) -> String {
        let mut out = String::new();
        for (index, warning) in warnings.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_warning(warning));
        }
        out
    }

    /// `(!) PARSE_ERROR: failed to parse src/a.js. ...`
    pub fn format_warning(&self, warning: &InjectWarning) -> String {
        let marker = if self.color {
            "(!)".yellow().bold().to_string()
        } else {
            "(!)".to_string()
        };
        let code = if self.color {
            warning.code.as_str().yellow().to_string()
        } else {
            warning.code.as_str().to_string()
        };
        format!("{marker} {code}: {}", warning.message)
    }

    pub fn format_summary(&self, summary: &RunSummary) -> String {
        let files = if summary.scanned == 1 { "file" } else { "files" };
        let transformed = summary.transformed.to_string();
        let transformed = if self.color && summary.transformed > 0 {
            transformed.green().bold().to_string()
        } else {
            transformed
        };

        let mut line = format!(
            "{} {files} scanned, {transformed} transformed, {} unchanged",
            summary.scanned, summary.skipped
        );
        if !summary.warnings.is_empty() {
            let count = summary.warnings.len();
            let noun = if count == 1 { "warning" } else { "warnings" };
            let warnings = format!("{count} {noun}");
            line.push_str(", ");
            if self.color {
                line.push_str(&warnings.yellow().to_string());
            } else {
                line.push_str(&warnings);
            }
        }
        line
    }
}
