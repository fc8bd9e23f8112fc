//! Source Map v3 generation.
//!
//! Mappings are accumulated in generated order and encoded incrementally as
//! base64 VLQ segments: `generated column, source index, original line,
//! original column[, name index]`, each relative to the previous segment.
//! Lines are separated by `;`, segments by `,`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Base64 VLQ encoding used by the `mappings` field.
pub mod vlq {
    const BASE64_CHARS: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    const VLQ_BASE_SHIFT: u32 = 5;
    const VLQ_BASE: i64 = 1 << VLQ_BASE_SHIFT;
    const VLQ_BASE_MASK: i64 = VLQ_BASE - 1;
    const VLQ_CONTINUATION_BIT: i64 = VLQ_BASE;

    pub fn encode(value: i64) -> String {
        let mut out = String::new();
        encode_into(value, &mut out);
        out
    }

    pub fn encode_into(value: i64, out: &mut String) {
        // sign lives in the least significant bit
        let mut vlq = if value < 0 {
            ((-value) << 1) | 1
        } else {
            value << 1
        };

        loop {
            let mut digit = vlq & VLQ_BASE_MASK;
            vlq >>= VLQ_BASE_SHIFT;
            if vlq > 0 {
                digit |= VLQ_CONTINUATION_BIT;
            }
            out.push(BASE64_CHARS[digit as usize] as char);
            if vlq == 0 {
                break;
            }
        }
    }

    /// Decode one value from the front of `input`.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn decode(input: &str) -> Option<(i64, usize)> {
        let mut result: i64 = 0;
        let mut shift = 0u32;

        for (index, byte) in input.bytes().enumerate() {
            let digit = base64_value(byte)? as i64;
            result += (digit & VLQ_BASE_MASK) << shift;
            if digit & VLQ_CONTINUATION_BIT == 0 {
                let negative = result & 1 == 1;
                let magnitude = result >> 1;
                let value = if negative { -magnitude } else { magnitude };
                return Some((value, index + 1));
            }
            shift += VLQ_BASE_SHIFT;
            if shift > 60 {
                return None;
            }
        }
        None
    }

    fn base64_value(byte: u8) -> Option<u8> {
        match byte {
            b'A'..=b'Z' => Some(byte - b'A'),
            b'a'..=b'z' => Some(byte - b'a' + 26),
            b'0'..=b'9' => Some(byte - b'0' + 52),
            b'+' => Some(62),
            b'/' => Some(63),
            _ => None,
        }
    }
}

/// Zero-based line and UTF-16 column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

impl LineColumn {
    pub fn new(line: u32, column: u32) -> Self {
        LineColumn { line, column }
    }

    pub fn advance_char(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += ch.len_utf16() as u32;
        }
    }

    pub fn advance_str(&mut self, text: &str) {
        let newlines = memchr::memchr_iter(b'\n', text.as_bytes()).count();
        let tail = match memchr::memrchr(b'\n', text.as_bytes()) {
            Some(last) => {
                self.line += newlines as u32;
                self.column = 0;
                &text[last + 1..]
            }
            None => text,
        };
        self.column += tail.encode_utf16().count() as u32;
    }
}

/// A serialized source map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_content: Vec<Option<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Incremental source map builder.
///
/// Mappings must be added in generated order (line, then column).
#[derive(Debug, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    name_indices: FxHashMap<String, u32>,
    mappings: String,

    generated_line: u32,
    line_has_segment: bool,
    prev_generated_column: i64,
    prev_source: i64,
    prev_original_line: i64,
    prev_original_column: i64,
    prev_name: i64,
}

impl SourceMapGenerator {
    pub fn new(file: Option<String>) -> Self {
        SourceMapGenerator {
            file,
            ..SourceMapGenerator::default()
        }
    }

    pub fn add_source(&mut self, source: impl Into<String>, content: Option<String>) -> u32 {
        self.sources.push(source.into());
        self.sources_content.push(content);
        (self.sources.len() - 1) as u32
    }

    pub fn add_name(&mut self, name: &str) -> u32 {
        if let Some(&index) = self.name_indices.get(name) {
            return index;
        }
        let index = self.names.len() as u32;
        self.names.push(name.to_string());
        self.name_indices.insert(name.to_string(), index);
        index
    }

    pub fn add_mapping(
        &mut self,
        generated: LineColumn,
        source: u32,
        original: LineColumn,
        name: Option<u32>,
    ) {
        debug_assert!(
            generated.line >= self.generated_line,
            "mappings must be added in generated order"
        );

        while self.generated_line < generated.line {
            self.mappings.push(';');
            self.generated_line += 1;
            self.prev_generated_column = 0;
            self.line_has_segment = false;
        }

        if self.line_has_segment {
            self.mappings.push(',');
        }
        self.line_has_segment = true;

        let column = generated.column as i64;
        vlq::encode_into(column - self.prev_generated_column, &mut self.mappings);
        self.prev_generated_column = column;

        let source = source as i64;
        vlq::encode_into(source - self.prev_source, &mut self.mappings);
        self.prev_source = source;

        let line = original.line as i64;
        vlq::encode_into(line - self.prev_original_line, &mut self.mappings);
        self.prev_original_line = line;

        let column = original.column as i64;
        vlq::encode_into(column - self.prev_original_column, &mut self.mappings);
        self.prev_original_column = column;

        if let Some(name) = name {
            let name = name as i64;
            vlq::encode_into(name - self.prev_name, &mut self.mappings);
            self.prev_name = name;
        }
    }

    pub fn finish(self) -> SourceMap {
        let has_content = self.sources_content.iter().any(Option::is_some);
        SourceMap {
            version: 3,
            file: self.file,
            sources: self.sources,
            sources_content: if has_content {
                self.sources_content
            } else {
                Vec::new()
            },
            names: self.names,
            mappings: self.mappings,
        }
    }
}
