//! Minimal-diff text patching.
//!
//! A [`TextPatch`] is the original text plus a prepended header and an
//! ordered list of non-overlapping overwrites. Nothing is applied until
//! [`TextPatch::to_code`] or [`TextPatch::generate_map`], each of which makes
//! a single pass over the original text.

use std::fmt;

use crate::error::PatchError;
use crate::source_map::{LineColumn, SourceMap, SourceMapGenerator};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    content: String,
    /// Record the overwritten text in the map's `names`
    store_name: bool,
}

/// Options for [`TextPatch::generate_map`].
#[derive(Clone, Debug, Default)]
pub struct MapOptions {
    /// Entry for the map's `sources` list
    pub source: String,
    /// Generated file name, if known
    pub file: Option<String>,
    /// Embed the original text as `sourcesContent`
    pub include_content: bool,
}

#[derive(Clone, Debug)]
pub struct TextPatch<'s> {
    original: &'s str,
    intro: String,
    edits: Vec<Edit>,
}

impl<'s> TextPatch<'s> {
    pub fn new(original: &'s str) -> Self {
        TextPatch {
            original,
            intro: String::new(),
            edits: Vec::new(),
        }
    }

    pub fn original(&self) -> &'s str {
        self.original
    }

    /// Insert `text` before everything prepended so far.
    pub fn prepend(&mut self, text: &str) {
        self.intro.insert_str(0, text);
    }

    /// Replace `start..end` of the original text with `content`.
    pub fn overwrite(
        &mut self,
        start: usize,
        end: usize,
        content: &str,
        store_name: bool,
    ) -> Result<(), PatchError> {
        let len = self.original.len();
        if end > len || start > end {
            return Err(PatchError::OutOfBounds { start, end, len });
        }
        if start == end {
            return Err(PatchError::EmptyRange { start });
        }
        if !self.original.is_char_boundary(start) || !self.original.is_char_boundary(end) {
            return Err(PatchError::NotCharBoundary { start, end });
        }

        // edits stay sorted by start; a new edit may only touch neighbours
        let index = self.edits.partition_point(|edit| edit.start < start);
        let before = index.checked_sub(1).and_then(|i| self.edits.get(i));
        let after = self.edits.get(index);
        for other in before.into_iter().chain(after) {
            if start < other.end && other.start < end {
                return Err(PatchError::Overlap {
                    start,
                    end,
                    other_start: other.start,
                    other_end: other.end,
                });
            }
        }

        self.edits.insert(
            index,
            Edit {
                start,
                end,
                content: content.to_string(),
                store_name,
            },
        );
        Ok(())
    }

    pub fn has_changes(&self) -> bool {
        !self.intro.is_empty() || !self.edits.is_empty()
    }

    pub fn to_code(&self) -> String {
        let extra: usize = self.edits.iter().map(|edit| edit.content.len()).sum();
        let mut out = String::with_capacity(self.intro.len() + self.original.len() + extra);
        out.push_str(&self.intro);

        let mut pos = 0;
        for edit in &self.edits {
            out.push_str(&self.original[pos..edit.start]);
            out.push_str(&edit.content);
            pos = edit.end;
        }
        out.push_str(&self.original[pos..]);
        out
    }

    /// Map every generated character back to the original text.
    ///
    /// Unchanged text is mapped character by character; each overwrite gets
    /// one segment at its start. The prepended header has no mappings.
    pub fn generate_map(&self, options: &MapOptions) -> SourceMap {
        let mut generator = SourceMapGenerator::new(options.file.clone());
        let content = options.include_content.then(|| self.original.to_string());
        let source = generator.add_source(options.source.clone(), content);

        let mut generated = LineColumn::default();
        generated.advance_str(&self.intro);
        let mut original = LineColumn::default();

        let mut pos = 0;
        for edit in &self.edits {
            map_unchanged(
                &mut generator,
                source,
                &self.original[pos..edit.start],
                &mut generated,
                &mut original,
            );

            let replaced = &self.original[edit.start..edit.end];
            let name = edit.store_name.then(|| generator.add_name(replaced));
            generator.add_mapping(generated, source, original, name);
            generated.advance_str(&edit.content);
            original.advance_str(replaced);
            pos = edit.end;
        }
        map_unchanged(
            &mut generator,
            source,
            &self.original[pos..],
            &mut generated,
            &mut original,
        );

        generator.finish()
    }
}

impl fmt::Display for TextPatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code())
    }
}

fn map_unchanged(
    generator: &mut SourceMapGenerator,
    source: u32,
    text: &str,
    generated: &mut LineColumn,
    original: &mut LineColumn,
) {
    for ch in text.chars() {
        if ch != '\n' {
            generator.add_mapping(*generated, source, *original, None);
        }
        generated.advance_char(ch);
        original.advance_char(ch);
    }
}
