//! Output accumulation for the single emission pass.
//!
//! The buffer owns the generated text, the indentation level, and the
//! ordered source→generated span records. Records are opened when a
//! statement begins emitting and closed when it finishes, so the map is
//! built incrementally during the walk rather than reconstructed afterward.

use serde::Serialize;

use crate::span::Span;

use super::INDENT;

/// One source-span → generated-span record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    /// Byte range in the template source.
    pub source: Span,
    /// Byte range in the generated code.
    pub generated: Span,
}

/// The growing generated-code buffer.
#[derive(Debug)]
pub struct OutputBuffer {
    out: String,
    level: usize,
    mappings: Vec<Mapping>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            level: 0,
            mappings: Vec::new(),
        }
    }

    /// Current indentation depth.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Writes one indented line. Embedded newlines in `text` are written
    /// as-is; multi-line expression text carries its own padding.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Writes text verbatim, without indentation or a newline.
    pub fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Opens a mapping record anchored at the current output position.
    pub fn begin_mapping(&mut self, source: Span) -> usize {
        self.mappings.push(Mapping {
            source,
            generated: Span::empty(self.out.len()),
        });
        self.mappings.len() - 1
    }

    /// Closes the record opened by [`OutputBuffer::begin_mapping`]. A record
    /// that covered no output (the statement was skipped) is discarded.
    pub fn finish_mapping(&mut self, index: usize) {
        let mut end = self.out.len();
        if end > 0 && self.out.ends_with('\n') {
            end -= 1;
        }
        let start = self.mappings[index].generated.start;
        if end <= start {
            if index == self.mappings.len() - 1 {
                self.mappings.pop();
            }
            return;
        }
        self.mappings[index].generated.end = end;
    }

    /// Consumes the buffer, yielding the code and the mapping list.
    pub fn finish(self) -> (String, Vec<Mapping>) {
        (self.out, self.mappings)
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
