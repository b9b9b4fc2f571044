//! Syntax error type with rustc-style source context.
//!
//! The formatted message carries the line/column location and a caret under
//! the offending position, so callers get a readable diagnostic without
//! re-deriving context from the raw span.

use crate::diagnostic::Diagnostic;
use crate::span::{SourceLocation, Span};

/// A failure to produce a tree from the template source.
///
/// The message is fully formatted at construction time; the span remains the
/// exact offending byte range for programmatic use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    /// Creates a syntax error, rendering `message` with source context.
    pub fn new(source: &str, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: format_with_context(source, &message.into(), span.start),
            span,
        }
    }

    /// Converts the error into the uniform diagnostic record.
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::new(self.message, self.span)
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyntaxError {}

const MAX_LINE_LEN: usize = 80;
const CONTEXT_CHARS: usize = 30;

/// Renders `message` with the offending line and a caret at `position`.
///
/// ```text
/// Parse error: message
///  --> template:2:5
/// 2 | offending line
///   |     ^
/// ```
fn format_with_context(source: &str, message: &str, position: usize) -> String {
    let loc = SourceLocation::from_offset(source, position);
    let mut out = format!("Parse error: {message}\n --> template:{}:{}\n", loc.line, loc.column);

    let lines: Vec<&str> = source.lines().collect();
    let Some(line_content) = lines.get(loc.line - 1) else {
        return out.trim_end().to_string();
    };

    let line_start = source[..position.min(source.len())]
        .rfind('\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    let column = source[line_start..position.min(source.len())].chars().count();

    // Trim leading whitespace for display and shift the caret to match.
    let trimmed = line_content.trim_start();
    let leading = line_content.chars().count() - trimmed.chars().count();
    let trimmed = trimmed.trim_end();
    let mut caret_col = column.saturating_sub(leading);

    // Window long lines around the error position.
    let chars: Vec<char> = trimmed.chars().collect();
    let (display, caret_col) = if chars.len() > MAX_LINE_LEN {
        let start = caret_col.saturating_sub(CONTEXT_CHARS).min(chars.len());
        let end = (caret_col + CONTEXT_CHARS).min(chars.len());
        let prefix = if start > 0 { "..." } else { "" };
        let suffix = if end < chars.len() { "..." } else { "" };
        let snippet: String = chars[start..end].iter().collect();
        caret_col = caret_col.saturating_sub(start) + prefix.chars().count();
        (format!("{prefix}{snippet}{suffix}"), caret_col)
    } else {
        (trimmed.to_string(), caret_col)
    };

    let number = loc.line.to_string();
    out.push_str(&format!("{number} | {display}\n"));
    out.push_str(&format!(
        "{:width$} | {:caret$}^",
        "",
        "",
        width = number.len(),
        caret = caret_col
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_line_and_column() {
        let source = "line one\nline {{two";
        let err = SyntaxError::new(source, "expected `}}`", Span::new(14, 16));
        assert!(err.message.contains("Parse error: expected `}}`"));
        assert!(err.message.contains("template:2:6"));
        assert!(err.message.contains("2 | line {{two"));
    }

    #[test]
    fn caret_points_at_the_offending_column() {
        let source = "abc def";
        let err = SyntaxError::new(source, "boom", Span::new(4, 5));
        let caret_line = err.message.lines().last().unwrap();
        assert_eq!(caret_line, "  |     ^");
    }

    #[test]
    fn long_lines_are_windowed() {
        let source = "x".repeat(200);
        let err = SyntaxError::new(&source, "boom", Span::new(100, 101));
        assert!(err.message.contains("..."), "expected ellipsis:\n{}", err.message);
    }

    #[test]
    fn span_is_preserved_verbatim() {
        let err = SyntaxError::new("abc", "boom", Span::new(1, 2));
        assert_eq!(err.span, Span::new(1, 2));
    }
}
