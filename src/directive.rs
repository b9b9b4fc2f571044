//! Inline directives recognized from comment syntax.
//!
//! A comment whose trimmed text starts with `@weft-` names a directive. The
//! two recognized markers suppress or assert a type error within a bounded
//! area of the template; anything else spelled like a marker is reported as
//! an unknown directive and produces no record.

use serde::Serialize;

use crate::span::Span;

/// The marker prefix shared by all directives.
const MARKER_PREFIX: &str = "@weft-";

/// What a directive instructs the downstream checker to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveKind {
    /// `@weft-suppress`: ignore any diagnostic inside the area of effect.
    Suppress,
    /// `@weft-assert-error`: require a diagnostic inside the area of effect.
    AssertError,
}

impl DirectiveKind {
    /// The comment marker that introduces this directive.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Suppress => "@weft-suppress",
            Self::AssertError => "@weft-assert-error",
        }
    }
}

/// A directive extracted from a comment node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// The span of the comment that declared the directive.
    pub span: Span,
    /// The span the directive governs.
    pub area_of_effect: Span,
}

/// Outcome of scanning one comment's text for a directive marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerScan {
    /// The comment is not a directive at all.
    NotADirective,
    /// A recognized marker.
    Known(DirectiveKind),
    /// Marker-shaped text with an unrecognized name, e.g. `@weft-check`.
    Unknown(String),
}

/// Scans a comment's text for a directive marker.
///
/// The marker must lead the trimmed comment text and runs until the first
/// whitespace or `:`; trailing free-form commentary is permitted.
pub fn scan_marker(comment_text: &str) -> MarkerScan {
    let trimmed = comment_text.trim();
    if !trimmed.starts_with(MARKER_PREFIX) {
        return MarkerScan::NotADirective;
    }

    let word_end = trimmed
        .find(|c: char| c.is_whitespace() || c == ':')
        .unwrap_or(trimmed.len());
    let word = &trimmed[..word_end];

    if word == DirectiveKind::Suppress.marker() {
        MarkerScan::Known(DirectiveKind::Suppress)
    } else if word == DirectiveKind::AssertError.marker() {
        MarkerScan::Known(DirectiveKind::AssertError)
    } else {
        MarkerScan::Unknown(word.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_suppress() {
        assert_eq!(
            scan_marker(" @weft-suppress: this is fine "),
            MarkerScan::Known(DirectiveKind::Suppress)
        );
    }

    #[test]
    fn recognizes_assert_error() {
        assert_eq!(
            scan_marker("@weft-assert-error"),
            MarkerScan::Known(DirectiveKind::AssertError)
        );
    }

    #[test]
    fn unknown_marker_word() {
        assert_eq!(
            scan_marker("@weft-check everything"),
            MarkerScan::Unknown("@weft-check".to_string())
        );
    }

    #[test]
    fn plain_comments_are_not_directives() {
        assert_eq!(scan_marker("just a note"), MarkerScan::NotADirective);
        assert_eq!(scan_marker("@weirdness"), MarkerScan::NotADirective);
    }

    #[test]
    fn marker_stops_at_colon() {
        assert_eq!(
            scan_marker("@weft-suppress: reasons"),
            MarkerScan::Known(DirectiveKind::Suppress)
        );
    }
}
