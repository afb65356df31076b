//! Error types for selector parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in a selector string
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("invalid selector '{source_text}': {message}")]
    Syntax {
        source_text: String,
        span: Span,
        message: String,
    },
}

impl SelectorError {
    pub fn syntax(source: &str, span: Span, message: impl Into<String>) -> Self {
        SelectorError::Syntax {
            source_text: source.to_string(),
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            SelectorError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with the offending selector underlined using ariadne
    pub fn format(&self, name: &str) -> String {
        let mut buf = Vec::new();
        match self {
            SelectorError::Syntax {
                source_text,
                span,
                message,
            } => {
                let span = char_span(source_text, span);
                let written = Report::build(ReportKind::Error, name, span.start)
                    .with_message("invalid selector")
                    .with_label(
                        Label::new((name, span))
                            .with_message(message)
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((name, Source::from(source_text.as_str())), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Convert a byte span into the character span ariadne labels with
fn char_span(text: &str, span: &Span) -> Span {
    let chars = |byte: usize| {
        text.get(..byte)
            .map_or(byte, |prefix| prefix.chars().count())
    };
    chars(span.start)..chars(span.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_selector() {
        let err = SelectorError::syntax("Button .foo", 6..7, "unexpected character");
        assert_eq!(
            err.to_string(),
            "invalid selector 'Button .foo': unexpected character"
        );
        assert_eq!(err.span(), &(6..7));
    }

    #[test]
    fn test_format_contains_message() {
        let err = SelectorError::syntax("#a b", 2..3, "combinators are not supported");
        let report = err.format("left");
        assert!(report.contains("combinators are not supported"));
    }

    #[test]
    fn test_char_span_counts_characters() {
        // "é" takes two bytes
        assert_eq!(char_span("#é x", &(3..4)), 2..3);
        assert_eq!(char_span("#a b", &(2..3)), 2..3);
    }

    #[test]
    fn test_format_non_ascii_selector() {
        let err = SelectorError::syntax("#héllo x", 7..8, "combinators are not supported");
        let report = err.format("left");
        assert!(report.contains("combinators are not supported"));
        assert!(report.contains("#héllo"));
    }
}
