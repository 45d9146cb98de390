//! Positioned reports
//!
//! Fatal parse errors and dropped statements are rendered with `ariadne`
//! against the translated source.

use crate::parser::ParseError;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use std::ops::Range;

/// A statement dropped after resynchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte offset of the statement start
    pub position: usize,
    pub message: String,
}

/// Span of one character at `position`, clamped to the source
fn span_at(source: &str, position: Option<usize>) -> Range<usize> {
    let start = position.unwrap_or(source.len()).min(source.len());
    let end = source[start..]
        .chars()
        .next()
        .map_or(start, |c| start + c.len_utf8());
    start..end
}

fn render(
    kind: ReportKind<'_>,
    name: &str,
    source: &str,
    span: Range<usize>,
    message: &str,
    color: bool,
) -> String {
    let label_color = if matches!(kind, ReportKind::Error) {
        Color::Red
    } else {
        Color::Yellow
    };
    let report = Report::build(kind, (name, span.clone()))
        .with_config(Config::default().with_color(color))
        .with_message(message)
        .with_label(
            Label::new((name, span))
                .with_message(message)
                .with_color(label_color),
        )
        .finish();

    let mut out = Vec::new();
    if let Err(e) = report.write((name, Source::from(source)), &mut out) {
        tracing::error!("Cannot render report: {}", e);
        return format!("{}: {}", name, message);
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Report for a fatal parse error in `source` named `name`
pub fn render_error(name: &str, source: &str, error: &ParseError, color: bool) -> String {
    let span = span_at(source, error.position());
    render(ReportKind::Error, name, source, span, &error.to_string(), color)
}

/// Report for a dropped statement
pub fn render_warning(name: &str, source: &str, diagnostic: &Diagnostic, color: bool) -> String {
    let span = span_at(source, Some(diagnostic.position));
    render(
        ReportKind::Warning,
        name,
        source,
        span,
        &diagnostic.message,
        color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_is_clamped() {
        assert_eq!(span_at("abc", Some(1)), 1..2);
        assert_eq!(span_at("abc", Some(10)), 3..3);
        assert_eq!(span_at("abc", None), 3..3);
    }

    #[test]
    fn test_error_report_names_the_file() {
        let source = "subnet 10.0.0.0 netmask 255.0.255.0 { }\n";
        let error = ParseError::InvalidSyntax {
            position: 24,
            message: "255.0.255.0 is not a valid netmask".to_string(),
        };
        let text = render_error("dhcpd.conf", source, &error, false);
        assert!(text.contains("dhcpd.conf"));
        assert!(text.contains("is not a valid netmask"));
    }

    #[test]
    fn test_warning_report() {
        let source = "option domain-name = ;\n";
        let diagnostic = Diagnostic {
            position: 0,
            message: "expecting a data expression.".to_string(),
        };
        let text = render_warning("dhcpd.conf", source, &diagnostic, false);
        assert!(text.contains("Warning"));
        assert!(text.contains("expecting a data expression."));
    }
}
