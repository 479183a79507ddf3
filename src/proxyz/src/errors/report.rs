// src/errors/report.rs
//! Rendering utilities for miette diagnostics.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, ThemeCharacters, ThemeStyles};
use proxyz_sema::ResolveError;

use crate::cli::ColorMode;

/// Create a handler for terminal output (unicode + colors).
pub fn terminal_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::unicode(),
        styles: ThemeStyles::ansi(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Create a handler for snapshot testing (ascii + no colors).
pub fn snapshot_handler() -> GraphicalReportHandler {
    let theme = GraphicalTheme {
        characters: ThemeCharacters::ascii(),
        styles: ThemeStyles::none(),
    };
    GraphicalReportHandler::new_themed(theme)
}

/// Render to stderr with unicode/colors.
pub fn render_to_stderr(report: &dyn Diagnostic) {
    let handler = terminal_handler();
    let mut output = String::new();
    if handler.render_report(&mut output, report).is_ok() {
        eprint!("{}", output);
    }
}

/// Render to a buffer without colors (for snapshots/testing).
pub fn render_to_string(report: &dyn Diagnostic) -> String {
    let mut output = String::new();
    let handler = snapshot_handler();
    let _ = handler.render_report(&mut output, report);
    output
}

/// Render a resolution error to stderr. An unresolved identifier gets its
/// source file attached when the file can still be read.
pub fn render_resolve_error(err: ResolveError, color: ColorMode) {
    let source = match &err {
        ResolveError::UnresolvedIdentifier { file, .. } => std::fs::read_to_string(file)
            .ok()
            .map(|text| NamedSource::new(file.clone(), text)),
        _ => None,
    };
    let report = match source {
        Some(source) => miette::Report::new(err).with_source_code(source),
        None => miette::Report::new(err),
    };

    let colored = match color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            use std::io::IsTerminal;
            std::io::stderr().is_terminal()
        }
    };
    if colored {
        render_to_stderr(report.as_ref());
    } else {
        eprint!("{}", render_to_string(report.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxyz_frontend::errors::LexerError;

    #[test]
    fn render_lexer_error_to_string() {
        let err = LexerError::UnexpectedCharacter {
            ch: '@',
            span: (0, 1).into(),
        };
        let report = miette::Report::new(err)
            .with_source_code(NamedSource::new("test.go", "@".to_string()));

        let output = render_to_string(report.as_ref());
        assert!(output.contains("E0001"), "should contain error code");
        assert!(
            output.contains("unexpected character"),
            "should contain message"
        );
    }

    #[test]
    fn render_unresolved_identifier_with_source() {
        let source = "package p\n\ntype T Missing\n";
        let err = ResolveError::UnresolvedIdentifier {
            name: "Missing".to_string(),
            file: "p.go".to_string(),
            line: 3,
            column: 8,
            span: (18, 7).into(),
        };
        let report =
            miette::Report::new(err).with_source_code(NamedSource::new("p.go", source.to_string()));

        let output = render_to_string(report.as_ref());
        assert!(output.contains("E3004"), "should contain error code");
        assert!(output.contains("undefined: Missing"));
        assert!(output.contains("type T Missing"), "should show the source line");
    }

    #[test]
    fn render_type_cycle() {
        let err = ResolveError::TypeCycle {
            cycle: vec!["m.A".into(), "m.A".into()],
        };
        let output = render_to_string(&err);
        assert!(output.contains("E3006"));
        assert!(output.contains("invalid recursive type: m.A -> m.A"));
    }
}
