//! YAML error diagnostics with source labels

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax error in a snapshot or config file, with source location
#[derive(Debug, Error, Diagnostic)]
#[error("YAML syntax error: {message}")]
#[diagnostic(code(capstat::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error and the text it came from
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let message = err.to_string();
        let help = suggest_fix(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(byte_offset(source, line, column)..byte_offset(source, line, column).saturating_add(1)),
            help,
            message,
        }
    }
}

/// Errors from reading and parsing YAML files
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a 1-based line/column position to a byte offset
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    for (i, ch) in source.char_indices() {
        if current_line == line {
            line_start = i;
            break;
        }
        if ch == '\n' {
            current_line += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|n| line_start + n)
        .unwrap_or(source.len());

    (line_start + column.saturating_sub(1)).min(line_end)
}

/// Map common serde_yml error messages to actionable hints
fn suggest_fix(message: &str) -> Option<String> {
    let lower = message.to_lowercase();

    if lower.contains("tab") {
        return Some("YAML indentation must use spaces, not tabs.".to_string());
    }
    if lower.contains("duplicate key") {
        return Some("A key appears twice in the same mapping; remove one.".to_string());
    }
    if lower.contains("expected block end") {
        return Some("Check the indentation above this line for consistency.".to_string());
    }
    if lower.contains("mapping values are not allowed") {
        return Some("A ':' in a value needs quoting, or a space is missing after a key's ':'.".to_string());
    }
    if lower.contains("invalid type") {
        return Some("A field has the wrong type; check numbers vs. quoted strings and dates as YYYY-MM-DD.".to_string());
    }

    None
}
