//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Errors that stop the CLI before a structured response exists.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Failed to read {what} from {origin}")]
    #[diagnostic(
        code(relicta::cli::read_error),
        help("Check that the file exists and is readable, or pipe the document on stdin")
    )]
    Read {
        what: &'static str,
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {what}: {source}")]
    #[diagnostic(code(relicta::cli::invalid_input))]
    InvalidInput {
        what: &'static str,
        #[source]
        source: serde_json::Error,
        #[help]
        help_text: Option<String>,
    },

    #[error("Failed to write response")]
    #[diagnostic(code(relicta::cli::write_error))]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Plugin(#[from] relicta_plugin::Error),
}

impl CliError {
    pub fn read(what: &'static str, path: Option<&Path>, source: std::io::Error) -> Self {
        let origin = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
        Self::Read {
            what,
            origin,
            source,
        }
    }

    pub fn invalid_input(what: &'static str, source: serde_json::Error) -> Self {
        let help_text = match what {
            "request" => Some(
                "Expected an object with `hook`, `config`, `context` and `dry_run`".to_string(),
            ),
            "configuration" => Some("Expected a JSON object of plugin settings".to_string()),
            _ => None,
        };
        Self::InvalidInput {
            what,
            source,
            help_text,
        }
    }

    pub const fn write(source: std::io::Error) -> Self {
        Self::Write { source }
    }
}
