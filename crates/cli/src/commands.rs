//! Subcommand implementations.
//!
//! Each command reads one JSON document, hands it to the plugin and writes
//! the structured response to `out` as a single JSON line.

use crate::errors::CliError;
use relicta_plugin::{CancellationToken, ConfigMap, ExecuteRequest, Plugin};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, instrument};

/// Reads `path`, or all of `stdin` when no path is given.
pub fn read_input(
    what: &'static str,
    path: Option<&Path>,
    stdin: &mut impl Read,
) -> Result<String, CliError> {
    let input = if let Some(path) = path {
        std::fs::read_to_string(path).map_err(|e| CliError::read(what, Some(path), e))?
    } else {
        let mut input = String::new();
        stdin
            .read_to_string(&mut input)
            .map_err(|e| CliError::read(what, None, e))?;
        input
    };
    debug!(what, bytes = input.len(), "Read input document");
    Ok(input)
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, value)
        .map_err(|e| CliError::write(std::io::Error::other(e)))?;
    writeln!(out).map_err(CliError::write)
}

/// `info`: prints the plugin metadata.
pub fn info(plugin: &dyn Plugin, out: &mut impl Write) -> Result<(), CliError> {
    write_json(out, &plugin.info())
}

/// `execute`: runs the hook described by `input`.
///
/// `force_dry_run` turns the request into a dry run; it never turns a
/// requested dry run into a live one.
#[instrument(skip_all, fields(force_dry_run = force_dry_run))]
pub async fn execute(
    plugin: &dyn Plugin,
    input: &str,
    force_dry_run: bool,
    cancel: CancellationToken,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut request: ExecuteRequest =
        serde_json::from_str(input).map_err(|e| CliError::invalid_input("request", e))?;
    request.dry_run |= force_dry_run;

    let response = plugin.execute(request, cancel).await?;
    write_json(out, &response)
}

/// `validate`: checks the configuration object in `input`.
#[instrument(skip_all)]
pub async fn validate(
    plugin: &dyn Plugin,
    input: &str,
    cancel: CancellationToken,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let config: ConfigMap =
        serde_json::from_str(input).map_err(|e| CliError::invalid_input("configuration", e))?;

    let response = plugin.validate(&config, cancel).await?;
    write_json(out, &response)
}
