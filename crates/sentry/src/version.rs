//! Release version formatting.
//!
//! The `version_format` setting is a template whose actions reference fields
//! of the release: `{{.Version}}`, `{{.TagName}}` and `{{.ShortSHA}}`.
//! Everything outside `{{ }}` is copied verbatim, except that `{{- ` and
//! ` -}}` trim the whitespace on that side of the action.
//!
//! Parsing and rendering are separate so configuration validation can check
//! syntax without a release at hand. Unknown field names parse fine and fail
//! at render time.

use crate::error::{Error, Result};
use relicta_plugin::ReleaseContext;

/// Length of an abbreviated commit hash.
pub const SHORT_SHA_LEN: usize = 7;

/// Template used when `version_format` is not configured.
pub const DEFAULT_VERSION_FORMAT: &str = "{{.Version}}";

/// Returns the first seven characters of a commit hash, or all of it if shorter.
#[must_use]
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(SHORT_SHA_LEN) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed version format template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTemplate {
    segments: Vec<Segment>,
}

impl VersionTemplate {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] for an unclosed or empty action, or an
    /// action that is not a single field reference.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut trim_next = false;

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let close = after_open.find("}}").ok_or_else(|| {
                Error::template(format!(
                    "unclosed action starting at byte {}",
                    source.len() - rest.len() + open
                ))
            })?;

            let mut action = &after_open[..close];
            let trim_before = action.starts_with("- ")
                || action.starts_with("-\t")
                || action.starts_with("-\n");
            if trim_before {
                action = &action[1..];
            }
            let trim_after = action.ends_with(" -")
                || action.ends_with("\t-")
                || action.ends_with("\n-");
            if trim_after {
                action = &action[..action.len() - 1];
            }

            let mut literal = &rest[..open];
            if trim_next {
                literal = literal.trim_start();
            }
            if trim_before {
                literal = literal.trim_end();
            }
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_string()));
            }

            segments.push(Segment::Field(parse_action(action)?));
            rest = &after_open[close + 2..];
            trim_next = trim_after;
        }

        if trim_next {
            rest = rest.trim_start();
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Renders the template against a release.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the template references a field that
    /// does not exist on the release.
    pub fn render(&self, ctx: &ReleaseContext) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(field_value(name, ctx)?),
            }
        }
        Ok(out)
    }
}

fn parse_action(action: &str) -> Result<String> {
    let inner = action.trim();
    if inner.is_empty() {
        return Err(Error::template("missing value for action"));
    }

    let Some(name) = inner.strip_prefix('.') else {
        return Err(Error::template(format!(
            "unsupported action '{inner}': only field references such as .Version are allowed"
        )));
    };

    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(Error::template(format!("bad field name in action '{inner}'")));
    }

    Ok(name.to_string())
}

fn field_value<'a>(name: &str, ctx: &'a ReleaseContext) -> Result<&'a str> {
    match name {
        "Version" => Ok(&ctx.version),
        "TagName" => Ok(&ctx.tag_name),
        "ShortSHA" => Ok(short_sha(&ctx.commit_sha)),
        other => Err(Error::template(format!(
            "can't evaluate field {other}: available fields are Version, TagName, ShortSHA"
        ))),
    }
}

/// Parses and renders `format` in one step.
///
/// # Errors
///
/// Returns [`Error::Template`] if parsing or rendering fails.
pub fn format_version(format: &str, ctx: &ReleaseContext) -> Result<String> {
    VersionTemplate::parse(format)?.render(ctx)
}
