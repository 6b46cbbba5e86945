//! Subcommand bodies for the `blueprint` binary.
//!
//! Each `run_*` function takes the raw input text and returns what should be
//! printed to stdout, so the binary stays a thin clap + I/O shell and the
//! logic is testable without a process.

use std::path::Path;

use anyhow::{bail, Context};
use blueprint_core::{
    decode_async, decode_envelope_async, encode_async, encode_envelope_async, inspect_async,
    CompressionLevel, EncodeOptions, Envelope, Icon, Inspection, Signal,
};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::config::CliConfig;

// ── Input ─────────────────────────────────────────────────────────────────────

/// Reads the whole of `path`, or stdin when `path` is `None`.
///
/// # Errors
///
/// Returns an error naming the source if it cannot be read as UTF-8 text.
pub async fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Parses a `TYPE:NAME` icon signal, e.g. `item:transport-belt`.
///
/// # Errors
///
/// Returns a message suitable for clap when the colon or either half is
/// missing.
pub fn parse_signal(s: &str) -> Result<Signal, String> {
    match s.split_once(':') {
        Some((kind, name)) if !kind.is_empty() && !name.is_empty() => Ok(Signal {
            kind: kind.to_string(),
            name: name.to_string(),
        }),
        _ => Err(format!("expected TYPE:NAME (e.g. item:transport-belt), got `{s}`")),
    }
}

/// Merges command-line encode flags over the configured defaults.
///
/// Icons are numbered from 1 in the order given.
pub fn encode_options(
    config: &CliConfig,
    signals: Vec<Signal>,
    label: Option<String>,
    level: Option<u32>,
) -> EncodeOptions {
    let icons = if signals.is_empty() {
        config.codec.icons.clone()
    } else {
        Some(
            signals
                .into_iter()
                .zip(1..)
                .map(|(signal, index)| Icon { signal, index })
                .collect(),
        )
    };
    EncodeOptions {
        icons,
        label,
        level: level.map_or_else(|| config.codec.level(), CompressionLevel::new),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// Decodes an exchange string and renders the entities (or the whole
/// envelope) as JSON.
///
/// Surrounding whitespace, such as the newline a clipboard paste leaves, is
/// trimmed first.
///
/// # Errors
///
/// Returns the codec error for malformed input.
pub async fn run_decode(input: &str, envelope: bool, pretty: bool) -> anyhow::Result<String> {
    let exchange = input.trim().to_string();
    let value = if envelope {
        let envelope = decode_envelope_async(exchange)
            .await
            .context("failed to decode exchange string")?;
        serde_json::to_value(envelope)?
    } else {
        let entities = decode_async(exchange)
            .await
            .context("failed to decode exchange string")?;
        Value::Array(entities)
    };
    render_json(&value, pretty)
}

/// Encodes a JSON array of entities, or a full envelope object, into an
/// exchange string.
///
/// For an envelope, `--icon` and `--label` replace the envelope's own values.
///
/// # Errors
///
/// Returns an error if the input is not JSON of one of those two shapes.
pub async fn run_encode(input: &str, options: EncodeOptions) -> anyhow::Result<String> {
    let json: Value = serde_json::from_str(input).context("encode input is not valid JSON")?;

    let exchange = match json {
        Value::Array(entities) => {
            debug!(entities = entities.len(), "encoding entity list");
            encode_async(entities, options).await?
        }
        json if json.get("blueprint").is_some() => {
            let mut envelope: Envelope =
                serde_json::from_value(json).context("encode input is not a blueprint envelope")?;
            if let Some(icons) = options.icons {
                envelope.blueprint.icons = icons;
            }
            if let Some(label) = options.label {
                envelope.set_label(label);
            }
            debug!(entities = envelope.entities().len(), "encoding envelope");
            encode_envelope_async(envelope, options.level).await?
        }
        other => bail!(
            "encode input must be a JSON array of entities or an object with a `blueprint` key, got {}",
            json_kind(&other)
        ),
    };
    Ok(exchange)
}

/// Decodes an exchange string and renders an [`Inspection`] summary.
///
/// # Errors
///
/// Returns the codec error for malformed input.
pub async fn run_inspect(input: &str) -> anyhow::Result<String> {
    let report = inspect_async(input.trim().to_string())
        .await
        .context("failed to decode exchange string")?;
    Ok(render_inspection(&report))
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn render_json(value: &Value, pretty: bool) -> anyhow::Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn render_inspection(report: &Inspection) -> String {
    let version = report
        .game_version
        .map_or_else(|| "(none)".to_string(), |v| v.to_string());
    let icons = if report.icons.is_empty() {
        "(none)".to_string()
    } else {
        report
            .icons
            .iter()
            .map(|i| format!("{}:{}@{}", i.signal.kind, i.signal.name, i.index))
            .collect::<Vec<_>>()
            .join(", ")
    };

    [
        format!("version marker: {}", report.marker),
        format!(
            "compression:    {} ({} bytes)",
            report.convention, report.compressed_len
        ),
        format!("json:           {} bytes", report.json_len),
        format!("game version:   {version}"),
        format!("label:          {}", report.label.as_deref().unwrap_or("(none)")),
        format!("icons:          {icons}"),
        format!("entities:       {}", report.entity_count),
    ]
    .join("\n")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without `blueprint`",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
