//! `blueprint`: decode, encode and inspect blueprint exchange strings.
//!
//! ```text
//! blueprint decode  [--input FILE] [--envelope] [--compact]
//! blueprint encode  [--input FILE] [--icon TYPE:NAME]... [--label TEXT] [--level N]
//! blueprint inspect [--input FILE]
//! blueprint config  [--write]
//! ```
//!
//! Input is read from stdin unless `--input` is given.  Results go to stdout;
//! logs go to stderr at the configured level, overridden by `RUST_LOG`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use blueprint_cli::commands::{
    encode_options, parse_signal, read_input, run_decode, run_encode, run_inspect,
};
use blueprint_cli::config::{load_config, save_config, CliConfig};
use blueprint_core::Signal;

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "blueprint",
    version,
    about = "Decode, encode and inspect blueprint exchange strings"
)]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true, env = "BLUEPRINT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).  `RUST_LOG` takes
    /// precedence.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the entities of an exchange string as JSON.
    Decode {
        /// Read the exchange string from FILE instead of stdin.
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the whole envelope (icons, version, label, ...) instead of
        /// only the entity list.
        #[arg(long)]
        envelope: bool,

        /// Single-line JSON regardless of the `output.pretty` setting.
        #[arg(long)]
        compact: bool,
    },

    /// Encode a JSON entity array, or a full envelope object, into an
    /// exchange string.
    Encode {
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Blueprint icon; repeat for up to four icons.
        #[arg(long = "icon", value_name = "TYPE:NAME", value_parser = parse_signal)]
        icons: Vec<Signal>,

        #[arg(long, value_name = "TEXT")]
        label: Option<String>,

        /// zlib compression level.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: Option<u32>,
    },

    /// Summarise an exchange string: marker, compression, version, icons.
    Inspect {
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Also write it to the config file, creating the directory.
        #[arg(long)]
        write: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));

    debug!(command = ?cli.command, "blueprint starting");

    let output = run(cli, &config).await?;
    println!("{output}");
    Ok(())
}

/// Initialises `tracing` on stderr.  `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: &CliConfig) -> anyhow::Result<String> {
    match cli.command {
        Command::Decode {
            input,
            envelope,
            compact,
        } => {
            let text = read_input(input.as_deref()).await?;
            run_decode(&text, envelope, config.output.pretty && !compact).await
        }
        Command::Encode {
            input,
            icons,
            label,
            level,
        } => {
            let text = read_input(input.as_deref()).await?;
            run_encode(&text, encode_options(config, icons, label, level)).await
        }
        Command::Inspect { input } => {
            let text = read_input(input.as_deref()).await?;
            run_inspect(&text).await
        }
        Command::Config { write } => {
            let rendered = toml::to_string_pretty(config).context("failed to render config")?;
            if write {
                let path = save_config(config, cli.config.as_deref())?;
                debug!(path = %path.display(), "wrote config");
            }
            Ok(rendered.trim_end().to_string())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_defaults() {
        let cli = Cli::parse_from(["blueprint", "decode"]);
        match cli.command {
            Command::Decode {
                input,
                envelope,
                compact,
            } => {
                assert_eq!(input, None);
                assert!(!envelope);
                assert!(!compact);
            }
            other => panic!("expected decode, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_collects_repeated_icons_in_order() {
        let cli = Cli::parse_from([
            "blueprint",
            "encode",
            "--icon",
            "item:iron-gear-wheel",
            "--icon",
            "virtual:signal-1",
            "--label",
            "Gears",
        ]);
        match cli.command {
            Command::Encode { icons, label, .. } => {
                assert_eq!(icons.len(), 2);
                assert_eq!(icons[0].name, "iron-gear-wheel");
                assert_eq!(icons[1].kind, "virtual");
                assert_eq!(label.as_deref(), Some("Gears"));
            }
            other => panic!("expected encode, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_rejects_malformed_icon() {
        let result = Cli::try_parse_from(["blueprint", "encode", "--icon", "iron-plate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_rejects_level_above_nine() {
        let result = Cli::try_parse_from(["blueprint", "encode", "--level", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "blueprint",
            "inspect",
            "--input",
            "bp.txt",
            "--config",
            "alt.toml",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Command::Inspect { input: Some(ref p) } if p == &PathBuf::from("bp.txt")
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["blueprint"]).is_err());
    }

    #[tokio::test]
    async fn test_run_decode_reads_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bp.txt");
        let exchange = blueprint_core::encode(&[serde_json::json!({ "name": "radar" })]).unwrap();
        std::fs::write(&path, format!("{exchange}\n")).unwrap();

        let cli = Cli::parse_from([
            "blueprint",
            "decode",
            "--compact",
            "--input",
            path.to_str().unwrap(),
        ]);
        let out = run(cli, &CliConfig::default()).await.unwrap();

        assert_eq!(out, r#"[{"name":"radar"}]"#);
    }

    #[tokio::test]
    async fn test_run_config_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.toml");

        let cli = Cli::parse_from([
            "blueprint",
            "config",
            "--write",
            "--config",
            path.to_str().unwrap(),
        ]);
        let out = run(cli, &CliConfig::default()).await.unwrap();

        assert!(out.contains("compression_level = 6"));
        assert_eq!(load_config(Some(&path)).unwrap(), CliConfig::default());
    }
}
