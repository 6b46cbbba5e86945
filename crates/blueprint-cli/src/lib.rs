//! Library half of the `blueprint` command.
//!
//! [`config`] loads the TOML settings file; [`commands`] holds the subcommand
//! bodies.  The binary in `main.rs` only parses arguments, wires logging and
//! prints results.

pub mod commands;
pub mod config;
