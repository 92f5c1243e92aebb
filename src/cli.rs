// src/cli.rs

//! CLI argument parsing for the `errchain` binary, using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `errchain`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "errchain",
    version,
    about = "Decode and encode serialized error chains.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ERRCHAIN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Decode a serialized chain and print it.
    Decode {
        /// File holding the serialized bytes. Reads stdin when omitted.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Refuse to decode more than this many layers.
        #[arg(long, value_name = "N")]
        max_layers: Option<usize>,
    },

    /// Build a chain from messages and write its serialized form.
    ///
    /// The first message becomes the outermost layer, the last one the root
    /// cause.
    Encode {
        #[arg(value_name = "MESSAGE", required = true)]
        messages: Vec<String>,

        /// Write to this file instead of stdout.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// How `decode` prints its report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Toml,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
