use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "relicta-sentry")]
#[command(about = "Sentry release tracking plugin for Relicta, over stdin/stdout")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format (logs go to stderr)",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Print plugin metadata as JSON")]
    Info,
    #[command(about = "Run one hook from an ExecuteRequest JSON document")]
    Execute {
        #[arg(long, short = 'r', help = "Read the request from FILE instead of stdin")]
        request: Option<PathBuf>,
        #[arg(long, help = "Force a dry run regardless of the request")]
        dry_run: bool,
    },
    #[command(about = "Validate a plugin configuration JSON object")]
    Validate {
        #[arg(long, short = 'c', help = "Read the configuration from FILE instead of stdin")]
        config: Option<PathBuf>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
