//! CLI argument definitions for `rt4k`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rt4k_schema::SchemaVersion;

#[derive(Parser)]
#[command(
    name = "rt4k",
    version,
    about = "Inspect, edit and merge RetroTINK 4K profiles",
    long_about = "Inspect, edit and merge RetroTINK 4K profile (.rt4) files.\n\n\
                  Settings are addressed by dotted names such as \
                  `output.transmitter.hdr`; run `rt4k settings` for the full list."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Profile format version.
    #[arg(long = "schema", value_name = "VERSION", default_value = "1.4.2", global = true)]
    pub schema: SchemaVersion,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module path in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a profile's settings as JSON.
    Show(ShowArgs),

    /// Print the value of one setting.
    Get(GetArgs),

    /// Change settings and save the profile.
    Set(SetArgs),

    /// Write a profile's settings to a JSON file.
    Export(ExportArgs),

    /// Apply a JSON settings file to a profile.
    Import(ImportArgs),

    /// Merge settings from other profiles into a base profile.
    Merge(MergeArgs),

    /// Copy scoped settings from a template into every profile under a directory.
    BatchMerge(BatchMergeArgs),

    /// Print a profile's CRC-16 checksum.
    Crc(CrcArgs),

    /// List every setting of the schema.
    Settings,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Profile to read.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Only include settings whose name starts with this prefix (repeatable).
    #[arg(long = "scope", short = 's', value_name = "PREFIX")]
    pub scopes: Vec<String>,

    /// Print single-line JSON.
    #[arg(long = "compact")]
    pub compact: bool,
}

#[derive(Args)]
pub struct GetArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Dotted setting name.
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Args)]
pub struct SetArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Assignments of the form `name=value`. Enum settings also accept a
    /// zero-based choice index.
    #[arg(value_name = "NAME=VALUE", required = true)]
    pub assignments: Vec<String>,

    /// Write to this path instead of overwriting FILE.
    #[arg(long = "output", short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Destination JSON file.
    #[arg(value_name = "JSON")]
    pub json: PathBuf,

    #[arg(long = "scope", short = 's', value_name = "PREFIX")]
    pub scopes: Vec<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON settings file to apply.
    #[arg(value_name = "JSON")]
    pub json: PathBuf,

    /// Write to this path instead of overwriting FILE.
    #[arg(long = "output", short = 'o', value_name = "OUT")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Profile the sources are merged into.
    #[arg(value_name = "BASE")]
    pub base: PathBuf,

    /// Profiles to merge, applied in order; later sources win.
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Only take settings whose name starts with this prefix (repeatable).
    #[arg(long = "scope", short = 's', value_name = "PREFIX")]
    pub scopes: Vec<String>,

    /// Destination profile.
    #[arg(long = "output", short = 'o', value_name = "OUT")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct BatchMergeArgs {
    /// Directory searched recursively for `.rt4` files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving the updated profiles, mirroring INPUT_DIR.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Profile the settings are copied from.
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Setting name prefixes to copy.
    #[arg(value_name = "SCOPE", required = true)]
    pub scopes: Vec<String>,
}

#[derive(Args)]
pub struct CrcArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge() {
        let cli = Cli::try_parse_from([
            "rt4k", "merge", "base.rt4", "a.rt4", "b.rt4", "--scope", "output", "-o", "out.rt4",
        ])
        .unwrap();
        let Command::Merge(args) = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(args.sources.len(), 2);
        assert_eq!(args.scopes, vec!["output"]);
        assert_eq!(cli.schema, SchemaVersion::V1_4_2);
    }

    #[test]
    fn test_unknown_schema_rejected() {
        assert!(Cli::try_parse_from(["rt4k", "--schema", "0.9", "settings"]).is_err());
    }
}
