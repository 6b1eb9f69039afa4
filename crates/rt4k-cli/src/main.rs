//! `rt4k`: inspect, edit and merge RetroTINK 4K profiles.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use rt4k_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use rt4k_cli::commands::{
    run_batch_merge, run_crc, run_export, run_get, run_import, run_merge, run_set, run_settings,
    run_show,
};
use rt4k_cli::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    let version = cli.schema;
    match &cli.command {
        Command::Show(args) => println!("{}", run_show(args, version)?),
        Command::Get(args) => println!("{}", run_get(args, version)?),
        Command::Set(args) => print_written(&[run_set(args, version)?]),
        Command::Export(args) => print_written(&[run_export(args, version)?]),
        Command::Import(args) => print_written(&[run_import(args, version)?]),
        Command::Merge(args) => print_written(&[run_merge(args, version)?]),
        Command::BatchMerge(args) => {
            let written = run_batch_merge(args, version)?;
            print_written(&written);
            println!("Updated {} profile(s).", written.len());
        }
        Command::Crc(args) => println!("{}", run_crc(args, version)?),
        Command::Settings => println!("{}", run_settings(version)),
    }
    Ok(())
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("Updated {}", path.display());
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_timestamps = cli.log_timestamps;
    config.with_target = cli.log_target;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_from_flags() {
        let cli = Cli::try_parse_from([
            "rt4k",
            "--log-level",
            "debug",
            "--log-format",
            "compact",
            "--log-timestamps",
            "--log-target",
            "--color",
            "never",
            "settings",
        ])
        .unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.with_timestamps);
        assert!(config.with_target);
        assert!(!config.with_ansi);
    }

    #[test]
    fn test_log_config_defaults() {
        let cli = Cli::try_parse_from(["rt4k", "settings"]).unwrap();
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(!config.with_timestamps);
        assert!(!config.with_target);
    }
}
