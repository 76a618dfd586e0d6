//! fviz CLI.

use clap::{ColorChoice, Parser};
use fviz_cli::logging::{LogConfig, LogFormat, init_logging};
use fviz_cli::settings::{Settings, settings_path};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;
use tracing::warn;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_config_command, run_load_command, run_show_command};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();

    // Settings are read before logging exists; report failures once it does.
    let path = cli.config.clone().or_else(settings_path);
    let (settings, settings_error) = match path.as_deref().map(Settings::load_from) {
        Some(Ok(settings)) => (settings, None),
        Some(Err(error)) => (Settings::default(), Some(error)),
        None => (Settings::default(), None),
    };

    let log_config = log_config_from_cli(&cli, &settings);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Some(error) = settings_error {
        warn!("ignoring settings file: {error:#}");
    }

    let result = match &cli.command {
        Command::Load(args) => run_load_command(args, &settings),
        Command::Show(args) => run_show_command(args, &settings),
        Command::Config(args) => run_config_command(args, path.as_deref(), &settings),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration with precedence: flags, settings file, defaults.
fn log_config_from_cli(cli: &Cli, settings: &Settings) -> LogConfig {
    let level = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        Some(LogFormatArg::Pretty) => LogFormat::Pretty,
        Some(LogFormatArg::Compact) => LogFormat::Compact,
        Some(LogFormatArg::Json) => LogFormat::Json,
        None => settings.logging.format.unwrap_or_default(),
    };
    let ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };

    let mut config = LogConfig::default()
        .with_level(level)
        .with_format(format)
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone());
    if cli.verbosity.is_present() || cli.log_level.is_some() {
        config = config.without_env_filter();
    }
    config
}
