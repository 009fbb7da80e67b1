//! `pipecsv` command line tool.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use pipeline_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use pipeline_cli::commands::{
    RunContext, run_join, run_remap, run_reverse, run_stats, run_tubes, run_unique,
};
use pipeline_cli::config::Settings;
use pipeline_cli::logging::{LogConfig, LogFormat, init_logging};

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
    let settings = Settings::resolve(&cli.table)?;
    let context = RunContext::from_settings(&settings)?;
    match &cli.command {
        Command::Reverse(args) => run_reverse(args, &context),
        Command::Join(args) => run_join(args, &context),
        Command::Remap(args) => run_remap(args, &context),
        Command::Unique(args) => {
            let shifted = run_unique(args, &context)?;
            println!("Moved {shifted} records");
            Ok(())
        }
        Command::Tubes(args) => {
            println!("{}", run_tubes(args, &context)?);
            Ok(())
        }
        Command::Stats(args) => {
            println!("{}", run_stats(args, &context)?);
            Ok(())
        }
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
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
