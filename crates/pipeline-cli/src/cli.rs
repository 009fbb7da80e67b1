//! CLI argument definitions for `pipecsv`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pipecsv",
    version,
    about = "In-line inspection table tools",
    long_about = "Transform and summarize in-line inspection defect tables.\n\n\
                  Reverses survey direction, joins tables, corrects distances \
                  and reports tube and defect statistics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub table: TableArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
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
}

/// Table dialect and schema options. Each one overrides the settings file.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Settings file with `[csv]` and `[schema]` sections.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Built-in schema profile (oegiv, empty).
    #[arg(long = "profile", value_name = "NAME", global = true)]
    pub profile: Option<String>,

    /// Schema profile TOML file.
    #[arg(long = "schema", value_name = "PATH", global = true, conflicts_with = "profile")]
    pub schema: Option<PathBuf>,

    /// Text encoding label, e.g. windows-1251 or utf-8.
    #[arg(long = "encoding", value_name = "LABEL", global = true)]
    pub encoding: Option<String>,

    /// Cell delimiter.
    #[arg(long = "delimiter", value_name = "CHAR", global = true)]
    pub delimiter: Option<char>,

    /// Decimal separator for written fractional cells.
    #[arg(long = "float-delimiter", value_enum, global = true)]
    pub float_delimiter: Option<FloatDelimiterArg>,

    /// Diameter in mm assumed before the first diameter record.
    #[arg(long = "default-diameter", value_name = "MM", global = true)]
    pub default_diameter: Option<i64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rewrite a table as surveyed from the other end.
    Reverse(ReverseArgs),

    /// Concatenate tables, optionally separated by gaps.
    Join(JoinArgs),

    /// Correct distances through a two-column distance table.
    Remap(RemapArgs),

    /// Move records sharing a distance apart.
    Unique(UniqueArgs),

    /// List the tubes of a table.
    Tubes(ReportArgs),

    /// Print tube, line object and defect statistics.
    Stats(ReportArgs),
}

#[derive(Parser)]
pub struct ReverseArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct JoinArgs {
    /// Output table.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Tables and gaps in order. An integer item is a gap in mm.
    #[arg(value_name = "ITEM", required = true)]
    pub items: Vec<String>,
}

#[derive(Parser)]
pub struct RemapArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Two-column table of `old;new` distance nodes.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct UniqueArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Step in mm applied until a record's distance is free.
    #[arg(long = "shift", default_value_t = 1)]
    pub shift: i64,
}

#[derive(Parser)]
pub struct ReportArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FloatDelimiterArg {
    Point,
    Comma,
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
