//! CLI argument definitions for `insight`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use insight_model::Role;

#[derive(Parser)]
#[command(
    name = "insight",
    version,
    about = "Column role mapping and statistical tests for tabular datasets",
    long_about = "Load a CSV or Parquet dataset, map its columns to semantic roles and run\n\
                  hypothesis tests, confidence intervals and correlations on it.\n\n\
                  When no dataset is given, data/df_selecionado.{csv,parquet} is used.\n\
                  Column arguments accept a column name or a role name (e.g. valor_pedido)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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

    /// Significance level used for the reject/do-not-reject decision.
    #[arg(long = "alpha", default_value_t = 0.05, global = true)]
    pub alpha: f64,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show column kinds, missing counts and numeric summaries.
    Profile(DatasetArgs),

    /// Resolve column roles, optionally pinning and saving them.
    Roles(RolesArgs),

    /// Show the Pearson correlation matrix of numeric columns.
    Corr(DatasetArgs),

    /// Pearson correlation between two columns.
    Pearson(PairArgs),

    /// t confidence interval for the mean of a column.
    Ci(CiArgs),

    /// One-sample t-test of a column mean.
    Ttest1(OneSampleArgs),

    /// Welch two-sample t-test between the two groups of a column.
    Ttest2(GroupArgs),

    /// Mann-Whitney U test between the two groups of a column.
    MannWhitney(GroupArgs),

    /// One-way ANOVA across the groups of a column.
    Anova(GroupArgs),

    /// Chi-square test of independence between two categorical columns.
    Chi2(PairArgs),

    /// Least-squares trend line of one column against another.
    Trend(PairArgs),
}

#[derive(Args)]
pub struct DatasetArgs {
    /// Dataset file (.csv or .parquet).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct RolesArgs {
    /// Dataset file (.csv or .parquet).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Pin a role to a column; repeatable.
    #[arg(long = "pin", value_name = "ROLE=COLUMN", value_parser = parse_pin)]
    pub pins: Vec<(Role, String)>,

    /// Release a pinned role so automatic matching can fill it; repeatable.
    #[arg(long = "unpin", value_name = "ROLE")]
    pub unpins: Vec<Role>,

    /// Directory holding saved role maps. The result is saved there.
    #[arg(long = "repo", value_name = "DIR")]
    pub repo: Option<PathBuf>,
}

#[derive(Args)]
pub struct PairArgs {
    /// Dataset file (.csv or .parquet).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// First column (or role).
    pub x: String,

    /// Second column (or role).
    pub y: String,
}

#[derive(Args)]
pub struct CiArgs {
    /// Dataset file (.csv or .parquet).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Numeric column (or role).
    pub column: String,

    /// Confidence level, between 0.80 and 0.99.
    #[arg(long = "confidence", default_value_t = 0.95)]
    pub confidence: f64,
}

#[derive(Args)]
pub struct OneSampleArgs {
    /// Dataset file (.csv or .parquet).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Numeric column (or role).
    pub column: String,

    /// Hypothesised mean.
    #[arg(long = "mu", allow_negative_numbers = true)]
    pub mu: f64,
}

#[derive(Args)]
pub struct GroupArgs {
    /// Dataset file (.csv or .parquet).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Numeric column (or role).
    pub value: String,

    /// Grouping column (or role).
    pub group: String,
}

/// Parses `role=column`.
pub fn parse_pin(raw: &str) -> Result<(Role, String), String> {
    let (role, column) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=COLUMN, got `{raw}`"))?;
    let role = role.trim().parse::<Role>().map_err(|e| e.to_string())?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column for role `{role}`"));
    }
    Ok((role, column.to_string()))
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
