//! Insight CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use serde::Serialize;
use tracing::level_filters::LevelFilter;

use insight_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use insight_cli::commands::{
    RolesRequest, TestRequest, dataset_path, run_corr, run_profile, run_roles, run_test,
};
use insight_cli::logging::{LogConfig, LogFormat, init_logging};
use insight_cli::summary::{print_correlation, print_profile, print_roles, print_test};
use insight_model::AnalysisOptions;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "command failed");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    let alpha = cli.alpha;
    match cli.command {
        Command::Profile(args) => {
            let report = run_profile(&dataset_path(args.file.as_deref())?)?;
            emit(&report, json, print_profile)
        }
        Command::Corr(args) => {
            let report = run_corr(&dataset_path(args.file.as_deref())?)?;
            emit(&report, json, print_correlation)
        }
        Command::Roles(args) => {
            let path = dataset_path(args.file.as_deref())?;
            let request = RolesRequest {
                pins: args.pins,
                unpins: args.unpins,
                repo: args.repo,
            };
            let report = run_roles(&path, &request)?;
            emit(&report, json, print_roles)
        }
        Command::Pearson(args) => test(
            &args.file,
            &TestRequest::Pearson {
                x: args.x,
                y: args.y,
            },
            options(alpha, None)?,
            json,
        ),
        Command::Ci(args) => test(
            &args.file,
            &TestRequest::ConfidenceInterval {
                column: args.column,
            },
            options(alpha, Some(args.confidence))?,
            json,
        ),
        Command::Ttest1(args) => test(
            &args.file,
            &TestRequest::OneSampleT {
                column: args.column,
                mu: args.mu,
            },
            options(alpha, None)?,
            json,
        ),
        Command::Ttest2(args) => test(
            &args.file,
            &TestRequest::WelchT {
                value: args.value,
                group: args.group,
            },
            options(alpha, None)?,
            json,
        ),
        Command::MannWhitney(args) => test(
            &args.file,
            &TestRequest::MannWhitney {
                value: args.value,
                group: args.group,
            },
            options(alpha, None)?,
            json,
        ),
        Command::Anova(args) => test(
            &args.file,
            &TestRequest::Anova {
                value: args.value,
                group: args.group,
            },
            options(alpha, None)?,
            json,
        ),
        Command::Chi2(args) => test(
            &args.file,
            &TestRequest::ChiSquare {
                a: args.x,
                b: args.y,
            },
            options(alpha, None)?,
            json,
        ),
        Command::Trend(args) => test(
            &args.file,
            &TestRequest::Trend {
                x: args.x,
                y: args.y,
            },
            options(alpha, None)?,
            json,
        ),
    }
}

fn options(alpha: f64, confidence: Option<f64>) -> Result<AnalysisOptions> {
    let options = AnalysisOptions::default().with_alpha(alpha)?;
    match confidence {
        Some(confidence) => Ok(options.with_confidence(confidence)?),
        None => Ok(options),
    }
}

fn test(
    path: &std::path::Path,
    request: &TestRequest,
    options: AnalysisOptions,
    json: bool,
) -> Result<()> {
    let report = run_test(path, request, &options)?;
    emit(&report, json, print_test)
}

fn emit<T: Serialize>(report: &T, json: bool, print: fn(&T)) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("serialize report")?;
        println!("{text}");
    } else {
        print(report);
    }
    Ok(())
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
