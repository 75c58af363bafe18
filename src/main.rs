mod output;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use odata_filter::{parse_with, Dialect, Evaluator, FilterConfig, ParseError, QueryOptions};
use serde_json::Value;
use slog::{debug, info, o, Drain, Level, LevelFilter, Logger};

use crate::output::stdout_lines;

#[derive(Parser, Debug)]
#[command(author, version, about = "Parse, render and evaluate OData $filter expressions", long_about = None)]
struct Args {
    /// Spelling of the substring function
    #[arg(long, value_enum, global = true, default_value_t = DialectArg::V4)]
    dialect: DialectArg,

    /// Maximum parenthesis nesting accepted in a filter
    #[arg(long, global = true, default_value_t = odata_filter::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log evaluation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical form of a filter
    Parse {
        filter: String,
        /// Print the parsed tree as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Print the records that match a filter, one JSON document per line
    Test {
        filter: String,
        /// JSON array or JSON-lines file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Build a query string from a JSON object of options
    Query { options: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DialectArg {
    V4,
    V2,
}

impl From<DialectArg> for Dialect {
    fn from(d: DialectArg) -> Self {
        match d {
            DialectArg::V4 => Dialect::V4,
            DialectArg::V2 => Dialect::V2,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let logger = build_logger(args.verbose);

    match run(args, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast::<ParseError>() {
            Ok(parse_error) => {
                eprintln!("{:?}", miette::Report::new(parse_error));
                ExitCode::from(2)
            }
            Err(err) => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn build_logger(verbose: bool) -> Logger {
    let level = if verbose { Level::Debug } else { Level::Warning };
    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = LevelFilter::new(drain, level).fuse();
    Logger::root(drain, o!())
}

fn run(args: Args, logger: &Logger) -> anyhow::Result<()> {
    let dialect = Dialect::from(args.dialect);
    let config = FilterConfig::default()
        .with_dialect(dialect)
        .with_max_depth(args.max_depth);
    let mut out = stdout_lines();

    match args.command {
        Command::Parse { filter, json } => {
            let predicate = parse_with(&filter, &config)?;
            if json {
                out.writeln(&serde_json::to_string_pretty(&predicate)?)?;
            } else {
                out.writeln(&odata_filter::render_with(&predicate, dialect))?;
            }
        }
        Command::Test { filter, input } => {
            let predicate = parse_with(&filter, &config)?;
            let records = read_records(input.as_ref())?;
            let evaluator = Evaluator::new(logger);

            let mut matched = 0usize;
            for record in &records {
                if evaluator.test(&predicate, record) {
                    matched += 1;
                    out.write_record(record)?;
                }
            }
            info!(logger, "done"; "records" => records.len(), "matched" => matched);
        }
        Command::Query { options } => {
            let value: Value =
                serde_json::from_str(&options).context("query options must be a JSON object")?;
            let options = QueryOptions::from_json(&value);
            debug!(logger, "query options"; "options" => ?options);
            out.writeln(&options.to_query_string_with(dialect))?;
        }
    }

    Ok(())
}

/// Records from a JSON array, or from a stream of JSON documents (JSON lines)
fn read_records(input: Option<&PathBuf>) -> anyhow::Result<Vec<Value>> {
    let text = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
            buf
        }
    };

    if text.trim_start().starts_with('[') {
        let records: Vec<Value> = serde_json::from_str(&text).context("invalid JSON array")?;
        return Ok(records);
    }

    serde_json::Deserializer::from_str(&text)
        .into_iter::<Value>()
        .collect::<Result<Vec<_>, _>>()
        .context("invalid JSON lines input")
}
