//! memotrace - replay integer arguments through a memoized function

mod report;
mod workload;

use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use ringmemo::{KeyEq, MemoOptions, Outcome, Serializer, StrictEq, TracingSink};
use tracing::info;

use crate::report::{CallRecord, Report};
use crate::workload::Workload;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Function to memoize
    #[arg(short, long, value_enum, default_value_t = Workload::Square)]
    workload: Workload,

    /// Cache capacity (number of entries)
    #[arg(short, long, default_value_t = ringmemo::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Key each call by the absolute value of its argument
    #[arg(long)]
    abs_keys: bool,

    /// Log every hit and miss
    #[arg(long)]
    debug: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Arguments to replay; read from stdin when omitted
    #[arg(allow_negative_numbers = true)]
    values: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let values = if args.values.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("reading arguments from stdin")?;
        parse_values(&input)?
    } else {
        args.values.clone()
    };

    info!(
        "Replaying {} calls through {} (capacity {})",
        values.len(),
        args.workload.name(),
        args.capacity
    );

    let report = run(&args, &values)?;

    match args.format {
        Format::Text => print!("{}", report.to_text()),
        Format::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn parse_values(input: &str) -> Result<Vec<i64>> {
    input
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .with_context(|| format!("invalid integer argument {:?}", token))
        })
        .collect()
}

fn run(args: &Args, values: &[i64]) -> Result<Report> {
    let options = MemoOptions::new()
        .capacity(args.capacity)
        .debug(args.debug)
        .name(args.workload.name());

    if args.abs_keys {
        if !args.workload.is_even() {
            bail!(
                "--abs-keys needs a workload with f(n) == f(-n); {} is not",
                args.workload.name()
            );
        }
        replay(options.serializer(|n: &i64| n.abs()), args.workload, values)
    } else {
        replay(options, args.workload, values)
    }
}

fn replay<S>(
    options: MemoOptions<StrictEq, S, TracingSink>,
    workload: Workload,
    values: &[i64],
) -> Result<Report>
where
    S: Serializer<i64>,
    StrictEq: KeyEq<S::Key>,
{
    let mut memo = options.build_fallible(move |n: i64| workload.eval(n))?;
    let mut calls = Vec::with_capacity(values.len());

    for &input in values {
        let hits = memo.stats().hits();
        let result = memo.try_call(input);
        let outcome = if memo.stats().hits() > hits {
            Outcome::Hit
        } else {
            Outcome::Miss
        };
        let (value, error) = match result {
            Ok(value) => (Some(value), None),
            Err(err) => (None, Some(err.to_string())),
        };
        calls.push(CallRecord {
            input,
            outcome,
            value,
            error,
        });
    }

    Ok(Report {
        workload,
        capacity: memo.capacity(),
        resident: memo.len(),
        calls,
        stats: *memo.stats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["memotrace"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn outcomes(report: &Report) -> Vec<Outcome> {
        report.calls.iter().map(|call| call.outcome).collect()
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = args(&["1", "-2"]);
        assert_eq!(args.workload, Workload::Square);
        assert_eq!(args.capacity, 24);
        assert_eq!(args.format, Format::Text);
        assert_eq!(args.values, vec![1, -2]);
    }

    #[test]
    fn test_square_scenario() {
        let args = args(&["--capacity", "2", "2", "3", "2"]);
        let report = run(&args, &args.values).unwrap();

        assert_eq!(
            outcomes(&report),
            vec![Outcome::Miss, Outcome::Miss, Outcome::Hit]
        );
        assert_eq!(report.calls[2].value, Some(4));
        assert_eq!(report.stats.misses(), 2);
    }

    #[test]
    fn test_abs_keys_share_entries() {
        let args = args(&["--abs-keys", "-3", "3"]);
        let report = run(&args, &args.values).unwrap();
        assert_eq!(outcomes(&report), vec![Outcome::Miss, Outcome::Hit]);
        assert_eq!(report.resident, 1);
    }

    #[test]
    fn test_abs_keys_rejected_for_fib() {
        let args = args(&["--workload", "fib", "--abs-keys", "3"]);
        let err = run(&args, &args.values).unwrap_err();
        assert!(err.to_string().contains("fib"));
    }

    #[test]
    fn test_failures_are_not_cached() {
        let args = args(&["--workload", "collatz", "0", "0", "6", "6"]);
        let report = run(&args, &args.values).unwrap();

        assert_eq!(
            outcomes(&report),
            vec![Outcome::Miss, Outcome::Miss, Outcome::Miss, Outcome::Hit]
        );
        assert!(report.calls[0].error.is_some());
        assert_eq!(report.calls[3].value, Some(8));
        assert_eq!(report.resident, 1);
    }

    #[test]
    fn test_zero_capacity_is_an_error() {
        let args = args(&["--capacity", "0", "1"]);
        assert!(run(&args, &args.values).is_err());
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values(" 1\n-2\t3 ").unwrap(), vec![1, -2, 3]);
        assert!(parse_values("1 two").is_err());
        assert!(parse_values("").unwrap().is_empty());
    }
}
