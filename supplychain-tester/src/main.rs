mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::{
    FileData, GameplayStrategy, PlayRecord, StrategyAggregate, aggregate_records,
    resolve_seed_inputs, run_sweep,
};
use supplychain_game::GameEngine;
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "supplychain-tester", version)]
#[command(about = "Automated playthroughs and balance reports for the supply chain game")]
struct Args {
    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Games per seed and strategy; the seed advances by one per game
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Catalog JSON file (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Game configuration JSON file (defaults to built-in values)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every round's decision and events
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let strategies = expand_strategies(&args.strategies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let engine = GameEngine::new(FileData::new(args.catalog.clone(), args.config.clone()))
        .context("loading game data")?;
    log::info!(
        "running {} strategies over {} seeds x {} iterations",
        strategies.len(),
        seeds.len(),
        args.iterations
    );

    println!("{}", "🧠 Running Playthroughs".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());
    let records = run_sweep(&engine, &strategies, &seeds, args.iterations, args.verbose)?;
    let aggregates = aggregate_records(&records);

    write_reports(&args, &records, &aggregates, start_time)?;

    if records.iter().any(|r| !r.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut sink = ReportSink::open(args.output.as_deref())?;
    writeln!(sink, "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        writeln!(sink, "  {:10} - {}", strategy.key(), strategy.description())?;
    }
    sink.finish()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "📦 Supply Chain Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_strategies(strategies_arg: &str) -> Result<Vec<GameplayStrategy>> {
    let mut strategies: Vec<GameplayStrategy> = Vec::new();
    for token in split_csv(strategies_arg) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
        } else if let Some(strategy) = GameplayStrategy::parse(&token) {
            strategies.push(strategy);
        } else {
            eprintln!("⚠️  Unknown strategy: {}", token.yellow());
        }
    }
    let mut seen = Vec::with_capacity(strategies.len());
    strategies.retain(|s| {
        let fresh = !seen.contains(s);
        seen.push(*s);
        fresh
    });
    if strategies.is_empty() {
        bail!("no known strategies in {strategies_arg:?}; try --list-strategies");
    }
    Ok(strategies)
}

fn write_reports(
    args: &Args,
    records: &[PlayRecord],
    aggregates: &[StrategyAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut sink = ReportSink::open(args.output.as_deref())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut sink, records, aggregates)?,
        "markdown" => logic::reports::generate_markdown_report(&mut sink, records, aggregates)?,
        _ => {
            let duration = start_time.elapsed();
            if records.is_empty() {
                writeln!(sink, "No games played.")?;
            } else {
                logic::reports::generate_console_report(&mut sink, records, aggregates, duration)?;
            }
        }
    }

    sink.finish()
}

/// Report destination: the `--output` file when given, stdout otherwise.
struct ReportSink {
    inner: BufWriter<Box<dyn Write>>,
    destination: String,
}

impl ReportSink {
    fn open(path: Option<&Path>) -> Result<Self> {
        let (inner, destination): (Box<dyn Write>, String) = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                (Box::new(file), path.display().to_string())
            }
            None => (Box::new(stdout()), "stdout".to_string()),
        };
        Ok(Self {
            inner: BufWriter::new(inner),
            destination,
        })
    }

    fn finish(mut self) -> Result<()> {
        self.inner
            .flush()
            .with_context(|| format!("failed to write report to {}", self.destination))?;
        log::debug!("report written to {}", self.destination);
        Ok(())
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            strategies: "steady".to_string(),
            list_strategies: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "console".to_string(),
            output: None,
            catalog: None,
            config: None,
            verbose: false,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("supplychain-{}-{name}", std::process::id()))
    }

    fn sample() -> (Vec<PlayRecord>, Vec<StrategyAggregate>) {
        let engine = GameEngine::new(FileData::default()).unwrap();
        let records = run_sweep(&engine, &[GameplayStrategy::Steady], &[3], 1, false).unwrap();
        let aggregates = aggregate_records(&records);
        (records, aggregates)
    }

    #[test]
    fn expand_strategies_handles_all_and_duplicates() {
        assert_eq!(
            expand_strategies("all").unwrap(),
            GameplayStrategy::ALL.to_vec()
        );
        assert_eq!(
            expand_strategies("budget,steady,budget").unwrap(),
            vec![GameplayStrategy::Budget, GameplayStrategy::Steady]
        );
        assert_eq!(
            expand_strategies("steady,bogus").unwrap(),
            vec![GameplayStrategy::Steady]
        );
        assert!(expand_strategies("bogus").is_err());
    }

    #[test]
    fn maybe_list_strategies_writes_output() {
        let temp = temp_path("strategies.txt");
        let args = Args {
            list_strategies: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_strategies(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available strategies"));
        assert!(content.contains("premium"));
    }

    #[test]
    fn maybe_list_strategies_returns_false_when_disabled() {
        assert!(!maybe_list_strategies(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_json_output() {
        let temp = temp_path("report.json");
        let args = Args {
            report: "json".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        let (records, aggregates) = sample();
        write_reports(&args, &records, &aggregates, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("\"aggregates\""));
        assert!(content.contains("\"steady\""));
    }

    #[test]
    fn write_reports_emits_markdown_report() {
        let temp = temp_path("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        let (records, aggregates) = sample();
        write_reports(&args, &records, &aggregates, Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("# Supply Chain Playthrough Results"));
        assert!(content.contains("Steady"));
    }

    #[test]
    fn write_reports_console_without_games() {
        let temp = temp_path("report.txt");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No games played"));
    }

    #[test]
    fn report_sink_defaults_to_stdout() {
        let mut sink = ReportSink::open(None).unwrap();
        assert_eq!(sink.destination, "stdout");
        sink.write_all(b"ok\n").unwrap();
        sink.finish().unwrap();
    }

    #[test]
    fn report_sink_flushes_to_file_on_finish() {
        let temp = temp_path("sink.txt");
        let mut sink = ReportSink::open(Some(&temp)).unwrap();
        writeln!(sink, "hello").unwrap();
        sink.finish().unwrap();
        assert_eq!(std::fs::read_to_string(temp).unwrap(), "hello\n");
    }

    #[test]
    fn report_sink_reports_bad_path() {
        let err = ReportSink::open(Some(Path::new("/nonexistent/dir/report.txt")))
            .err()
            .unwrap();
        assert!(err.to_string().contains("failed to create"));
    }
}
