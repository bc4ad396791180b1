use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::playthrough::{PlayRecord, StrategyAggregate};

#[derive(Serialize)]
struct JsonReport<'a> {
    games: usize,
    failed_games: usize,
    aggregates: &'a [StrategyAggregate],
    records: &'a [PlayRecord],
}

fn failed_games(records: &[PlayRecord]) -> usize {
    records.iter().filter(|r| !r.passed()).count()
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[PlayRecord],
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Playthrough Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total = records.len();
    let failed = failed_games(records);
    writeln!(out, "Games played: {total}")?;
    writeln!(out, "Clean: {}", (total - failed).to_string().green())?;
    writeln!(out, "Invariant failures: {}", failed.to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for aggregate in aggregates {
        let status = if aggregate.violations == 0 {
            "✅".green()
        } else {
            "❌".red()
        };
        writeln!(out, "{status} {}", aggregate.strategy.label().bold())?;
        writeln!(
            out,
            "   Score: mean {:.0} (min {:.0}, max {:.0})",
            aggregate.mean_score, aggregate.min_score, aggregate.max_score
        )?;
        writeln!(
            out,
            "   Mean cash {:.0}, satisfaction {:.1}, months {:.1}",
            aggregate.mean_final_cash, aggregate.mean_satisfaction, aggregate.mean_rounds
        )?;
        writeln!(
            out,
            "   Endings: {} end of term, {} bankrupt, {} exodus",
            aggregate.end_of_term.to_string().green(),
            aggregate.bankruptcies.to_string().red(),
            aggregate.customer_exoduses.to_string().yellow()
        )?;
        writeln!(out)?;
    }

    let failures: Vec<&PlayRecord> = records.iter().filter(|r| !r.passed()).collect();
    if !failures.is_empty() {
        writeln!(out, "{}", "⚠️  Invariant Violations".bright_red().bold())?;
        writeln!(out, "{}", "=======================".red())?;
        for record in failures {
            writeln!(out, "{} seed {}:", record.strategy, record.seed)?;
            for violation in &record.violations {
                writeln!(out, "     • {}", violation.red())?;
            }
        }
    }

    if let (Some(best), Some(worst)) = (
        aggregates
            .iter()
            .max_by(|a, b| a.mean_score.total_cmp(&b.mean_score)),
        aggregates
            .iter()
            .min_by(|a, b| a.mean_score.total_cmp(&b.mean_score)),
    ) {
        writeln!(out, "{}", "🏆 Strategy Ranking".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        writeln!(
            out,
            "Best: {} ({:.0})",
            best.strategy.label().green(),
            best.mean_score
        )?;
        writeln!(
            out,
            "Worst: {} ({:.0})",
            worst.strategy.label().yellow(),
            worst.mean_score
        )?;
    }

    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    records: &[PlayRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    let report = JsonReport {
        games: records.len(),
        failed_games: failed_games(records),
        aggregates,
        records,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[PlayRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(out, "# Supply Chain Playthrough Results\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Games played**: {}", records.len())?;
    writeln!(out, "- **Invariant failures**: {}\n", failed_games(records))?;

    writeln!(out, "## Strategies\n")?;
    writeln!(
        out,
        "| Strategy | Games | Mean score | Min | Max | End of term | Bankrupt | Exodus |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|")?;
    for a in aggregates {
        writeln!(
            out,
            "| {} | {} | {:.0} | {:.0} | {:.0} | {} | {} | {} |",
            a.strategy.label(),
            a.games,
            a.mean_score,
            a.min_score,
            a.max_score,
            a.end_of_term,
            a.bankruptcies,
            a.customer_exoduses
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Games\n")?;
    for record in records {
        let status = if record.passed() { "✅" } else { "❌" };
        writeln!(
            out,
            "- {status} **{}** seed {}: {} after {} months, score {}",
            record.strategy.label(),
            record.seed,
            record.summary.ending,
            record.summary.rounds_played,
            record.summary.display_score()
        )?;
        for violation in &record.violations {
            writeln!(out, "  - {violation}")?;
        }
    }

    Ok(())
}
