mod logging;
mod replay;
mod trace;

use std::{path::PathBuf, process};

use anyhow::{bail, Context, Result};
use clap::Parser;
use logging::Logger;
use swipedeck::DeckConfig;

#[derive(Debug, Parser)]
#[command(name = "deck_replay")]
#[command(about = "Replay recorded pointer traces through the swipe deck")]
struct Cli {
    /// Trace CSV (enqueue/pointer/frame/complete/abandon records).
    trace: PathBuf,
    /// Expected outcome kinds, one per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Deck TOML to use instead of the compiled defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Forward engine debug logs to stderr.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init_engine_log(cli.verbose);

    let mut logger = match Logger::from_env() {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("error: {err:?}");
            process::exit(1);
        }
    };

    if let Err(err) = run(&cli, &mut logger) {
        logger.error(format!("error: {err:?}"));
        process::exit(1);
    }
}

fn run(cli: &Cli, logger: &mut Logger) -> Result<()> {
    let config = load_config(cli)?;
    let steps = trace::parse_trace_file(&cli.trace)?;
    logger.event(
        "info",
        &format!("replay: trace={} steps={}", cli.trace.display(), steps.len()),
    );

    let report = replay::replay(config, &steps)?;
    for sample in &report.traces {
        logger.record("trace", sample);
    }

    let outcomes = report.outcomes;
    println!("outcome,ms,kind,candidate");
    for outcome in &outcomes {
        println!("{}", outcome.csv());
        logger.record("outcome", outcome);
    }

    if let Some(expect_path) = &cli.expect {
        let expected = trace::parse_expected_file(expect_path)?;
        let actual: Vec<&str> = outcomes.iter().map(|o| o.kind).collect();
        if actual != expected {
            logger.error(format!("expected kinds: {}", expected.join(",")));
            logger.error(format!("actual kinds:   {}", actual.join(",")));
            bail!("outcome sequence mismatch");
        }
        logger.info(format!("replay: {} outcomes matched", actual.len()));
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<DeckConfig> {
    let Some(path) = &cli.config else {
        return Ok(*swipedeck::active_config());
    };
    let file = deck_config_compiler::parse_deck_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    deck_config_compiler::validate_config(&file)
        .with_context(|| format!("invalid deck config {}", path.display()))?;
    Ok(replay::deck_config_from_file(&file))
}
