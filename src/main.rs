//! mnemevolve CLI
//!
//! Evolves an acrostic mnemonic for a list of terms against an LLM oracle endpoint.
//!
//! ```bash
//! mnemevolve --terms planets.txt --topic "planets in order" --output run.json
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use mnemevolve::config::ConfigManager;
use mnemevolve::engines::generation::{EvolutionEngine, ProgressMessage};
use mnemevolve::engines::oracle::http::HttpOracle;
use mnemevolve::services::EvolutionRunner;
use mnemevolve::utils::{default_terms, first_letters, parse_terms, DEFAULT_TOPIC};

/// Evolve a mnemonic sentence whose word initials spell out the given terms
#[derive(Parser)]
#[command(name = "mnemevolve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File with one term per line (defaults to the eight planets)
    #[arg(short, long)]
    terms: Option<PathBuf>,

    /// Topic the mnemonic is about
    #[arg(long, default_value = DEFAULT_TOPIC)]
    topic: String,

    /// TOML configuration file (MNEMO__* environment variables apply on top)
    #[arg(short, long, env = "MNEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Oracle endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    population: Option<usize>,

    #[arg(long)]
    mutation_rate: Option<f64>,

    #[arg(long)]
    elite: Option<usize>,

    #[arg(long)]
    generations: Option<usize>,

    /// Seed for reproducible role draws
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum spacing between oracle calls in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Write the final run snapshot as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let manager = ConfigManager::new();
    match &cli.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => manager
            .load_from_env()
            .context("Failed to read MNEMO__ environment overrides")?,
    }
    manager
        .update(|config| {
            let evolution = &mut config.evolution;
            if let Some(v) = cli.population {
                evolution.population_size = v;
            }
            if let Some(v) = cli.mutation_rate {
                evolution.mutation_rate = v;
            }
            if let Some(v) = cli.elite {
                evolution.elite_size = v;
            }
            if let Some(v) = cli.generations {
                evolution.max_generations = v;
            }
            if let Some(v) = cli.pacing_ms {
                evolution.pacing_delay_ms = v;
            }
            if cli.seed.is_some() {
                evolution.seed = cli.seed;
            }
            if let Some(endpoint) = &cli.endpoint {
                config.oracle.endpoint = endpoint.clone();
            }
        })
        .context("Invalid settings")?;
    let config = manager.get();

    let terms = match &cli.terms {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read terms: {}", path.display()))?;
            parse_terms(&text)
        }
        None => default_terms(),
    };
    if terms.is_empty() {
        anyhow::bail!("No terms to build a mnemonic for");
    }

    let letters: String = first_letters(&terms).into_iter().collect();
    log::info!("Evolving a mnemonic for {} ({} terms)", letters, terms.len());

    let oracle = HttpOracle::new(&config.oracle).context("Failed to build oracle client")?;
    log::info!("Oracle endpoint: {}", oracle.endpoint());

    let engine = EvolutionEngine::new(config.evolution.clone(), config.fitness.clone(), oracle)?;
    let runner = EvolutionRunner::start(engine, terms, cli.topic.clone())?;

    for message in runner.progress() {
        match message {
            ProgressMessage::GenerationStart(generation) => {
                log::debug!("Generation {} starting...", generation);
            }
            ProgressMessage::GenerationComplete {
                stats,
                best_sentence,
            } => {
                println!(
                    "gen {:>3}  best {:>6.2}  avg {:>6.2}  diversity {:>2}  {}",
                    stats.gen, stats.fitness, stats.avg_fitness, stats.genome_diversity, best_sentence
                );
            }
            ProgressMessage::BatchDegraded { generation, reason } => {
                log::warn!("Generation {} degraded: {}", generation, reason);
            }
            ProgressMessage::StepFailed { generation, error } => {
                log::error!("Generation {} failed: {}", generation, error);
                // A paused run would wait for a command forever
                runner.stop()?;
            }
            ProgressMessage::Status(status) => {
                log::debug!("Run status: {:?}", status);
            }
        }
    }

    let snapshot = runner
        .join()
        .context("Evolution run failed")?
        .context("Run was reset before completion")?;

    match &snapshot.best_solution {
        Some(best) => println!("\nBest ({:.2}): {}", best.fitness, best.phenotype.sentence),
        None => println!("\nNo solution found"),
    }

    if let Some(path) = &cli.output {
        let json = snapshot.to_json_pretty()?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        log::info!("Snapshot written to {}", path.display());
    }

    Ok(())
}
