use crate::config::traits::ConfigSection;
use crate::config::{EvolutionConfig, FitnessConfig};
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::population::{initialize_population, Population};
use crate::engines::generation::progress::ProgressCallback;
use crate::engines::generation::reproduction::reproduce;
use crate::engines::oracle::PhenotypeOracle;
use crate::error::{MnemonicError, Result};
use crate::types::{GenerationStats, Individual, RunSnapshot};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Lifecycle of a run.
///
/// ```text
/// Idle -> Initializing -> Evolving <-> Paused
///                             |           |
///                             +--> Terminated
/// ```
/// `reset` returns to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Idle,
    Initializing,
    Evolving,
    Paused,
    Terminated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A generation was added and more remain.
    Advanced(GenerationStats),
    /// The last allowed generation was added; the run is now terminated.
    Completed(GenerationStats),
}

impl StepOutcome {
    pub fn stats(&self) -> &GenerationStats {
        match self {
            StepOutcome::Advanced(stats) | StepOutcome::Completed(stats) => stats,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunState {
    pub generation: usize,
    pub population: Population,
    pub best_solution: Option<Individual>,
    pub history: Vec<GenerationStats>,
}

struct ActiveRun {
    target_words: Vec<String>,
    topic: String,
    evaluator: FitnessEvaluator,
    state: RunState,
}

/// Drives one run at a time through the generation loop.
///
/// Every mutating operation takes `&mut self`, so pause, resume and stop requests can
/// only land between generation steps, never while an oracle call is in flight.
pub struct EvolutionEngine<O: PhenotypeOracle> {
    config: EvolutionConfig,
    fitness_config: FitnessConfig,
    oracle: O,
    rng: StdRng,
    status: RunStatus,
    run: Option<ActiveRun>,
    last_oracle_call: Option<Instant>,
}

impl<O: PhenotypeOracle> EvolutionEngine<O> {
    pub fn new(config: EvolutionConfig, fitness_config: FitnessConfig, oracle: O) -> Result<Self> {
        config.validate()?;
        fitness_config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            fitness_config,
            oracle,
            rng,
            status: RunStatus::Idle,
            run: None,
            last_oracle_call: None,
        })
    }

    /// Build generation 0 and enter `Evolving`. Only valid from `Idle`.
    pub fn start<C: ProgressCallback>(
        &mut self,
        target_words: Vec<String>,
        topic: impl Into<String>,
        callback: &mut C,
    ) -> Result<()> {
        if self.status != RunStatus::Idle {
            return Err(MnemonicError::InvalidState(format!(
                "cannot start a run while {:?}",
                self.status
            )));
        }

        let topic = topic.into();
        self.transition(RunStatus::Initializing);

        let evaluator = FitnessEvaluator::new(target_words.clone(), self.fitness_config.clone());
        let initialized = initialize_population(
            &self.oracle,
            &evaluator,
            &topic,
            self.config.population_size,
            self.config.role_policy,
            &mut self.rng,
        );
        self.last_oracle_call = Some(Instant::now());

        let seeded = initialized.and_then(|population| {
            match (population.stats(0), population.best().cloned()) {
                (Some(stats), Some(best)) => Ok((population, stats, best)),
                _ => Err(MnemonicError::Initialization(
                    "initial population is empty".to_string(),
                )),
            }
        });

        let (population, stats, best) = match seeded {
            Ok(seeded) => seeded,
            Err(e) => {
                log::error!("Initialization failed: {}", e);
                self.transition(RunStatus::Idle);
                return Err(match e {
                    MnemonicError::Initialization(_) => e,
                    other => MnemonicError::Initialization(other.to_string()),
                });
            }
        };

        callback.on_generation_complete(&stats, &best);
        self.run = Some(ActiveRun {
            target_words,
            topic,
            evaluator,
            state: RunState {
                generation: 0,
                population,
                best_solution: Some(best),
                history: vec![stats],
            },
        });
        self.transition(RunStatus::Evolving);
        Ok(())
    }

    /// Run one generation. A failure that leaves no population pauses the run.
    pub fn step<C: ProgressCallback>(&mut self, callback: &mut C) -> Result<StepOutcome> {
        if self.status != RunStatus::Evolving {
            return Err(MnemonicError::InvalidState(format!(
                "cannot step while {:?}",
                self.status
            )));
        }

        let generation = self.generation();
        if generation >= self.config.max_generations {
            self.transition(RunStatus::Terminated);
            return Err(MnemonicError::InvalidState(
                "run already reached max generations".to_string(),
            ));
        }

        let next = generation + 1;
        callback.on_generation_start(next);
        self.pace();

        match self.advance(next, callback) {
            Ok(stats) if next >= self.config.max_generations => {
                log::info!("Run complete after {} generations", next);
                self.transition(RunStatus::Terminated);
                Ok(StepOutcome::Completed(stats))
            }
            Ok(stats) => Ok(StepOutcome::Advanced(stats)),
            Err(e) => {
                log::error!("Generation {} failed: {}", next, e);
                self.transition(RunStatus::Paused);
                Err(e)
            }
        }
    }

    /// Step until the run leaves `Evolving`.
    pub fn run<C: ProgressCallback>(&mut self, callback: &mut C) -> Result<RunStatus> {
        while self.status == RunStatus::Evolving {
            self.step(callback)?;
        }
        Ok(self.status)
    }

    pub fn pause(&mut self) -> Result<()> {
        match self.status {
            RunStatus::Evolving => {
                self.transition(RunStatus::Paused);
                Ok(())
            }
            RunStatus::Paused => Ok(()),
            other => Err(MnemonicError::InvalidState(format!(
                "cannot pause while {:?}",
                other
            ))),
        }
    }

    /// Continue from the existing population and generation counter.
    pub fn resume(&mut self) -> Result<()> {
        match self.status {
            RunStatus::Paused if self.generation() >= self.config.max_generations => {
                self.transition(RunStatus::Terminated);
                Ok(())
            }
            RunStatus::Paused => {
                self.transition(RunStatus::Evolving);
                Ok(())
            }
            RunStatus::Evolving => Ok(()),
            other => Err(MnemonicError::InvalidState(format!(
                "cannot resume while {:?}",
                other
            ))),
        }
    }

    pub fn stop(&mut self) -> Result<()> {
        match self.status {
            RunStatus::Evolving | RunStatus::Paused => {
                self.transition(RunStatus::Terminated);
                Ok(())
            }
            RunStatus::Terminated => Ok(()),
            other => Err(MnemonicError::InvalidState(format!(
                "cannot stop while {:?}",
                other
            ))),
        }
    }

    /// Discard the run entirely.
    pub fn reset(&mut self) {
        self.run = None;
        self.last_oracle_call = None;
        self.transition(RunStatus::Idle);
    }

    /// Replace the settings. Not allowed mid-initialization or after termination.
    pub fn update_config(&mut self, config: EvolutionConfig) -> Result<()> {
        if !matches!(self.status, RunStatus::Idle | RunStatus::Paused) {
            return Err(MnemonicError::InvalidState(format!(
                "cannot change settings while {:?}",
                self.status
            )));
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn state(&self) -> Option<&RunState> {
        self.run.as_ref().map(|r| &r.state)
    }

    pub fn generation(&self) -> usize {
        self.state().map(|s| s.generation).unwrap_or(0)
    }

    pub fn best_solution(&self) -> Option<&Individual> {
        self.state().and_then(|s| s.best_solution.as_ref())
    }

    pub fn history(&self) -> &[GenerationStats] {
        self.state().map(|s| s.history.as_slice()).unwrap_or(&[])
    }

    pub fn snapshot(&self) -> Option<RunSnapshot> {
        let run = self.run.as_ref()?;
        Some(RunSnapshot {
            generation: run.state.generation,
            population: run.state.population.individuals().to_vec(),
            best_solution: run.state.best_solution.clone(),
            history: run.state.history.clone(),
            settings: self.config.clone(),
            topic: run.topic.clone(),
            target_words: run.target_words.clone(),
            exported_at: chrono::Utc::now(),
        })
    }

    fn advance<C: ProgressCallback>(&mut self, next: usize, callback: &mut C) -> Result<GenerationStats> {
        let run = self
            .run
            .as_mut()
            .ok_or_else(|| MnemonicError::InvalidState("no active run".to_string()))?;

        let genomes = reproduce(&run.state.population, &self.config, &mut self.rng)?;
        let batch = self
            .oracle
            .generate_batch(&genomes, &run.topic, &run.target_words);
        self.last_oracle_call = Some(Instant::now());
        let batch = batch?;

        if let Some(reason) = batch.degradation_reason() {
            callback.on_batch_degraded(next, &reason);
        }

        let population = Population::from_individuals(
            run.evaluator.score_batch(&genomes, batch.into_phenotypes()),
        );
        let (stats, best) = match (population.stats(next), population.best()) {
            (Some(stats), Some(best)) => (stats, best.clone()),
            _ => {
                return Err(MnemonicError::EmptyPopulation(format!(
                    "generation {} produced no individuals",
                    next
                )))
            }
        };

        callback.on_generation_complete(&stats, &best);
        run.state.population = population;
        run.state.best_solution = Some(best);
        run.state.history.push(stats.clone());
        run.state.generation = next;
        Ok(stats)
    }

    /// Sleep out whatever remains of the minimum spacing since the previous oracle call.
    fn pace(&self) {
        let delay = self.config.pacing_delay();
        if delay.is_zero() {
            return;
        }
        if let Some(last) = self.last_oracle_call {
            let elapsed = last.elapsed();
            if elapsed < delay {
                let wait = delay - elapsed;
                log::debug!("Pacing oracle calls, waiting {:?}", wait);
                std::thread::sleep(wait);
            }
        }
    }

    fn transition(&mut self, to: RunStatus) {
        if self.status != to {
            log::debug!("Run status {:?} -> {:?}", self.status, to);
            self.status = to;
        }
    }
}
