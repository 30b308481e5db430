use crate::engines::generation::evolution_engine::RunStatus;
use crate::types::{GenerationStats, Individual};
use std::sync::mpsc::Sender;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats, best: &Individual);
    fn on_batch_degraded(&mut self, _generation: usize, _reason: &str) {}
}

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats, best: &Individual) {
        log::info!(
            "Generation {} complete. Best: {:.2}, Avg: {:.2}, Diversity: {} | {}",
            stats.gen,
            stats.fitness,
            stats.avg_fitness,
            stats.genome_diversity,
            best.phenotype.sentence
        );
    }

    fn on_batch_degraded(&mut self, generation: usize, reason: &str) {
        log::warn!("Generation {} used a degraded batch: {}", generation, reason);
    }
}

// For handing progress to another thread
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete {
        stats: GenerationStats,
        best_sentence: String,
    },
    BatchDegraded {
        generation: usize,
        reason: String,
    },
    StepFailed {
        generation: usize,
        error: String,
    },
    Status(RunStatus),
}

pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats, best: &Individual) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            stats: stats.clone(),
            best_sentence: best.phenotype.sentence.clone(),
        });
    }

    fn on_batch_degraded(&mut self, generation: usize, reason: &str) {
        let _ = self.sender.send(ProgressMessage::BatchDegraded {
            generation,
            reason: reason.to_string(),
        });
    }
}
