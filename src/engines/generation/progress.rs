use super::evolution_engine::{GenerationReport, ProgressCallback};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ignores every event.
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_individual_evaluated(&mut self, _index: usize, _total: usize) {}
    fn on_generation_complete(&mut self, _report: &GenerationReport) {}
}

/// Reports progress through the `log` facade.
pub struct LogProgressCallback {
    max_generations: usize,
}

impl LogProgressCallback {
    pub fn new(max_generations: usize) -> Self {
        Self { max_generations }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::info!("Generation {}/{} starting...", generation, self.max_generations);
    }

    fn on_individual_evaluated(&mut self, index: usize, total: usize) {
        if index % 10 == 0 || index == total {
            log::debug!("  Evaluated {}/{} individuals", index, total);
        }
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        if let Some(mean) = report.mean_fitness {
            log::info!(
                "Generation {} complete. Mean fitness: {:.4}, global best: {:.4}, mutated: {}",
                report.generation,
                mean,
                report.global_best_fitness,
                report.mutations
            );
        } else {
            log::warn!(
                "Generation {} complete with every evaluation failed",
                report.generation
            );
        }
    }
}

// For driving a run from another thread
pub enum ProgressMessage {
    GenerationStart(usize),
    IndividualEvaluated { current: usize, total: usize },
    GenerationComplete(GenerationReport),
}

pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
    cancel: Arc<AtomicBool>,
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self {
            sender,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share a flag that abandons the run at the next generation boundary once set.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_individual_evaluated(&mut self, index: usize, total: usize) {
        let _ = self.sender.send(ProgressMessage::IndividualEvaluated {
            current: index,
            total,
        });
    }

    fn on_generation_complete(&mut self, report: &GenerationReport) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete(report.clone()));
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}
