use crate::engines::generation::evolution_engine::{EvolutionEngine, RunStatus};
use crate::engines::generation::progress::{ChannelProgressCallback, ProgressMessage};
use crate::engines::oracle::PhenotypeOracle;
use crate::error::{MnemonicError, Result};
use crate::types::RunSnapshot;
use std::sync::mpsc::{self, channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

/// Control requests delivered to the run thread. They take effect between generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerCommand {
    Pause,
    Resume,
    Stop,
    Reset,
}

/// Final snapshot of the run, or `None` when it was reset.
pub type RunnerResult = Result<Option<RunSnapshot>>;

/// Owns an [`EvolutionEngine`] on a background thread.
pub struct EvolutionRunner {
    handle: Option<JoinHandle<RunnerResult>>,
    progress_rx: Receiver<ProgressMessage>,
    commands: Sender<RunnerCommand>,
}

impl EvolutionRunner {
    /// Spawn the run thread. Initialization happens on that thread; a failure ends it
    /// and is reported through [`EvolutionRunner::join`].
    pub fn start<O>(
        engine: EvolutionEngine<O>,
        target_words: Vec<String>,
        topic: String,
    ) -> Result<Self>
    where
        O: PhenotypeOracle + 'static,
    {
        let (progress_tx, progress_rx) = channel();
        let (command_tx, command_rx) = channel();

        let handle = thread::Builder::new()
            .name("mnemevolve-run".to_string())
            .spawn(move || Self::run_loop(engine, target_words, topic, command_rx, progress_tx))?;

        Ok(Self {
            handle: Some(handle),
            progress_rx,
            commands: command_tx,
        })
    }

    pub fn send(&self, command: RunnerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| MnemonicError::InvalidState("run thread has exited".to_string()))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(RunnerCommand::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(RunnerCommand::Resume)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(RunnerCommand::Stop)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(RunnerCommand::Reset)
    }

    /// Poll for progress updates (non-blocking)
    pub fn poll_progress(&self) -> Option<ProgressMessage> {
        self.progress_rx.try_recv().ok()
    }

    /// Blocking iterator over progress. Ends once the run thread has exited.
    pub fn progress(&self) -> mpsc::Iter<'_, ProgressMessage> {
        self.progress_rx.iter()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Results if the thread is done, without blocking.
    pub fn try_get_results(&mut self) -> Option<RunnerResult> {
        let handle = self.handle.take()?;
        if handle.is_finished() {
            Some(Self::collect(handle))
        } else {
            self.handle = Some(handle);
            None
        }
    }

    /// Block until the run thread exits.
    pub fn join(mut self) -> RunnerResult {
        match self.handle.take() {
            Some(handle) => Self::collect(handle),
            None => Err(MnemonicError::InvalidState(
                "run results were already collected".to_string(),
            )),
        }
    }

    fn collect(handle: JoinHandle<RunnerResult>) -> RunnerResult {
        handle
            .join()
            .unwrap_or_else(|_| Err(MnemonicError::InvalidState("run thread panicked".to_string())))
    }

    fn run_loop<O: PhenotypeOracle>(
        mut engine: EvolutionEngine<O>,
        target_words: Vec<String>,
        topic: String,
        commands: Receiver<RunnerCommand>,
        progress_tx: Sender<ProgressMessage>,
    ) -> RunnerResult {
        let mut callback = ChannelProgressCallback::new(progress_tx.clone());
        let notify = |status: RunStatus| {
            let _ = progress_tx.send(ProgressMessage::Status(status));
        };

        notify(RunStatus::Initializing);
        if let Err(e) = engine.start(target_words, topic, &mut callback) {
            notify(engine.status());
            return Err(e);
        }
        let mut reported = engine.status();
        notify(reported);

        loop {
            loop {
                match commands.try_recv() {
                    Ok(command) => Self::apply(&mut engine, command),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        Self::apply(&mut engine, RunnerCommand::Stop);
                        break;
                    }
                }
            }

            match engine.status() {
                RunStatus::Evolving => {
                    let generation = engine.generation() + 1;
                    if let Err(e) = engine.step(&mut callback) {
                        let _ = progress_tx.send(ProgressMessage::StepFailed {
                            generation,
                            error: e.to_string(),
                        });
                    }
                }
                RunStatus::Paused => {
                    if reported != RunStatus::Paused {
                        notify(RunStatus::Paused);
                        reported = RunStatus::Paused;
                    }
                    // Nothing to do until the next command
                    match commands.recv() {
                        Ok(command) => Self::apply(&mut engine, command),
                        Err(_) => Self::apply(&mut engine, RunnerCommand::Stop),
                    }
                }
                RunStatus::Terminated | RunStatus::Idle | RunStatus::Initializing => {}
            }

            let status = engine.status();
            if status != reported {
                notify(status);
                reported = status;
            }
            match status {
                RunStatus::Terminated => return Ok(engine.snapshot()),
                RunStatus::Idle => return Ok(None),
                _ => {}
            }
        }
    }

    fn apply<O: PhenotypeOracle>(engine: &mut EvolutionEngine<O>, command: RunnerCommand) {
        log::debug!("Runner command: {:?}", command);
        let result = match command {
            RunnerCommand::Pause => engine.pause(),
            RunnerCommand::Resume => engine.resume(),
            RunnerCommand::Stop => engine.stop(),
            RunnerCommand::Reset => {
                engine.reset();
                Ok(())
            }
        };
        if let Err(e) = result {
            log::warn!("Ignoring {:?}: {}", command, e);
        }
    }
}

impl Drop for EvolutionRunner {
    fn drop(&mut self) {
        let _ = self.commands.send(RunnerCommand::Stop);
    }
}
