//! Background run execution for interactive front ends.
//!
//! The integrator runs on its own thread; the caller polls or blocks on a
//! channel. The grid travels back only inside [`WorkerMessage::Complete`],
//! after every row has been computed.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};

use crate::error::{AppError, AppResult};
use crate::progress::RunProgressEvent;
use crate::run_service::{self, RunRequest, RunResponse};

#[derive(Debug)]
pub enum WorkerMessage {
    Progress(RunProgressEvent),
    Complete(Box<RunResponse>),
    Failed(AppError),
}

pub struct RunWorker {
    pub progress_rx: Receiver<WorkerMessage>,
    handle: Option<JoinHandle<()>>,
}

impl RunWorker {
    /// Spawn the run and return immediately.
    pub fn start(request: RunRequest) -> AppResult<Self> {
        let (tx, rx) = channel();

        let handle = thread::Builder::new()
            .name("rodheat-run".to_string())
            .spawn(move || Self::run_simulation(&request, &tx))?;

        Ok(Self {
            progress_rx: rx,
            handle: Some(handle),
        })
    }

    fn run_simulation(request: &RunRequest, tx: &Sender<WorkerMessage>) {
        let mut forward = |event: RunProgressEvent| {
            // receiver gone means nobody is listening; the run still finishes
            let _ = tx.send(WorkerMessage::Progress(event));
        };
        let message = match run_service::run_with_progress(request, Some(&mut forward)) {
            Ok(response) => WorkerMessage::Complete(Box::new(response)),
            Err(e) => {
                tracing::debug!(error = %e, "run failed on worker");
                WorkerMessage::Failed(e)
            }
        };
        let _ = tx.send(message);
    }

    /// Next pending message without blocking (for UI event loops).
    ///
    /// `Ok(None)` means the run is still going with nothing new to report.
    pub fn try_next(&self) -> AppResult<Option<WorkerMessage>> {
        match self.progress_rx.try_recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(AppError::Worker {
                message: "worker exited without a result".to_string(),
            }),
        }
    }

    /// Block until the run ends, passing progress events to `on_progress`.
    pub fn wait_with(
        mut self,
        mut on_progress: impl FnMut(&RunProgressEvent),
    ) -> AppResult<RunResponse> {
        let outcome = loop {
            match self.progress_rx.recv() {
                Ok(WorkerMessage::Progress(event)) => on_progress(&event),
                Ok(WorkerMessage::Complete(response)) => break Ok(*response),
                Ok(WorkerMessage::Failed(e)) => break Err(e),
                Err(_) => {
                    break Err(AppError::Worker {
                        message: "worker exited without a result".to_string(),
                    });
                }
            }
        };
        self.join()?;
        outcome
    }

    /// Block until the run ends, discarding progress.
    pub fn wait(self) -> AppResult<RunResponse> {
        self.wait_with(|_| {})
    }

    fn join(&mut self) -> AppResult<()> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| AppError::Worker {
                message: "worker thread panicked".to_string(),
            })?;
        }
        Ok(())
    }
}
