//! Background installer.
//!
//! Runs install and uninstall jobs on a dedicated thread so the caller's
//! presentation layer stays responsive. Jobs run one at a time.

use super::manager::ToolManager;
use super::types::{InstallOutcome, UninstallOutcome};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Identifies the tool a job acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRef {
    /// Category name.
    pub category: String,
    /// Tool name.
    pub tool: String,
    /// Tool source URL.
    pub url: String,
}

impl ToolRef {
    /// Creates a new tool reference.
    #[must_use]
    pub fn new(category: &str, tool: &str, url: &str) -> Self {
        Self {
            category: category.to_string(),
            tool: tool.to_string(),
            url: url.to_string(),
        }
    }
}

/// Job sent to the background thread.
#[derive(Debug, Clone)]
pub enum JobRequest {
    /// Install a tool.
    Install(ToolRef),
    /// Uninstall a tool.
    Uninstall(ToolRef),
}

/// Result of a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    /// An install job finished.
    Installed {
        tool: ToolRef,
        outcome: InstallOutcome,
    },
    /// An uninstall job finished.
    Uninstalled {
        tool: ToolRef,
        outcome: UninstallOutcome,
    },
}

impl JobResult {
    /// Returns the tool the job acted on.
    #[must_use]
    pub fn tool(&self) -> &ToolRef {
        match self {
            Self::Installed { tool, .. } | Self::Uninstalled { tool, .. } => tool,
        }
    }
}

/// Status of the background worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    /// No job in progress.
    Idle,
    /// Currently installing a tool.
    Installing,
    /// Currently uninstalling a tool.
    Uninstalling,
}

/// Runs install and uninstall jobs off the caller's thread.
pub struct BackgroundInstaller {
    /// Sender for jobs to the background thread.
    request_tx: Sender<JobRequest>,
    /// Receiver for results from the background thread.
    result_rx: Receiver<JobResult>,
    /// Current status.
    status: Arc<Mutex<WorkerStatus>>,
    /// Handle to the background thread.
    _thread_handle: JoinHandle<()>,
}

impl BackgroundInstaller {
    /// Starts the worker thread.
    #[must_use]
    pub fn new(manager: Arc<ToolManager>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<JobRequest>();
        let (result_tx, result_rx) = mpsc::channel::<JobResult>();
        let status = Arc::new(Mutex::new(WorkerStatus::Idle));
        let status_clone = Arc::clone(&status);

        let thread_handle = thread::spawn(move || {
            info!("[WORKER] Background thread started");
            Self::run_job_loop(&request_rx, &result_tx, &status_clone, &manager);
            info!("[WORKER] Background thread exiting");
        });

        Self {
            request_tx,
            result_rx,
            status,
            _thread_handle: thread_handle,
        }
    }

    /// Processes jobs until the request channel closes.
    fn run_job_loop(
        request_rx: &Receiver<JobRequest>,
        result_tx: &Sender<JobResult>,
        status: &Mutex<WorkerStatus>,
        manager: &ToolManager,
    ) {
        while let Ok(request) = request_rx.recv() {
            debug!("[WORKER] Received job: {:?}", request);

            let result = match request {
                JobRequest::Install(tool) => {
                    set_status(status, WorkerStatus::Installing);
                    let outcome = manager.install(&tool.category, &tool.tool, &tool.url);
                    JobResult::Installed { tool, outcome }
                }
                JobRequest::Uninstall(tool) => {
                    set_status(status, WorkerStatus::Uninstalling);
                    let outcome = manager.uninstall(&tool.category, &tool.tool, &tool.url);
                    JobResult::Uninstalled { tool, outcome }
                }
            };

            set_status(status, WorkerStatus::Idle);

            if result_tx.send(result).is_err() {
                warn!("[WORKER] Result channel closed, exiting");
                break;
            }
        }
    }

    /// Queues an install job. Non-blocking.
    pub fn submit_install(&self, category: &str, tool: &str, url: &str) {
        self.submit(JobRequest::Install(ToolRef::new(category, tool, url)));
    }

    /// Queues an uninstall job. Non-blocking.
    pub fn submit_uninstall(&self, category: &str, tool: &str, url: &str) {
        self.submit(JobRequest::Uninstall(ToolRef::new(category, tool, url)));
    }

    fn submit(&self, request: JobRequest) {
        info!("[WORKER] Queueing {:?}", request);
        if let Err(e) = self.request_tx.send(request) {
            warn!("[WORKER] Failed to queue job: {}", e);
        }
    }

    /// Returns a finished job's result if one is available. Non-blocking.
    pub fn poll_result(&self) -> Option<JobResult> {
        match self.result_rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                warn!("[WORKER] Result channel disconnected");
                None
            }
        }
    }

    /// Waits up to `timeout` for the next finished job.
    pub fn wait_result(&self, timeout: Duration) -> Option<JobResult> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("[WORKER] Result channel disconnected");
                None
            }
        }
    }

    /// Returns the current status of the worker.
    #[must_use]
    pub fn status(&self) -> WorkerStatus {
        self.status.lock().map(|s| *s).unwrap_or(WorkerStatus::Idle)
    }
}

fn set_status(status: &Mutex<WorkerStatus>, value: WorkerStatus) {
    if let Ok(mut s) = status.lock() {
        *s = value;
    }
}
