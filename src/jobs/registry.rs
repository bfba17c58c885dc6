/*!
 * Job bookkeeping behind a message-passing actor.
 *
 * The registry owns every job's cancel flag and final summary; callers
 * talk to it through cloneable handles, so no lock is ever held across
 * an await outside the actor task.
 */

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::models::{CancelFlag, JobStatus, JobSummary, ProgressEvent, TranslationRequest};
use super::scheduler::JobScheduler;

/// Point-in-time view of a job held by the registry
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    /// Registry identifier of the job
    pub job_id: String,
    /// Current lifecycle state
    pub status: JobStatus,
    /// Final summary, present once the job has stopped running
    pub summary: Option<JobSummary>,
}

enum Command {
    Submit {
        request: TranslationRequest,
        reply: oneshot::Sender<SubmittedJob>,
    },
    Snapshot {
        job_id: String,
        reply: oneshot::Sender<Option<JobSnapshot>>,
    },
    Cancel {
        job_id: String,
        reply: oneshot::Sender<bool>,
    },
    Finished {
        job_id: String,
        summary: JobSummary,
    },
}

/// Handle returned to the submitter of a job
pub struct SubmittedJob {
    /// Identifier for later snapshot and cancel calls
    pub job_id: String,
    /// Live event stream for this job only
    pub events: mpsc::UnboundedReceiver<ProgressEvent>,
}

struct JobRecord {
    status: JobStatus,
    cancel: CancelFlag,
    summary: Option<JobSummary>,
}

/// Cloneable front end to the registry actor
#[derive(Clone)]
pub struct JobRegistry {
    commands: mpsc::Sender<Command>,
}

impl JobRegistry {
    /// Spawn the registry actor around a scheduler
    pub fn new(scheduler: Arc<JobScheduler>) -> Self {
        let (commands, inbox) = mpsc::channel(64);
        let registry = Self {
            commands: commands.clone(),
        };
        tokio::spawn(actor_loop(scheduler, commands, inbox));
        registry
    }

    /// Submit a job; returns its id and a live event receiver.
    ///
    /// Returns `None` only when the registry actor has shut down.
    pub async fn submit(&self, request: TranslationRequest) -> Option<SubmittedJob> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Submit { request, reply })
            .await
            .ok()?;
        response.await.ok()
    }

    /// Look up a job's current state
    pub async fn snapshot(&self, job_id: &str) -> Option<JobSnapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot {
                job_id: job_id.to_string(),
                reply,
            })
            .await
            .ok()?;
        response.await.ok().flatten()
    }

    /// Request cooperative cancellation; true if the job was known
    pub async fn cancel(&self, job_id: &str) -> bool {
        let (reply, response) = oneshot::channel();
        if self
            .commands
            .send(Command::Cancel {
                job_id: job_id.to_string(),
                reply,
            })
            .await
            .is_err()
        {
            return false;
        }
        response.await.unwrap_or(false)
    }
}

async fn actor_loop(
    scheduler: Arc<JobScheduler>,
    commands: mpsc::Sender<Command>,
    mut inbox: mpsc::Receiver<Command>,
) {
    let mut jobs: HashMap<String, JobRecord> = HashMap::new();

    while let Some(command) = inbox.recv().await {
        match command {
            Command::Submit { request, reply } => {
                let job_id = new_job_id();
                let cancel = CancelFlag::new();
                let (events_tx, events_rx) = mpsc::unbounded_channel();
                jobs.insert(
                    job_id.clone(),
                    JobRecord {
                        status: JobStatus::Running,
                        cancel: cancel.clone(),
                        summary: None,
                    },
                );
                info!("Job {} submitted with {} file(s)", job_id, request.files.len());

                let scheduler = Arc::clone(&scheduler);
                let commands = commands.clone();
                let task_job_id = job_id.clone();
                tokio::spawn(async move {
                    let summary = scheduler.run(request, events_tx, cancel).await;
                    // The actor may already be gone during shutdown
                    let _ = commands
                        .send(Command::Finished {
                            job_id: task_job_id,
                            summary,
                        })
                        .await;
                });

                let _ = reply.send(SubmittedJob {
                    job_id,
                    events: events_rx,
                });
            }
            Command::Snapshot { job_id, reply } => {
                let snapshot = jobs.get(&job_id).map(|record| JobSnapshot {
                    job_id: job_id.clone(),
                    status: record.status,
                    summary: record.summary.clone(),
                });
                let _ = reply.send(snapshot);
            }
            Command::Cancel { job_id, reply } => {
                let known = match jobs.get(&job_id) {
                    Some(record) => {
                        record.cancel.cancel();
                        info!("Job {} cancellation requested", job_id);
                        true
                    }
                    None => {
                        warn!("Cancel requested for unknown job {}", job_id);
                        false
                    }
                };
                let _ = reply.send(known);
            }
            Command::Finished { job_id, summary } => {
                debug!("Job {} finished: {:?}", job_id, summary.status);
                if let Some(record) = jobs.get_mut(&job_id) {
                    record.status = summary.status;
                    record.summary = Some(summary);
                }
            }
        }
    }
}

fn new_job_id() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}
