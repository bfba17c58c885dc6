/*!
 * Job orchestration: request and progress models, the per-job
 * scheduler, and the registry actor that tracks running jobs.
 */

pub mod models;
pub mod registry;
pub mod scheduler;

pub use models::{
    CancelFlag, FileProgress, FileStatus, JobStatus, JobSummary, ProgressEvent, SourceFile,
    TranslationRequest,
};
pub use registry::{JobRegistry, JobSnapshot, SubmittedJob};
pub use scheduler::JobScheduler;
