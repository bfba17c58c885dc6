/*!
 * Job registry lifecycle tests
 */

use std::sync::Arc;

use subtrans::jobs::{JobRegistry, JobScheduler, JobStatus, ProgressEvent};
use subtrans::providers::mock::{MockBehavior, MockClient};

use crate::common;

fn registry_with(client: MockClient) -> JobRegistry {
    JobRegistry::new(Arc::new(JobScheduler::with_client(Arc::new(client))))
}

#[tokio::test]
async fn test_submit_withWorkingClient_shouldStreamEventsToCompletion() {
    let registry = registry_with(MockClient::working());
    let request = common::request_for("movie.srt", common::SAMPLE_SRT, common::test_settings());

    let mut job = registry.submit(request).await.expect("registry alive");
    assert!(!job.job_id.is_empty());

    let mut saw_file_complete = false;
    let mut saw_all_complete = false;
    while let Some(event) = job.events.recv().await {
        match event {
            ProgressEvent::FileComplete { file, .. } => {
                assert_eq!(file, "movie.srt");
                saw_file_complete = true;
            }
            ProgressEvent::AllComplete { files } => {
                assert_eq!(files, vec!["movie.srt"]);
                saw_all_complete = true;
            }
            _ => {}
        }
    }
    assert!(saw_file_complete);
    assert!(saw_all_complete);

    // The registry records the final summary once the job task reports in
    let mut snapshot = registry.snapshot(&job.job_id).await.expect("job known");
    for _ in 0..50 {
        if snapshot.summary.is_some() {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        snapshot = registry.snapshot(&job.job_id).await.expect("job known");
    }
    assert_eq!(snapshot.status, JobStatus::Completed);
    let summary = snapshot.summary.expect("summary recorded");
    assert_eq!(summary.completed, vec!["movie.srt"]);
}

#[tokio::test]
async fn test_snapshot_withUnknownJob_shouldReturnNone() {
    let registry = registry_with(MockClient::working());
    assert!(registry.snapshot("no-such-job").await.is_none());
}

#[tokio::test]
async fn test_cancel_withUnknownJob_shouldReturnFalse() {
    let registry = registry_with(MockClient::working());
    assert!(!registry.cancel("no-such-job").await);
}

#[tokio::test]
async fn test_cancel_withSlowJob_shouldEndCancelled() {
    let registry = registry_with(MockClient::new(MockBehavior::Slow { delay_ms: 50 }));
    let mut settings = common::test_settings();
    settings.batch_size = 1;
    settings.concurrent_requests = 1;
    let request = common::request_for("movie.srt", common::SAMPLE_SRT, settings);

    let mut job = registry.submit(request).await.expect("registry alive");
    assert!(registry.cancel(&job.job_id).await);

    let mut saw_cancelled = false;
    while let Some(event) = job.events.recv().await {
        if matches!(event, ProgressEvent::Cancelled { .. }) {
            saw_cancelled = true;
        }
    }
    assert!(saw_cancelled);

    let mut snapshot = registry.snapshot(&job.job_id).await.expect("job known");
    for _ in 0..50 {
        if snapshot.summary.is_some() {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        snapshot = registry.snapshot(&job.job_id).await.expect("job known");
    }
    assert_eq!(snapshot.status, JobStatus::Cancelled);
}
