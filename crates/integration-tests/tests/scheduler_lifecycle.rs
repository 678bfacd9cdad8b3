//! Polling scheduler lifecycle tests
//!
//! Tick spacing, overlap and shutdown behaviour under paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use jobpost_relay_core::application::{
    shutdown_channel, PollingScheduler, RowClassifier, ScanOrchestrator, SchedulerState,
};
use jobpost_relay_core::domain::{ClassificationRule, JobPostRecord};
use jobpost_relay_core::port::job_post_source::mocks::InMemoryJobPostSource;
use jobpost_relay_core::port::queue_publisher::mocks::RecordingPublisher;
use tokio::time::sleep;

fn rows(count: i32) -> Vec<JobPostRecord> {
    (1..=count)
        .map(|id| JobPostRecord::new(id, format!("title {}", id), format!("job {}", id)))
        .collect()
}

fn build(
    interval: Duration,
    source: Arc<InMemoryJobPostSource>,
    publisher: Arc<RecordingPublisher>,
) -> PollingScheduler {
    let orchestrator = ScanOrchestrator::new(
        source,
        publisher,
        RowClassifier::new(ClassificationRule::DescriptionForward),
    );
    PollingScheduler::new(interval, orchestrator)
}

/// A scan longer than the interval delays the next tick instead of overlapping it
#[tokio::test(start_paused = true)]
async fn test_slow_scan_never_overlaps_next_tick() {
    // 1s per fetch against a 1s interval
    let source = Arc::new(InMemoryJobPostSource::new(rows(3)).with_row_delay(Duration::from_secs(1)));
    let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
    let scheduler = build(Duration::from_secs(1), source.clone(), publisher.clone());
    let (tx, token) = shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(token).await });

    // First tick at t=1s; a scan is 4 fetches (3 rows + end of set) = 4s
    sleep(Duration::from_millis(9_500)).await;
    tx.shutdown();
    handle.await.unwrap().unwrap();

    assert_eq!(source.max_concurrent_cursors(), 1, "ticks overlapped");
    assert_eq!(source.active_cursors(), 0);
    // Scans at t=1..5 and t=5..9 complete, the third is cancelled at 9.5s
    assert_eq!(source.open_count(), 3);
    assert_eq!(publisher.payloads().len(), 6);
}

/// Shutdown mid-scan: current row finishes, next row never starts, state ends Stopped
#[tokio::test(start_paused = true)]
async fn test_shutdown_mid_scan_reaches_stopped() {
    let source = Arc::new(InMemoryJobPostSource::new(rows(5)).with_row_delay(Duration::from_secs(1)));
    let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
    let scheduler = build(Duration::from_secs(2), source.clone(), publisher.clone());
    let mut state = scheduler.subscribe();
    let (tx, token) = shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(token).await });

    // Tick at t=2s, rows arrive at t=3s and t=4s; stop halfway to the third
    sleep(Duration::from_millis(4_500)).await;
    assert_eq!(*state.borrow_and_update(), SchedulerState::Running);

    tx.shutdown();
    let result = handle.await.unwrap();

    assert!(result.is_ok(), "cancellation is not an error");
    assert_eq!(*state.borrow(), SchedulerState::Stopped);
    assert_eq!(source.rows_served(), 2);
    assert_eq!(publisher.payloads(), vec!["job 1", "job 2"]);
    assert_eq!(source.active_cursors(), 0, "storage cursor left open");
    assert_eq!(publisher.open_connections(), 0, "broker connection left open");
}

/// Shutdown while idle between ticks stops without another scan
#[tokio::test(start_paused = true)]
async fn test_shutdown_while_waiting() {
    let source = Arc::new(InMemoryJobPostSource::new(rows(1)));
    let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
    let scheduler = build(Duration::from_secs(30), source.clone(), publisher);
    let state = scheduler.subscribe();
    let (tx, token) = shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(token).await });

    sleep(Duration::from_secs(45)).await;
    assert_eq!(*state.borrow(), SchedulerState::Waiting);
    tx.shutdown();
    handle.await.unwrap().unwrap();

    assert_eq!(source.open_count(), 1);
    assert_eq!(*state.borrow(), SchedulerState::Stopped);
}

/// Storage outages only cost the ticks they hit
#[tokio::test(start_paused = true)]
async fn test_storage_outage_heals_on_next_tick() {
    let source = Arc::new(InMemoryJobPostSource::new(rows(2)));
    source.fail_next_open("connection refused");
    source.fail_next_open("connection refused");
    let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
    let scheduler = build(Duration::from_secs(10), source.clone(), publisher.clone());
    let (tx, token) = shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(token).await });

    // Ticks at 10s and 20s fail, 30s and 40s succeed
    sleep(Duration::from_secs(45)).await;
    tx.shutdown();
    handle.await.unwrap().unwrap();

    assert_eq!(source.open_count(), 4);
    assert_eq!(publisher.payloads(), vec!["job 1", "job 2", "job 1", "job 2"]);
}

/// Broker outage on every row never stops the loop
#[tokio::test(start_paused = true)]
async fn test_broker_outage_keeps_polling() {
    let source = Arc::new(InMemoryJobPostSource::new(rows(2)));
    let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
    publisher.fail_payload("job 1");
    publisher.fail_payload("job 2");
    let scheduler = build(Duration::from_secs(5), source.clone(), publisher.clone());
    let (tx, token) = shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(token).await });

    sleep(Duration::from_secs(16)).await;
    tx.shutdown();
    handle.await.unwrap().unwrap();

    assert_eq!(source.open_count(), 3);
    assert_eq!(publisher.attempts(), 6);
    assert!(publisher.messages().is_empty());
}
