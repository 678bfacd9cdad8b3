//! Polling Scheduler - drives one scan per interval until shutdown
//!
//! - No scan at startup: the first tick fires one interval after `run`
//! - A failed tick is logged and the loop carries on
//! - Ticks never overlap: an overrunning scan delays the next tick

use crate::application::scan::{ScanOrchestrator, ScanOutcome};
use crate::application::shutdown::ShutdownToken;
use crate::error::{AppError, Result};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

/// Lifecycle of the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Waiting,
    Running,
    Stopped,
}

/// Fixed-interval driver for the scan orchestrator
pub struct PollingScheduler {
    interval: Duration,
    orchestrator: ScanOrchestrator,
    state: watch::Sender<SchedulerState>,
}

impl PollingScheduler {
    /// Create a new polling scheduler
    ///
    /// # Arguments
    /// * `interval` - Spacing between ticks (must be non-zero)
    /// * `orchestrator` - Scan run on every tick
    pub fn new(interval: Duration, orchestrator: ScanOrchestrator) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            interval,
            orchestrator,
            state,
        }
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Run the polling loop until shutdown
    ///
    /// Should be spawned in tokio::spawn. Fails fast on an interval it cannot
    /// schedule, otherwise only returns once shutdown is observed; scan
    /// errors never escape the loop.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        if self.interval.is_zero() {
            return Err(AppError::Config(
                "polling interval must be greater than 0".to_string(),
            ));
        }

        let start = Instant::now().checked_add(self.interval).ok_or_else(|| {
            AppError::Config(format!(
                "polling interval of {}s is too large to schedule",
                self.interval.as_secs()
            ))
        })?;

        info!(
            interval_secs = self.interval.as_secs(),
            rule = %self.orchestrator.classifier().rule(),
            "Jobpost relay started at: {}",
            Utc::now().to_rfc3339()
        );

        let mut ticker = interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            self.transition(SchedulerState::Waiting);
            tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    info!("Scheduler interrupted while waiting for next tick");
                    break;
                }
                _ = ticker.tick() => {}
            }

            self.transition(SchedulerState::Running);
            if let Err(AppError::Cancelled) = self.tick(&mut shutdown).await {
                break;
            }
        }

        self.transition(SchedulerState::Stopped);
        info!("Jobpost relay stopped");
        Ok(())
    }

    /// Run a single scan now, outside the interval (manual trigger)
    pub async fn run_once(&self, mut shutdown: ShutdownToken) -> Result<ScanOutcome> {
        self.transition(SchedulerState::Running);
        let result = self.tick(&mut shutdown).await;
        self.transition(SchedulerState::Stopped);
        result
    }

    async fn tick(&self, shutdown: &mut ShutdownToken) -> Result<ScanOutcome> {
        let started = Instant::now();
        info!("Processing records at: {}", Utc::now().to_rfc3339());

        match self.orchestrator.run_scan(shutdown).await {
            Ok(outcome) => {
                info!(
                    rows = outcome.rows(),
                    forwarded = outcome.forwarded,
                    skipped = outcome.skipped,
                    trimmed = outcome.trimmed,
                    errored = outcome.errored,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Scan completed"
                );
                Ok(outcome)
            }
            Err(AppError::Cancelled) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Scan interrupted by shutdown"
                );
                Err(AppError::Cancelled)
            }
            Err(e) => {
                error!(
                    error = %e,
                    "Error processing records at: {}",
                    Utc::now().to_rfc3339()
                );
                Err(e)
            }
        }
    }

    fn transition(&self, next: SchedulerState) {
        self.state.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::classifier::RowClassifier;
    use crate::application::shutdown::shutdown_channel;
    use crate::domain::{ClassificationRule, JobPostRecord};
    use crate::port::job_post_source::mocks::InMemoryJobPostSource;
    use crate::port::queue_publisher::mocks::RecordingPublisher;
    use std::sync::Arc;
    use tokio::time::sleep;

    fn scheduler(
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

    #[tokio::test(start_paused = true)]
    async fn test_no_scan_before_first_interval() {
        let source = Arc::new(InMemoryJobPostSource::new(vec![JobPostRecord::new(
            1, "Engineer", "Build",
        )]));
        let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
        let scheduler = scheduler(Duration::from_secs(10), source.clone(), publisher);
        let state = scheduler.subscribe();
        let (tx, token) = shutdown_channel();

        let handle = tokio::spawn(async move { scheduler.run(token).await });

        sleep(Duration::from_secs(9)).await;
        assert_eq!(source.open_count(), 0);
        assert_eq!(*state.borrow(), SchedulerState::Waiting);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(source.open_count(), 1);

        tx.shutdown();
        handle.await.unwrap().unwrap();
        assert_eq!(*state.borrow(), SchedulerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_does_not_stop_loop() {
        let source = Arc::new(InMemoryJobPostSource::new(vec![JobPostRecord::new(
            1, "Engineer", "Build",
        )]));
        source.fail_next_open("connection refused");
        let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
        let scheduler = scheduler(Duration::from_secs(5), source.clone(), publisher.clone());
        let (tx, token) = shutdown_channel();

        let handle = tokio::spawn(async move { scheduler.run(token).await });

        sleep(Duration::from_secs(11)).await;
        tx.shutdown();
        handle.await.unwrap().unwrap();

        assert_eq!(source.open_count(), 2);
        assert_eq!(publisher.payloads(), vec!["Build"]);
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let source = Arc::new(InMemoryJobPostSource::new(vec![]));
        let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
        let scheduler = scheduler(Duration::ZERO, source, publisher);
        let (_tx, token) = shutdown_channel();

        let err = scheduler.run(token).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_unschedulable_interval_is_rejected() {
        let source = Arc::new(InMemoryJobPostSource::new(vec![]));
        let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
        let scheduler = scheduler(Duration::from_secs(u64::MAX), source.clone(), publisher);
        let (_tx, token) = shutdown_channel();

        let err = tokio::spawn(async move { scheduler.run(token).await })
            .await
            .expect("scheduler task panicked")
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(source.open_count(), 0);
    }

    #[tokio::test]
    async fn test_run_once_scans_immediately() {
        let source = Arc::new(InMemoryJobPostSource::new(vec![
            JobPostRecord::new(1, "Engineer", "Build"),
            JobPostRecord::new(2, "Analyst", ""),
        ]));
        let publisher = Arc::new(RecordingPublisher::new("incoming-jobs"));
        let scheduler = scheduler(Duration::from_secs(3600), source, publisher.clone());
        let (_tx, token) = shutdown_channel();

        let outcome = scheduler.run_once(token).await.unwrap();

        assert_eq!(outcome.forwarded, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
    }
}
