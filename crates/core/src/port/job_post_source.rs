// Job Post Source Port (Interface)
// Read-only access to the jobposts table, one cursor per scan

use crate::domain::JobPostRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Storage that can stream the full jobposts table.
///
/// Implementations decide how connections are acquired (one per scan, or a
/// pool); callers only see cursors.
#[async_trait]
pub trait JobPostSource: Send + Sync {
    /// Open a connection and start a full-table read
    ///
    /// # Errors
    /// - AppError::Database if the connection or query cannot be started
    async fn open(&self) -> Result<Box<dyn JobPostCursor>>;
}

/// Forward-only row stream for one scan.
///
/// Dropping the cursor releases its connection.
#[async_trait]
pub trait JobPostCursor: Send {
    /// Fetch the next row, `None` once the result set is exhausted
    async fn next_record(&mut self) -> Result<Option<JobPostRecord>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Tracks cursors that are currently open
    #[derive(Default)]
    struct CursorGauge {
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    struct GaugeGuard(Arc<CursorGauge>);

    impl GaugeGuard {
        fn acquire(gauge: &Arc<CursorGauge>) -> Self {
            let now = gauge.active.fetch_add(1, Ordering::SeqCst) + 1;
            gauge.max_active.fetch_max(now, Ordering::SeqCst);
            Self(Arc::clone(gauge))
        }
    }

    impl Drop for GaugeGuard {
        fn drop(&mut self) {
            self.0.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// In-memory jobposts table.
    ///
    /// Every `open` snapshots the current rows, like a read-committed scan.
    /// A per-row delay simulates slow fetches so tests can cancel mid-scan
    /// or overrun the polling interval.
    pub struct InMemoryJobPostSource {
        rows: Mutex<Vec<JobPostRecord>>,
        row_delay: Duration,
        open_failures: Mutex<VecDeque<String>>,
        opens: AtomicUsize,
        rows_served: Arc<AtomicUsize>,
        gauge: Arc<CursorGauge>,
    }

    impl InMemoryJobPostSource {
        pub fn new(rows: Vec<JobPostRecord>) -> Self {
            Self {
                rows: Mutex::new(rows),
                row_delay: Duration::ZERO,
                open_failures: Mutex::new(VecDeque::new()),
                opens: AtomicUsize::new(0),
                rows_served: Arc::new(AtomicUsize::new(0)),
                gauge: Arc::new(CursorGauge::default()),
            }
        }

        pub fn with_row_delay(mut self, delay: Duration) -> Self {
            self.row_delay = delay;
            self
        }

        /// Make the next `open` fail with a database error
        pub fn fail_next_open(&self, message: impl Into<String>) {
            self.open_failures.lock().unwrap().push_back(message.into());
        }

        pub fn push(&self, record: JobPostRecord) {
            self.rows.lock().unwrap().push(record);
        }

        /// Number of `open` calls, failed ones included
        pub fn open_count(&self) -> usize {
            self.opens.load(Ordering::SeqCst)
        }

        pub fn rows_served(&self) -> usize {
            self.rows_served.load(Ordering::SeqCst)
        }

        pub fn active_cursors(&self) -> usize {
            self.gauge.active.load(Ordering::SeqCst)
        }

        /// Highest number of cursors ever open at the same time
        pub fn max_concurrent_cursors(&self) -> usize {
            self.gauge.max_active.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobPostSource for InMemoryJobPostSource {
        async fn open(&self) -> Result<Box<dyn JobPostCursor>> {
            self.opens.fetch_add(1, Ordering::SeqCst);

            if let Some(message) = self.open_failures.lock().unwrap().pop_front() {
                return Err(AppError::Database(message));
            }

            let snapshot: VecDeque<JobPostRecord> =
                self.rows.lock().unwrap().iter().cloned().collect();

            Ok(Box::new(InMemoryCursor {
                rows: snapshot,
                row_delay: self.row_delay,
                rows_served: Arc::clone(&self.rows_served),
                _guard: GaugeGuard::acquire(&self.gauge),
            }))
        }
    }

    struct InMemoryCursor {
        rows: VecDeque<JobPostRecord>,
        row_delay: Duration,
        rows_served: Arc<AtomicUsize>,
        _guard: GaugeGuard,
    }

    #[async_trait]
    impl JobPostCursor for InMemoryCursor {
        async fn next_record(&mut self) -> Result<Option<JobPostRecord>> {
            if !self.row_delay.is_zero() {
                tokio::time::sleep(self.row_delay).await;
            }
            let next = self.rows.pop_front();
            if next.is_some() {
                self.rows_served.fetch_add(1, Ordering::SeqCst);
            }
            Ok(next)
        }
    }
}
