// Scan Orchestrator - one full pass over the jobposts table

use crate::application::classifier::RowClassifier;
use crate::application::shutdown::ShutdownToken;
use crate::domain::{JobPostRecord, PublishDecision, RowEvent};
use crate::error::Result;
use crate::port::{JobPostSource, QueuePublisher};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Per-row tallies for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub forwarded: usize,
    pub skipped: usize,
    /// Rows whose title needed trimming (title audit only, also counted as skipped)
    pub trimmed: usize,
    pub errored: usize,
}

impl ScanOutcome {
    /// Rows read from storage
    pub fn rows(&self) -> usize {
        self.forwarded + self.skipped + self.errored
    }
}

/// Streams rows from storage, classifies them and publishes qualifying ones.
///
/// Rows are handled one at a time in the order storage returns them. A
/// failed publish only affects its own row; a storage failure ends the scan.
pub struct ScanOrchestrator {
    source: Arc<dyn JobPostSource>,
    publisher: Arc<dyn QueuePublisher>,
    classifier: RowClassifier,
}

impl ScanOrchestrator {
    pub fn new(
        source: Arc<dyn JobPostSource>,
        publisher: Arc<dyn QueuePublisher>,
        classifier: RowClassifier,
    ) -> Self {
        Self {
            source,
            publisher,
            classifier,
        }
    }

    pub fn classifier(&self) -> &RowClassifier {
        &self.classifier
    }

    /// Run one scan.
    ///
    /// # Errors
    /// - AppError::Database if the cursor cannot be opened or a fetch fails
    /// - AppError::Cancelled if shutdown arrives at any suspension point;
    ///   the cursor is dropped before returning, closing its connection
    pub async fn run_scan(&self, shutdown: &mut ShutdownToken) -> Result<ScanOutcome> {
        let mut cursor = shutdown.until_shutdown(self.source.open()).await??;
        let mut outcome = ScanOutcome::default();

        loop {
            let record = match shutdown.until_shutdown(cursor.next_record()).await?? {
                Some(record) => record,
                None => break,
            };
            self.process_record(&record, shutdown, &mut outcome).await?;
        }

        Ok(outcome)
    }

    async fn process_record(
        &self,
        record: &JobPostRecord,
        shutdown: &mut ShutdownToken,
        outcome: &mut ScanOutcome,
    ) -> Result<()> {
        let classification = self.classifier.classify(record);
        let event = &classification.event;

        match event {
            RowEvent::Trimmed {
                original,
                normalized,
                ..
            } => {
                info!(id = event.id(), event = event.kind(), original = %original, trimmed = %normalized, "{}", event);
                outcome.trimmed += 1;
            }
            RowEvent::Qualified { .. } => {
                debug!(id = event.id(), event = event.kind(), "{}", event);
            }
            RowEvent::NoAction { .. } | RowEvent::NotNeeded { .. } => {
                info!(id = event.id(), event = event.kind(), "{}", event);
            }
        }

        let payload = match classification.decision {
            PublishDecision::Skip => {
                outcome.skipped += 1;
                return Ok(());
            }
            PublishDecision::Forward(payload) => payload,
        };

        match shutdown
            .until_shutdown(self.publisher.publish(&payload))
            .await?
        {
            Ok(()) => {
                info!(
                    id = record.id,
                    queue = %self.publisher.queue_name(),
                    bytes = payload.len(),
                    "Forwarded job post {} to queue", record.id
                );
                outcome.forwarded += 1;
            }
            Err(e) => {
                error!(
                    id = record.id,
                    queue = %e.queue,
                    stage = %e.kind,
                    error = %e,
                    "Failed to forward job post {}", record.id
                );
                outcome.errored += 1;
            }
        }

        Ok(())
    }
}
