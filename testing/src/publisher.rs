//! Notification publishers for tests.

use flashcards_core::{BusError, Envelope, EventPublisher, OperationType};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Publisher that records every envelope it is given.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<Envelope>>>,
}

impl RecordingPublisher {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Envelopes published so far, in order.
    #[must_use]
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    /// Operation types published so far, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<OperationType> {
        self.envelopes().iter().map(|e| e.operation).collect()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(
        &self,
        envelope: &Envelope,
    ) -> Pin<Box<dyn Future<Output = Result<(), BusError>> + Send + '_>> {
        let envelope = envelope.clone();

        Box::pin(async move {
            self.published
                .lock()
                .map_err(|_| BusError::Transport("recorder lock poisoned".to_string()))?
                .push(envelope);
            Ok(())
        })
    }
}

/// Publisher whose every publish fails, counting the attempts.
#[derive(Debug, Clone, Default)]
pub struct FailingPublisher {
    attempts: Arc<Mutex<usize>>,
}

impl FailingPublisher {
    /// Create a publisher that always fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of publish attempts so far.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|n| *n).unwrap_or_default()
    }
}

impl EventPublisher for FailingPublisher {
    fn publish(
        &self,
        _envelope: &Envelope,
    ) -> Pin<Box<dyn Future<Output = Result<(), BusError>> + Send + '_>> {
        Box::pin(async move {
            if let Ok(mut attempts) = self.attempts.lock() {
                *attempts += 1;
            }
            Err(BusError::PublishFailed {
                topic: "flashcards-events".to_string(),
                reason: "broker unavailable".to_string(),
            })
        })
    }
}
