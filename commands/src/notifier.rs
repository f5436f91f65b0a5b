//! Best-effort notification policy.
//!
//! Every successful command publishes one [`Envelope`]. A failed publish is
//! logged at `warn` and counted, and the command still succeeds: callers never
//! see notification failures.

use crate::error::CommandError;
use flashcards_core::environment::Clock;
use flashcards_core::{Envelope, EventPublisher, OperationType};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

/// Default service name carried on command spans.
pub const DEFAULT_SERVICE_NAME: &str = "flashcards";

/// Shared command context: the notification capability, the clock that
/// timestamps envelopes and the service name that scopes command spans.
#[derive(Clone)]
pub struct Notifier {
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    service_name: String,
}

impl Notifier {
    /// Create a notifier with the default service name.
    #[must_use]
    pub fn new(publisher: Arc<dyn EventPublisher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            publisher,
            clock,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }

    /// Set the service name recorded on command spans.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Configured service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Span wrapping one command execution.
    #[must_use]
    pub fn span(&self, operation: OperationType) -> tracing::Span {
        tracing::info_span!(
            "command",
            service = %self.service_name,
            resource = operation.resource(),
            operation = %operation,
        )
    }

    /// Run one command inside its span and record its outcome.
    ///
    /// Internal errors are logged at `error`; the other kinds are the
    /// caller's fault and only logged at `debug`.
    pub async fn observe<T, F>(&self, operation: OperationType, command: F) -> Result<T, CommandError>
    where
        F: Future<Output = Result<T, CommandError>> + Send,
    {
        let span = self.span(operation);
        let result = command.instrument(span.clone()).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(error @ CommandError::Internal(_)) => {
                span.in_scope(|| tracing::error!(error = %error, "Command failed"));
                error.kind().as_str()
            },
            Err(error) => {
                span.in_scope(|| tracing::debug!(error = %error, "Command rejected"));
                error.kind().as_str()
            },
        };

        metrics::counter!(
            "flashcards.commands.total",
            "resource" => operation.resource(),
            "operation" => operation.as_str(),
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    /// Publish an envelope for `request`, logging and dropping any failure.
    pub async fn notify<T>(&self, operation: OperationType, request: &T)
    where
        T: Serialize + ?Sized + Sync,
    {
        let result = match Envelope::for_request(self.clock.now(), operation, request) {
            Ok(envelope) => self.publisher.publish(&envelope).await,
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(()) => {
                tracing::debug!(operation = %operation, "Notification sent");
                "ok"
            },
            Err(error) => {
                tracing::warn!(
                    operation = %operation,
                    error = %error,
                    "Failed to send notification"
                );
                "failed"
            },
        };

        metrics::counter!(
            "flashcards.notifications.total",
            "operation" => operation.as_str(),
            "outcome" => outcome
        )
        .increment(1);
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("service_name", &self.service_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashcards_testing::{FailingPublisher, RecordingPublisher, test_clock};

    #[tokio::test]
    async fn envelope_carries_clock_time_and_serialized_request() {
        let publisher = RecordingPublisher::new();
        let notifier = Notifier::new(Arc::new(publisher.clone()), Arc::new(test_clock()));

        notifier
            .notify(OperationType::DeleteDeck, &crate::ByIdRequest::new(5))
            .await;

        let envelopes = publisher.envelopes();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].timestamp, test_clock().now());
        assert_eq!(envelopes[0].operation, OperationType::DeleteDeck);
        assert_eq!(envelopes[0].raw_query, r#"{"id":5}"#);
    }

    #[tokio::test]
    async fn publish_failure_is_swallowed() {
        let publisher = FailingPublisher::new();
        let notifier = Notifier::new(Arc::new(publisher.clone()), Arc::new(test_clock()));

        notifier
            .notify(OperationType::GetCardById, &crate::ByIdRequest::new(1))
            .await;

        assert_eq!(publisher.attempts(), 1);
    }

    #[tokio::test]
    async fn observe_passes_the_result_through() {
        let notifier = Notifier::new(Arc::new(RecordingPublisher::new()), Arc::new(test_clock()));

        let ok = notifier
            .observe(OperationType::CreateDeck, async { Ok::<_, CommandError>(7) })
            .await;
        let err = notifier
            .observe(OperationType::CreateDeck, async {
                Err::<i64, _>(CommandError::internal("boom"))
            })
            .await;

        assert_eq!(ok, Ok(7));
        assert_eq!(err, Err(CommandError::Internal("boom".to_string())));
    }

    #[test]
    fn service_name_defaults_and_overrides() {
        let notifier = Notifier::new(Arc::new(RecordingPublisher::new()), Arc::new(test_clock()));
        assert_eq!(notifier.service_name(), DEFAULT_SERVICE_NAME);

        let notifier = notifier.with_service_name("flashcards-eu");
        assert_eq!(notifier.service_name(), "flashcards-eu");
    }
}
