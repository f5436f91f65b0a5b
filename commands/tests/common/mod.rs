//! Shared wiring for command-layer tests.

#![allow(dead_code)]

use flashcards_commands::{CardCommands, DeckCommands, Notifier};
use flashcards_core::EventPublisher;
use flashcards_testing::{InMemoryStore, RecordingPublisher, test_clock};
use std::sync::Arc;

/// Both command sets over one in-memory store.
pub struct Harness {
    pub store: InMemoryStore,
    pub publisher: RecordingPublisher,
    pub decks: DeckCommands,
    pub cards: CardCommands,
}

impl Harness {
    /// Commands publishing to a recording publisher.
    pub fn new() -> Self {
        let publisher = RecordingPublisher::new();
        Self::with_publisher(publisher.clone(), Arc::new(publisher))
    }

    /// Commands publishing to `publisher`; `recorder` stays empty unless it is
    /// the same publisher.
    pub fn with_publisher(recorder: RecordingPublisher, publisher: Arc<dyn EventPublisher>) -> Self {
        let store = InMemoryStore::new();
        let notifier = Notifier::new(publisher, Arc::new(test_clock()));

        Self {
            decks: DeckCommands::new(Arc::new(store.clone()), notifier.clone()),
            cards: CardCommands::new(Arc::new(store.clone()), notifier),
            store,
            publisher: recorder,
        }
    }
}
