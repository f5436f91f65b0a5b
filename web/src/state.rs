//! Application state for Axum handlers.

use flashcards_commands::{CardCommands, DeckCommands};

/// Command sets shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Deck commands.
    pub decks: DeckCommands,
    /// Card commands.
    pub cards: CardCommands,
}

impl AppState {
    /// Create the application state.
    #[must_use]
    pub const fn new(decks: DeckCommands, cards: CardCommands) -> Self {
        Self { decks, cards }
    }
}
