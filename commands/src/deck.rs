//! Deck commands.

use crate::error::CommandError;
use crate::notifier::Notifier;
use crate::types::{
    ByIdRequest, CreateDeckRequest, DeckResponse, DeckWithCardsResponse, DeleteResponse,
    UpdateDeckRequest,
};
use crate::validate::Validate;
use crate::ResourceCommands;
use flashcards_core::{DeckRepository, OperationType};
use std::future::Future;
use std::sync::Arc;

const NOT_FOUND: &str = "Deck not found";

/// Commands over decks.
#[derive(Clone)]
pub struct DeckCommands {
    repository: Arc<dyn DeckRepository>,
    notifier: Notifier,
}

impl DeckCommands {
    /// Create the deck command set.
    #[must_use]
    pub fn new(repository: Arc<dyn DeckRepository>, notifier: Notifier) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Load a deck together with all of its cards (`GetDeckById`).
    ///
    /// # Errors
    ///
    /// - [`CommandError::InvalidArgument`] when `id <= 0`
    /// - [`CommandError::NotFound`] when no deck has this id
    /// - [`CommandError::Internal`] on storage failure
    pub async fn get_with_cards(
        &self,
        request: ByIdRequest,
    ) -> Result<DeckWithCardsResponse, CommandError> {
        self.notifier
            .observe(OperationType::GetDeckById, async {
                request.validate()?;

                let aggregate = self
                    .repository
                    .get_with_cards_by_id(request.id)
                    .await
                    .map_err(|e| {
                        CommandError::from_repository(&e, NOT_FOUND, "Failed to get deck with cards")
                    })?;

                self.notifier
                    .notify(OperationType::GetDeckById, &request)
                    .await;
                Ok(DeckWithCardsResponse::from(aggregate))
            })
            .await
    }
}

impl ResourceCommands for DeckCommands {
    type CreateRequest = CreateDeckRequest;
    type UpdateRequest = UpdateDeckRequest;
    type Response = DeckResponse;

    fn create(
        &self,
        request: CreateDeckRequest,
    ) -> impl Future<Output = Result<DeckResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::CreateDeck, async move {
            request.validate()?;

            let id = self.repository.add(&request.to_deck()).await.map_err(|e| {
                tracing::error!(error = %e, "Deck insert failed");
                CommandError::internal("Failed to add deck")
            })?;

            let deck = self.repository.get_by_id(id).await.map_err(|e| {
                tracing::error!(deck_id = id, error = %e, "Deck re-read after insert failed");
                CommandError::internal("Failed to retrieve deck after creation")
            })?;

            tracing::debug!(deck_id = id, "Deck created");
            self.notifier
                .notify(OperationType::CreateDeck, &request)
                .await;
            Ok(DeckResponse::from(deck))
        })
    }

    fn get_by_id(
        &self,
        request: ByIdRequest,
    ) -> impl Future<Output = Result<DeckResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::GetDeckById, async move {
            request.validate()?;

            let deck = self
                .repository
                .get_by_id(request.id)
                .await
                .map_err(|e| CommandError::from_repository(&e, NOT_FOUND, "Failed to get deck"))?;

            self.notifier
                .notify(OperationType::GetDeckById, &request)
                .await;
            Ok(DeckResponse::from(deck))
        })
    }

    fn update(
        &self,
        request: UpdateDeckRequest,
    ) -> impl Future<Output = Result<DeckResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::UpdateDeck, async move {
            request.validate()?;

            let affected = self.repository.update(&request.to_deck()).await.map_err(|e| {
                tracing::error!(deck_id = request.id, error = %e, "Deck update failed");
                CommandError::internal("Failed to update deck")
            })?;

            if affected == 0 {
                return Err(CommandError::not_found(NOT_FOUND));
            }

            self.notifier
                .notify(OperationType::UpdateDeck, &request)
                .await;
            Ok(DeckResponse::from(request))
        })
    }

    fn delete(
        &self,
        request: ByIdRequest,
    ) -> impl Future<Output = Result<DeleteResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::DeleteDeck, async move {
            request.validate()?;

            self.repository
                .delete(request.id)
                .await
                .map_err(|e| CommandError::from_repository(&e, NOT_FOUND, "Failed to delete deck"))?;

            tracing::debug!(deck_id = request.id, "Deck deleted");
            self.notifier
                .notify(OperationType::DeleteDeck, &request)
                .await;
            Ok(DeleteResponse {})
        })
    }
}

impl std::fmt::Debug for DeckCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckCommands")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
