//! Card commands.

use crate::error::CommandError;
use crate::notifier::Notifier;
use crate::types::{ByIdRequest, CardResponse, CreateCardRequest, DeleteResponse, UpdateCardRequest};
use crate::validate::Validate;
use crate::ResourceCommands;
use flashcards_core::{CardRepository, OperationType};
use std::future::Future;
use std::sync::Arc;

const NOT_FOUND: &str = "Card not found";

/// Commands over cards.
#[derive(Clone)]
pub struct CardCommands {
    repository: Arc<dyn CardRepository>,
    notifier: Notifier,
}

impl CardCommands {
    /// Create the card command set.
    #[must_use]
    pub fn new(repository: Arc<dyn CardRepository>, notifier: Notifier) -> Self {
        Self {
            repository,
            notifier,
        }
    }
}

impl ResourceCommands for CardCommands {
    type CreateRequest = CreateCardRequest;
    type UpdateRequest = UpdateCardRequest;
    type Response = CardResponse;

    fn create(
        &self,
        request: CreateCardRequest,
    ) -> impl Future<Output = Result<CardResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::CreateCard, async move {
            request.validate()?;

            let id = self.repository.add(&request.to_card()).await.map_err(|e| {
                tracing::error!(deck_id = request.deck_id, error = %e, "Card insert failed");
                CommandError::internal("Failed to add card")
            })?;

            let card = self.repository.get_by_id(id).await.map_err(|e| {
                tracing::error!(card_id = id, error = %e, "Card re-read after insert failed");
                CommandError::internal("Failed to retrieve card after creation")
            })?;

            tracing::debug!(card_id = id, deck_id = card.deck_id, "Card created");
            self.notifier
                .notify(OperationType::CreateCard, &request)
                .await;
            Ok(CardResponse::from(card))
        })
    }

    fn get_by_id(
        &self,
        request: ByIdRequest,
    ) -> impl Future<Output = Result<CardResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::GetCardById, async move {
            request.validate()?;

            let card = self
                .repository
                .get_by_id(request.id)
                .await
                .map_err(|e| CommandError::from_repository(&e, NOT_FOUND, "Failed to get card"))?;

            self.notifier
                .notify(OperationType::GetCardById, &request)
                .await;
            Ok(CardResponse::from(card))
        })
    }

    fn update(
        &self,
        request: UpdateCardRequest,
    ) -> impl Future<Output = Result<CardResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::UpdateCard, async move {
            request.validate()?;

            let affected = self.repository.update(&request.to_card()).await.map_err(|e| {
                tracing::error!(card_id = request.id, error = %e, "Card update failed");
                CommandError::internal("Failed to update card")
            })?;

            if affected == 0 {
                return Err(CommandError::not_found(NOT_FOUND));
            }

            self.notifier
                .notify(OperationType::UpdateCard, &request)
                .await;
            Ok(CardResponse::from(request))
        })
    }

    fn delete(
        &self,
        request: ByIdRequest,
    ) -> impl Future<Output = Result<DeleteResponse, CommandError>> + Send {
        self.notifier.observe(OperationType::DeleteCard, async move {
            request.validate()?;

            self.repository
                .delete(request.id)
                .await
                .map_err(|e| CommandError::from_repository(&e, NOT_FOUND, "Failed to delete card"))?;

            tracing::debug!(card_id = request.id, "Card deleted");
            self.notifier
                .notify(OperationType::DeleteCard, &request)
                .await;
            Ok(DeleteResponse {})
        })
    }
}

impl std::fmt::Debug for CardCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardCommands")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
