//! # Flashcards Commands
//!
//! The command layer of the flashcards service: one command set per resource
//! kind ([`DeckCommands`], [`CardCommands`]), each validating its request,
//! orchestrating the repository, classifying failures as [`CommandError`] and
//! publishing a best-effort notification through the [`Notifier`].
//!
//! ## Flow
//!
//! ```text
//! request ──► validate ──► repository ──► notify (best effort) ──► response
//!               │              │
//!               ▼              ▼
//!        InvalidArgument   NotFound / Internal
//! ```
//!
//! Commands are stateless; a command set can be shared across any number of
//! concurrent requests.
//!
//! ## Example
//!
//! ```ignore
//! use flashcards_commands::{CreateDeckRequest, DeckCommands, Notifier, ResourceCommands};
//!
//! let decks = DeckCommands::new(deck_repository, Notifier::new(publisher, clock));
//! let deck = decks
//!     .create(CreateDeckRequest {
//!         title: "Algebra".into(),
//!         description: "Basics".into(),
//!         author: "Ana".into(),
//!     })
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod card;
mod deck;
pub mod error;
pub mod notifier;
pub mod types;
pub mod validate;

pub use card::CardCommands;
pub use deck::DeckCommands;
pub use error::{CommandError, ErrorKind};
pub use notifier::Notifier;
pub use types::{
    ByIdRequest, CardResponse, CreateCardRequest, CreateDeckRequest, DeckResponse,
    DeckWithCardsResponse, DeleteResponse, UpdateCardRequest, UpdateDeckRequest,
};
pub use validate::Validate;

use std::future::Future;

/// Command capability shared by every resource kind.
///
/// Each method is a single request/response exchange; failures are one of
/// the three [`CommandError`] kinds.
pub trait ResourceCommands: Send + Sync {
    /// Create request.
    type CreateRequest: Send;
    /// Update request.
    type UpdateRequest: Send;
    /// Entity as returned to callers.
    type Response: Send;

    /// Validate, persist, re-read and notify.
    ///
    /// # Errors
    ///
    /// - [`CommandError::InvalidArgument`] when a required field is empty
    /// - [`CommandError::Internal`] when persisting or re-reading fails
    fn create(
        &self,
        request: Self::CreateRequest,
    ) -> impl Future<Output = Result<Self::Response, CommandError>> + Send;

    /// Load one entity.
    ///
    /// # Errors
    ///
    /// - [`CommandError::InvalidArgument`] when `id <= 0`
    /// - [`CommandError::NotFound`] when no entity has this id
    /// - [`CommandError::Internal`] on storage failure
    fn get_by_id(
        &self,
        request: ByIdRequest,
    ) -> impl Future<Output = Result<Self::Response, CommandError>> + Send;

    /// Overwrite an entity's fields. The response echoes the request.
    ///
    /// # Errors
    ///
    /// - [`CommandError::InvalidArgument`] when `id <= 0` or a required field is empty
    /// - [`CommandError::NotFound`] when no row was affected
    /// - [`CommandError::Internal`] on storage failure
    fn update(
        &self,
        request: Self::UpdateRequest,
    ) -> impl Future<Output = Result<Self::Response, CommandError>> + Send;

    /// Hard-delete an entity.
    ///
    /// # Errors
    ///
    /// - [`CommandError::InvalidArgument`] when `id <= 0`
    /// - [`CommandError::NotFound`] when nothing was deleted
    /// - [`CommandError::Internal`] on storage failure
    fn delete(
        &self,
        request: ByIdRequest,
    ) -> impl Future<Output = Result<DeleteResponse, CommandError>> + Send;
}
