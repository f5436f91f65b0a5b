//! `PostgreSQL` repositories for the flashcards service.
//!
//! This crate implements [`DeckRepository`](flashcards_core::DeckRepository) and
//! [`CardRepository`](flashcards_core::CardRepository) on top of a sqlx
//! connection pool.
//!
//! # Schema
//!
//! The schema is owned by the database, not by this crate. The repositories
//! expect:
//!
//! ```sql
//! CREATE TABLE decks (
//!     id BIGSERIAL PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     description TEXT NOT NULL,
//!     author TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//!
//! CREATE TABLE cards (
//!     id BIGSERIAL PRIMARY KEY,
//!     front TEXT NOT NULL,
//!     back TEXT NOT NULL,
//!     deck_id BIGINT NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
//!     author TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```
//!
//! # Example
//!
//! ```ignore
//! use flashcards_postgres::{connect, PoolSettings, PostgresDeckRepository};
//!
//! let pool = connect(&PoolSettings::new("postgres://localhost/flashcards")).await?;
//! let decks = PostgresDeckRepository::new(pool.clone());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod card;
mod deck;

pub use card::PostgresCardRepository;
pub use deck::PostgresDeckRepository;

use flashcards_core::RepositoryError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    /// Settings with default pool sizing for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Open a connection pool.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the database is unreachable.
pub async fn connect(settings: &PoolSettings) -> Result<PgPool, RepositoryError> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(&settings.url)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to connect: {e}")))?;

    tracing::info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "PostgreSQL pool created"
    );

    Ok(pool)
}

/// Map a driver error to [`RepositoryError::Database`], prefixed with what was
/// being attempted (`"Failed to get deck: ..."`).
pub(crate) fn database_error(
    context: &'static str,
) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |e| RepositoryError::Database(format!("{context}: {e}"))
}
