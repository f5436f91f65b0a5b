//! Deck repository.

use crate::database_error;
use chrono::{DateTime, Utc};
use flashcards_core::repository::RepositoryFuture;
use flashcards_core::{Card, Deck, DeckId, DeckRepository, DeckWithCards, RepositoryError};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

/// `PostgreSQL`-backed [`DeckRepository`].
#[derive(Clone)]
pub struct PostgresDeckRepository {
    pool: PgPool,
}

impl PostgresDeckRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_deck(row: &PgRow) -> Result<Deck, sqlx::Error> {
        Ok(Deck {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            author: row.try_get("author")?,
            created_at: Some(row.try_get("created_at")?),
        })
    }

    /// Card side of a `decks LEFT JOIN cards` row; all-NULL becomes a placeholder.
    fn row_to_joined_card(row: &PgRow) -> Result<Card, sqlx::Error> {
        let Some(id) = row.try_get::<Option<i64>, _>("card_id")? else {
            return Ok(Card::new("", "", 0, ""));
        };

        Ok(Card {
            id,
            front: row.try_get("card_front")?,
            back: row.try_get("card_back")?,
            deck_id: row.try_get("card_deck_id")?,
            author: row.try_get("card_author")?,
            created_at: row.try_get::<Option<DateTime<Utc>>, _>("card_created_at")?,
        })
    }
}

impl DeckRepository for PostgresDeckRepository {
    fn add(&self, deck: &Deck) -> RepositoryFuture<'_, DeckId> {
        let deck = deck.clone();

        Box::pin(async move {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO decks (title, description, author) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&deck.title)
            .bind(&deck.description)
            .bind(&deck.author)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error("Failed to insert deck"))?;

            tracing::debug!(deck_id = id, "Deck inserted");
            Ok(id)
        })
    }

    fn get_by_id(&self, id: DeckId) -> RepositoryFuture<'_, Deck> {
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT id, title, description, author, created_at FROM decks WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("Failed to get deck"))?
            .ok_or(RepositoryError::deck_not_found(id))?;

            Self::row_to_deck(&row).map_err(database_error("Failed to decode deck"))
        })
    }

    fn update(&self, deck: &Deck) -> RepositoryFuture<'_, u64> {
        let deck = deck.clone();

        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE decks SET title = $1, description = $2, author = $3 WHERE id = $4",
            )
            .bind(&deck.title)
            .bind(&deck.description)
            .bind(&deck.author)
            .bind(deck.id)
            .execute(&self.pool)
            .await
            .map_err(database_error("Failed to update deck"))?;

            Ok(result.rows_affected())
        })
    }

    fn delete(&self, id: DeckId) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM decks WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(database_error("Failed to delete deck"))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::deck_not_found(id));
            }
            Ok(())
        })
    }

    fn get_with_cards_by_id(&self, id: DeckId) -> RepositoryFuture<'_, DeckWithCards> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT
                    d.id,
                    d.title,
                    d.description,
                    d.author,
                    d.created_at,
                    c.id AS card_id,
                    c.front AS card_front,
                    c.back AS card_back,
                    c.deck_id AS card_deck_id,
                    c.author AS card_author,
                    c.created_at AS card_created_at
                FROM decks d
                LEFT JOIN cards c ON d.id = c.deck_id
                WHERE d.id = $1
                ",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("Failed to get deck with cards"))?;

            let joined = rows
                .iter()
                .map(|row| Ok((Self::row_to_deck(row)?, Self::row_to_joined_card(row)?)))
                .collect::<Result<Vec<_>, sqlx::Error>>()
                .map_err(database_error("Failed to decode deck with cards"))?;

            DeckWithCards::from_join_rows(joined).ok_or(RepositoryError::deck_not_found(id))
        })
    }
}
