//! Card repository.

use crate::database_error;
use flashcards_core::repository::RepositoryFuture;
use flashcards_core::{Card, CardId, CardRepository, RepositoryError};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

/// `PostgreSQL`-backed [`CardRepository`].
#[derive(Clone)]
pub struct PostgresCardRepository {
    pool: PgPool,
}

impl PostgresCardRepository {
    /// Create a repository over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_card(row: &PgRow) -> Result<Card, sqlx::Error> {
        Ok(Card {
            id: row.try_get("id")?,
            front: row.try_get("front")?,
            back: row.try_get("back")?,
            deck_id: row.try_get("deck_id")?,
            author: row.try_get("author")?,
            created_at: Some(row.try_get("created_at")?),
        })
    }
}

impl CardRepository for PostgresCardRepository {
    fn add(&self, card: &Card) -> RepositoryFuture<'_, CardId> {
        let card = card.clone();

        Box::pin(async move {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO cards (front, back, deck_id, author) VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(&card.front)
            .bind(&card.back)
            .bind(card.deck_id)
            .bind(&card.author)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error("Failed to insert card"))?;

            tracing::debug!(card_id = id, deck_id = card.deck_id, "Card inserted");
            Ok(id)
        })
    }

    fn get_by_id(&self, id: CardId) -> RepositoryFuture<'_, Card> {
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT id, front, back, deck_id, author, created_at FROM cards WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("Failed to get card"))?
            .ok_or(RepositoryError::card_not_found(id))?;

            Self::row_to_card(&row).map_err(database_error("Failed to decode card"))
        })
    }

    fn update(&self, card: &Card) -> RepositoryFuture<'_, u64> {
        let card = card.clone();

        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE cards SET front = $1, back = $2, deck_id = $3, author = $4 WHERE id = $5",
            )
            .bind(&card.front)
            .bind(&card.back)
            .bind(card.deck_id)
            .bind(&card.author)
            .bind(card.id)
            .execute(&self.pool)
            .await
            .map_err(database_error("Failed to update card"))?;

            Ok(result.rows_affected())
        })
    }

    fn delete(&self, id: CardId) -> RepositoryFuture<'_, ()> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM cards WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(database_error("Failed to delete card"))?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::card_not_found(id));
            }
            Ok(())
        })
    }
}
