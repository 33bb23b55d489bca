use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::PlayerAttempt,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Inserts a new attempt. The unique (username, tournament_id) index is
    /// the authority on duplicates; violations surface as `Conflict`.
    async fn create(&self, attempt: PlayerAttempt) -> AppResult<PlayerAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<PlayerAttempt>>;
    async fn find_by_player_and_tournament(
        &self,
        username: &str,
        tournament_id: &str,
    ) -> AppResult<Option<PlayerAttempt>>;
    async fn find_by_player(&self, username: &str) -> AppResult<Vec<PlayerAttempt>>;
    async fn find_by_tournament(&self, tournament_id: &str) -> AppResult<Vec<PlayerAttempt>>;
    async fn count_by_player(&self, username: &str) -> AppResult<u64>;
    /// Atomic score bump, gated on the attempt still being open. Returns
    /// false when no open attempt matched (completed or missing).
    async fn increment_score(&self, attempt_id: &str) -> AppResult<bool>;
    /// Atomically flips an open attempt to completed and stamps the finish
    /// time. Returns the updated attempt, or None when no open attempt
    /// matched the id.
    async fn mark_completed(
        &self,
        attempt_id: &str,
        finished_at: DateTime<Utc>,
    ) -> AppResult<Option<PlayerAttempt>>;
    /// Completed attempts of one tournament, best score first, earlier finish
    /// winning ties.
    async fn find_completed_by_tournament(
        &self,
        tournament_id: &str,
    ) -> AppResult<Vec<PlayerAttempt>>;
    async fn find_all_completed(&self) -> AppResult<Vec<PlayerAttempt>>;
    async fn count_distinct_players(&self, tournament_id: &str) -> AppResult<u64>;
    /// Mean score over completed attempts; None when there are none.
    async fn average_score(&self, tournament_id: &str) -> AppResult<Option<f64>>;
    async fn delete_by_tournament(&self, tournament_id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAttemptRepository {
    collection: Collection<PlayerAttempt>,
}

impl MongoAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("player_attempts");
        Self { collection }
    }
}

#[async_trait]
impl AttemptRepository for MongoAttemptRepository {
    async fn create(&self, attempt: PlayerAttempt) -> AppResult<PlayerAttempt> {
        match self.collection.insert_one(&attempt).await {
            Ok(_) => Ok(attempt),
            Err(err) if super::is_duplicate_key_error(&err) => Err(AppError::Conflict(format!(
                "Player '{}' has already started tournament '{}'",
                attempt.username, attempt.tournament_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PlayerAttempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_by_player_and_tournament(
        &self,
        username: &str,
        tournament_id: &str,
    ) -> AppResult<Option<PlayerAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! { "username": username, "tournament_id": tournament_id })
            .await?;
        Ok(attempt)
    }

    async fn find_by_player(&self, username: &str) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "username": username })
            .sort(doc! { "started_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn find_by_tournament(&self, tournament_id: &str) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "tournament_id": tournament_id })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn count_by_player(&self, username: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "username": username })
            .await?;
        Ok(count)
    }

    async fn increment_score(&self, attempt_id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": attempt_id, "completed": false },
                doc! { "$inc": { "score": 1 } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn mark_completed(
        &self,
        attempt_id: &str,
        finished_at: DateTime<Utc>,
    ) -> AppResult<Option<PlayerAttempt>> {
        let attempt = self
            .collection
            .find_one_and_update(
                doc! { "id": attempt_id, "completed": false },
                doc! { "$set": { "completed": true, "finished_at": to_bson(&finished_at)? } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(attempt)
    }

    async fn find_completed_by_tournament(
        &self,
        tournament_id: &str,
    ) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "tournament_id": tournament_id, "completed": true })
            .sort(doc! { "score": -1, "finished_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn find_all_completed(&self) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "completed": true })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn count_distinct_players(&self, tournament_id: &str) -> AppResult<u64> {
        let players = self
            .collection
            .distinct(
                "username",
                doc! { "tournament_id": tournament_id, "completed": true },
            )
            .await?;
        Ok(players.len() as u64)
    }

    async fn average_score(&self, tournament_id: &str) -> AppResult<Option<f64>> {
        let pipeline = vec![
            doc! { "$match": { "tournament_id": tournament_id, "completed": true } },
            doc! { "$group": { "_id": null, "average_score": { "$avg": "$score" } } },
        ];

        let mut cursor = self.collection.aggregate(pipeline).await?;
        let Some(result) = cursor.try_next().await? else {
            return Ok(None);
        };

        let average = result
            .get_f64("average_score")
            .or_else(|_| result.get_i32("average_score").map(f64::from))
            .ok();
        Ok(average)
    }

    async fn delete_by_tournament(&self, tournament_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "tournament_id": tournament_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // One attempt per player per tournament; the insert path relies on
        // this to reject duplicate starts under concurrency.
        let player_tournament_index = IndexModel::builder()
            .keys(doc! { "username": 1, "tournament_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("player_tournament_unique".to_string())
                    .build(),
            )
            .build();

        let scoreboard_index = IndexModel::builder()
            .keys(doc! { "tournament_id": 1, "completed": 1, "score": -1 })
            .options(
                IndexOptions::builder()
                    .name("tournament_scoreboard".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(player_tournament_index).await?;
        self.collection.create_index(scoreboard_index).await?;
        log::info!("Created indexes for player_attempts collection");

        Ok(())
    }
}
