use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Tournament,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    async fn create(&self, tournament: Tournament) -> AppResult<Tournament>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Tournament>>;
    async fn find_all(&self) -> AppResult<Vec<Tournament>>;
    async fn update(&self, tournament: Tournament) -> AppResult<Tournament>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    /// Atomically bumps the like counter and returns the new count.
    async fn add_like(&self, id: &str) -> AppResult<i32>;
    /// Atomically decrements the like counter, never below zero, and returns
    /// the new count.
    async fn remove_like(&self, id: &str) -> AppResult<i32>;
}

pub struct MongoTournamentRepository {
    collection: Collection<Tournament>,
}

impl MongoTournamentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("tournaments");
        Self { collection }
    }

    async fn current_likes(&self, id: &str) -> AppResult<i32> {
        let tournament = self
            .collection
            .find_one(doc! { "id": id })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tournament with id '{}' not found", id)))?;
        Ok(tournament.likes)
    }
}

#[async_trait]
impl TournamentRepository for MongoTournamentRepository {
    async fn create(&self, tournament: Tournament) -> AppResult<Tournament> {
        self.collection.insert_one(&tournament).await?;
        Ok(tournament)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Tournament>> {
        let tournament = self.collection.find_one(doc! { "id": id }).await?;
        Ok(tournament)
    }

    async fn find_all(&self) -> AppResult<Vec<Tournament>> {
        let tournaments = self
            .collection
            .find(doc! {})
            .sort(doc! { "start_date": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(tournaments)
    }

    async fn update(&self, tournament: Tournament) -> AppResult<Tournament> {
        let result = self
            .collection
            .replace_one(doc! { "id": &tournament.id }, &tournament)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Tournament with id '{}' not found",
                tournament.id
            )));
        }

        Ok(tournament)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Tournament with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn add_like(&self, id: &str) -> AppResult<i32> {
        let result = self
            .collection
            .update_one(doc! { "id": id }, doc! { "$inc": { "likes": 1 } })
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Tournament with id '{}' not found",
                id
            )));
        }

        self.current_likes(id).await
    }

    async fn remove_like(&self, id: &str) -> AppResult<i32> {
        // The likes guard in the filter keeps the counter from going negative
        // under concurrent unlikes; a no-op match just means it was already 0.
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "likes": { "$gt": 0 } },
                doc! { "$inc": { "likes": -1 } },
            )
            .await?;

        if result.matched_count == 0 && self.collection.find_one(doc! { "id": id }).await?.is_none()
        {
            return Err(AppError::NotFound(format!(
                "Tournament with id '{}' not found",
                id
            )));
        }

        self.current_likes(id).await
    }
}
