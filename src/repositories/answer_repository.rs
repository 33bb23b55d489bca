use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::PlayerAnswer};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn create(&self, answer: PlayerAnswer) -> AppResult<PlayerAnswer>;
    /// Removes a single answer record. Only used to unwind an answer whose
    /// score update lost the race against finish.
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn find_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<PlayerAnswer>>;
    async fn exists_for_question(&self, attempt_id: &str, question_id: &str) -> AppResult<bool>;
    async fn delete_by_attempts(&self, attempt_ids: &[String]) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAnswerRepository {
    collection: Collection<PlayerAnswer>,
}

impl MongoAnswerRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("player_answers");
        Self { collection }
    }
}

#[async_trait]
impl AnswerRepository for MongoAnswerRepository {
    async fn create(&self, answer: PlayerAnswer) -> AppResult<PlayerAnswer> {
        self.collection.insert_one(&answer).await?;
        Ok(answer)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.collection.delete_one(doc! { "id": id }).await?;
        Ok(())
    }

    async fn find_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<PlayerAnswer>> {
        let answers = self
            .collection
            .find(doc! { "attempt_id": attempt_id })
            .sort(doc! { "answered_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn exists_for_question(&self, attempt_id: &str, question_id: &str) -> AppResult<bool> {
        let answer = self
            .collection
            .find_one(doc! { "attempt_id": attempt_id, "question_id": question_id })
            .await?;
        Ok(answer.is_some())
    }

    async fn delete_by_attempts(&self, attempt_ids: &[String]) -> AppResult<u64> {
        if attempt_ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .delete_many(doc! { "attempt_id": { "$in": attempt_ids } })
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

        let attempt_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("attempt_question".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(attempt_index).await?;
        log::info!("Created indexes for player_answers collection");

        Ok(())
    }
}
