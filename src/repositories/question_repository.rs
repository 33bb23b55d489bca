use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::TournamentQuestion};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn insert_many(&self, questions: Vec<TournamentQuestion>) -> AppResult<()>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<TournamentQuestion>>;
    /// All questions of a tournament in their fixed 1..N order.
    async fn find_by_tournament(&self, tournament_id: &str) -> AppResult<Vec<TournamentQuestion>>;
    async fn delete_by_tournament(&self, tournament_id: &str) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<TournamentQuestion>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("tournament_questions");
        Self { collection }
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn insert_many(&self, questions: Vec<TournamentQuestion>) -> AppResult<()> {
        if questions.is_empty() {
            return Ok(());
        }
        self.collection.insert_many(&questions).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TournamentQuestion>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_by_tournament(&self, tournament_id: &str) -> AppResult<Vec<TournamentQuestion>> {
        let questions = self
            .collection
            .find(doc! { "tournament_id": tournament_id })
            .sort(doc! { "question_order": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
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

        let order_index = IndexModel::builder()
            .keys(doc! { "tournament_id": 1, "question_order": 1 })
            .options(
                IndexOptions::builder()
                    .name("tournament_order".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(order_index).await?;
        log::info!("Created indexes for tournament_questions collection");

        Ok(())
    }
}
