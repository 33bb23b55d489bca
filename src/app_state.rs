use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AnswerRepository, AttemptRepository, MongoAnswerRepository, MongoAttemptRepository,
        MongoQuestionRepository, MongoTournamentRepository, MongoUserRepository, QuestionRepository,
        UserRepository,
    },
    services::{OpenTdbClient, PlayerService, TournamentService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub player_service: Arc<PlayerService>,
    pub tournament_service: Arc<TournamentService>,
    pub user_service: Arc<UserService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let tournament_repository = Arc::new(MongoTournamentRepository::new(&db));

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let answer_repository = Arc::new(MongoAnswerRepository::new(&db));
        answer_repository.ensure_indexes().await?;

        let question_source = Arc::new(OpenTdbClient::new(&config.trivia_api_url));

        let player_service = Arc::new(PlayerService::new(
            user_repository.clone(),
            tournament_repository.clone(),
            question_repository.clone(),
            attempt_repository.clone(),
            answer_repository.clone(),
            config.allow_repeat_answers,
        ));

        let tournament_service = Arc::new(TournamentService::new(
            tournament_repository,
            question_repository,
            attempt_repository,
            answer_repository,
            question_source,
            config.questions_per_tournament,
        ));

        let user_service = Arc::new(UserService::new(user_repository));

        Ok(Self {
            player_service,
            tournament_service,
            user_service,
            db,
            config: Arc::new(config),
        })
    }
}
