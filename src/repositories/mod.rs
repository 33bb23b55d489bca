pub mod answer_repository;
pub mod attempt_repository;
pub mod question_repository;
pub mod tournament_repository;
pub mod user_repository;

pub use answer_repository::{AnswerRepository, MongoAnswerRepository};
pub use attempt_repository::{AttemptRepository, MongoAttemptRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use tournament_repository::{MongoTournamentRepository, TournamentRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

use mongodb::error::{ErrorKind, WriteFailure};

/// True when the error is a unique-index violation (server code 11000).
pub(crate) fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}
