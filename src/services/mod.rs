pub mod player_service;
pub mod question_source;
pub mod tournament_service;
pub mod user_service;

pub use player_service::PlayerService;
pub use question_source::{OpenTdbClient, QuestionSource};
pub use tournament_service::TournamentService;
pub use user_service::UserService;
