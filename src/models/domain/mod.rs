pub mod answer;
pub mod attempt;
pub mod question;
pub mod tournament;
pub mod user;

pub use answer::PlayerAnswer;
pub use attempt::PlayerAttempt;
pub use question::{AnswerOption, TournamentQuestion};
pub use tournament::Tournament;
pub use user::User;
