use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One player's single run through a tournament's question set.
///
/// At most one attempt exists per (username, tournament_id) pair; the attempt
/// repository enforces this with a unique index. `score` only ever grows and
/// `completed` only flips false -> true.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerAttempt {
    pub id: String,
    pub username: String,
    pub tournament_id: String,
    pub score: i32,
    pub completed: bool,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl PlayerAttempt {
    pub fn new(username: &str, tournament_id: &str) -> Self {
        PlayerAttempt {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            tournament_id: tournament_id.to_string(),
            score: 0,
            completed: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}
