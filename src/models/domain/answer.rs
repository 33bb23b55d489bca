use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only record of one answer submission. Never mutated after creation;
/// deleted only when the owning attempt is deleted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerAnswer {
    pub id: String,
    pub attempt_id: String,
    pub question_id: String,
    pub selected_option: String, // the letter token as submitted, uppercased
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl PlayerAnswer {
    pub fn new(attempt_id: &str, question_id: &str, selected_option: &str, correct: bool) -> Self {
        PlayerAnswer {
            id: Uuid::new_v4().to_string(),
            attempt_id: attempt_id.to_string(),
            question_id: question_id.to_string(),
            selected_option: selected_option.to_string(),
            correct,
            answered_at: Utc::now(),
        }
    }
}
