use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::models::domain::{PlayerAnswer, PlayerAttempt, TournamentQuestion};

/// Per-tournament scoreboard, computed on read from completed attempts.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreboardResponse {
    pub tournament_name: String,
    pub likes: i32,
    pub total_players: u64,
    pub average_score: f64,
    pub scores: Vec<PlayerScore>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerScore {
    pub player_name: String,
    pub score: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PlayerScore {
    pub fn from_attempt(attempt: &PlayerAttempt) -> Self {
        PlayerScore {
            player_name: attempt.username.clone(),
            score: attempt.score,
            completed_at: attempt.finished_at,
        }
    }
}

/// A player's standing in the cross-tournament best-score ranking.
#[derive(Clone, Debug, Serialize)]
pub struct GlobalRankResponse {
    pub global_rank: RankPosition,
    pub total_players: u64,
    pub player_attempts: u64,
}

impl GlobalRankResponse {
    /// Sentinel for "no completed attempts exist anywhere yet".
    pub fn no_data() -> Self {
        GlobalRankResponse {
            global_rank: RankPosition::NoData,
            total_players: 0,
            player_attempts: 0,
        }
    }
}

/// Rank is a 1-based position when the player has at least one completed
/// attempt; otherwise one of the two soft sentinels the scoreboard UI shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankPosition {
    Ranked(u64),
    Unranked,
    NoData,
}

impl Serialize for RankPosition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RankPosition::Ranked(rank) => serializer.serialize_u64(*rank),
            RankPosition::Unranked => serializer.serialize_str("Unranked"),
            RankPosition::NoData => serializer.serialize_str("No data yet"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AttemptHistoryResponse {
    pub total_attempts: u64,
    pub completed_attempts: u64,
    pub average_score: f64,
    pub best_score: i32,
    pub attempts: Vec<PlayerAttempt>,
}

/// Single-question page for one-at-a-time play.
#[derive(Clone, Debug, Serialize)]
pub struct QuestionPageResponse {
    pub question: TournamentQuestion,
    pub question_number: i32,
    pub total_questions: usize,
}

/// Submission result with the feedback line the original UI displayed.
#[derive(Clone, Debug, Serialize)]
pub struct AnswerFeedbackResponse {
    pub answer: PlayerAnswer,
    pub correct: bool,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl AnswerFeedbackResponse {
    pub fn from_answer(answer: PlayerAnswer, correct_answer_text: &str) -> Self {
        let correct = answer.correct;
        let (feedback, correct_answer) = if correct {
            ("Correct! Well done!".to_string(), None)
        } else {
            (
                format!("Incorrect! The correct answer was: {}", correct_answer_text),
                Some(correct_answer_text.to_string()),
            )
        };

        AnswerFeedbackResponse {
            answer,
            correct,
            feedback,
            correct_answer,
        }
    }
}
