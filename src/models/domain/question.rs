use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One question in a tournament's fixed, ordered question set. Immutable once
/// created. `correct_answer` holds the full answer text, not an option letter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TournamentQuestion {
    pub id: String,
    pub tournament_id: String,
    pub question_order: i32, // 1-based position within the tournament
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
}

impl TournamentQuestion {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tournament_id: &str,
        question_order: i32,
        question_text: &str,
        options: [&str; 4],
        correct_answer: &str,
    ) -> Self {
        TournamentQuestion {
            id: Uuid::new_v4().to_string(),
            tournament_id: tournament_id.to_string(),
            question_order,
            question_text: question_text.to_string(),
            option_a: options[0].to_string(),
            option_b: options[1].to_string(),
            option_c: options[2].to_string(),
            option_d: options[3].to_string(),
            correct_answer: correct_answer.to_string(),
        }
    }
}

/// The four answer slots a player can pick from. Closed set: anything that is
/// not one of these letters is rejected before scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    /// Parses a submitted option token. Accepts the four letters
    /// case-insensitively, with surrounding whitespace tolerated.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "A" => Some(AnswerOption::A),
            "B" => Some(AnswerOption::B),
            "C" => Some(AnswerOption::C),
            "D" => Some(AnswerOption::D),
            _ => None,
        }
    }

    /// Resolves this option to the matching answer text of the question.
    pub fn text<'a>(&self, question: &'a TournamentQuestion) -> &'a str {
        match self {
            AnswerOption::A => &question.option_a,
            AnswerOption::B => &question.option_b,
            AnswerOption::C => &question.option_c,
            AnswerOption::D => &question.option_d,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOption::A => "A",
            AnswerOption::B => "B",
            AnswerOption::C => "C",
            AnswerOption::D => "D",
        }
    }
}
