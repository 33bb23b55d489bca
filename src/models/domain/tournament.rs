use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quiz tournament. Questions are attached separately as an ordered set of
/// `TournamentQuestion` records owned by this tournament's id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub category: String,
    pub difficulty: String,
    pub creator: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_passing_score: i32, // percent
    pub likes: i32,             // never drops below zero
}

impl Tournament {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        category: &str,
        difficulty: &str,
        creator: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        min_passing_score: i32,
    ) -> Self {
        Tournament {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category: category.to_string(),
            difficulty: difficulty.to_string(),
            creator: creator.to_string(),
            start_date,
            end_date,
            min_passing_score,
            likes: 0,
        }
    }
}
