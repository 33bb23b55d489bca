use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::user::UserRole;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTournamentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(length(min = 1, max = 50))]
    pub difficulty: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(range(min = 0, max = 100))]
    pub min_passing_score: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTournamentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1))]
    pub attempt_id: String,

    #[validate(length(min = 1))]
    pub question_id: String,

    /// Letter token A-D; validated against the closed option set in the
    /// scoring engine, not here.
    #[validate(length(min = 1, max = 8))]
    pub selected_option: String,
}
