use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{AnswerOption, PlayerAnswer, PlayerAttempt, TournamentQuestion},
    models::dto::response::{
        AttemptHistoryResponse, GlobalRankResponse, QuestionPageResponse, RankPosition,
    },
    repositories::{
        AnswerRepository, AttemptRepository, QuestionRepository, TournamentRepository,
        UserRepository,
    },
};

/// Player-facing side of the engine: the attempt lifecycle, answer scoring
/// and the cross-tournament ranking.
pub struct PlayerService {
    users: Arc<dyn UserRepository>,
    tournaments: Arc<dyn TournamentRepository>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn AttemptRepository>,
    answers: Arc<dyn AnswerRepository>,
    allow_repeat_answers: bool,
}

impl PlayerService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tournaments: Arc<dyn TournamentRepository>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
        answers: Arc<dyn AnswerRepository>,
        allow_repeat_answers: bool,
    ) -> Self {
        Self {
            users,
            tournaments,
            questions,
            attempts,
            answers,
            allow_repeat_answers,
        }
    }

    /// Starts a new attempt for the player. A player gets exactly one attempt
    /// per tournament; a second start is rejected, not returned.
    pub async fn start_attempt(
        &self,
        username: &str,
        tournament_id: &str,
    ) -> AppResult<PlayerAttempt> {
        let player = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;

        let tournament = self
            .tournaments
            .find_by_id(tournament_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Tournament with id '{}' not found", tournament_id))
            })?;

        if self
            .attempts
            .find_by_player_and_tournament(&player.username, &tournament.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Player '{}' has already started tournament '{}'",
                username, tournament_id
            )));
        }

        // The unique (username, tournament_id) index backstops the check
        // above when two starts race.
        self.attempts
            .create(PlayerAttempt::new(&player.username, &tournament.id))
            .await
    }

    /// Scores one submitted answer against the question's option table.
    ///
    /// The answer record is always persisted, right or wrong; a correct
    /// answer additionally bumps the attempt score through an atomic,
    /// completion-gated increment. The two writes never diverge: if the
    /// increment loses a race against finish, the answer record is unwound
    /// and the call reports the conflict.
    pub async fn submit_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
        selected: &str,
    ) -> AppResult<PlayerAnswer> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        if attempt.completed {
            return Err(AppError::Conflict(
                "This quiz attempt has already been completed".to_string(),
            ));
        }

        let question = self
            .questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })?;

        let option = AnswerOption::parse(selected)
            .ok_or_else(|| AppError::ValidationError(format!("Invalid option: {}", selected)))?;

        if !self.allow_repeat_answers
            && self
                .answers
                .exists_for_question(attempt_id, question_id)
                .await?
        {
            return Err(AppError::Conflict(
                "Question has already been answered in this attempt".to_string(),
            ));
        }

        let correct =
            option.text(&question).to_lowercase() == question.correct_answer.to_lowercase();

        let answer = self
            .answers
            .create(PlayerAnswer::new(
                attempt_id,
                question_id,
                option.as_str(),
                correct,
            ))
            .await?;

        if correct && !self.attempts.increment_score(attempt_id).await? {
            // finish won the race after the gate check; unwind the answer so
            // the ledger matches the frozen score
            self.answers.delete(&answer.id).await?;
            return Err(AppError::Conflict(
                "This quiz attempt has already been completed".to_string(),
            ));
        }

        Ok(answer)
    }

    /// Completes an attempt. Finishing twice is a conflict; the stored score
    /// and timestamps of a completed attempt never change afterwards.
    pub async fn finish_attempt(&self, attempt_id: &str) -> AppResult<PlayerAttempt> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        if attempt.completed {
            return Err(AppError::Conflict("Attempt already completed".to_string()));
        }

        self.attempts
            .mark_completed(attempt_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::Conflict("Attempt already completed".to_string()))
    }

    pub async fn tournament_questions(
        &self,
        tournament_id: &str,
    ) -> AppResult<Vec<TournamentQuestion>> {
        if self.tournaments.find_by_id(tournament_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Tournament with id '{}' not found",
                tournament_id
            )));
        }

        self.questions.find_by_tournament(tournament_id).await
    }

    /// Single question by its 1-based position, for one-at-a-time play.
    pub async fn question_by_order(
        &self,
        tournament_id: &str,
        order: i32,
    ) -> AppResult<QuestionPageResponse> {
        let questions = self.tournament_questions(tournament_id).await?;
        let total_questions = questions.len();

        let question = questions
            .into_iter()
            .find(|q| q.question_order == order)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Question {} not found in tournament '{}'",
                    order, tournament_id
                ))
            })?;

        Ok(QuestionPageResponse {
            question,
            question_number: order,
            total_questions,
        })
    }

    pub async fn question_by_id(&self, question_id: &str) -> AppResult<TournamentQuestion> {
        self.questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question_id))
            })
    }

    pub async fn player_attempts(&self, username: &str) -> AppResult<Vec<PlayerAttempt>> {
        self.attempts.find_by_player(username).await
    }

    /// Aggregated history across the player's attempts; averages and best
    /// score only consider completed attempts.
    pub async fn attempt_history(&self, username: &str) -> AppResult<AttemptHistoryResponse> {
        let attempts = self.attempts.find_by_player(username).await?;

        let total_attempts = attempts.len() as u64;
        let completed_scores: Vec<i32> = attempts
            .iter()
            .filter(|a| a.completed)
            .map(|a| a.score)
            .collect();
        let average_score = if completed_scores.is_empty() {
            0.0
        } else {
            completed_scores.iter().map(|s| *s as f64).sum::<f64>() / completed_scores.len() as f64
        };
        let best_score = completed_scores.iter().copied().max().unwrap_or(0);

        Ok(AttemptHistoryResponse {
            total_attempts,
            completed_attempts: completed_scores.len() as u64,
            average_score,
            best_score,
            attempts,
        })
    }

    /// Computes the player's global standing: every player's best score over
    /// all completed attempts, ranked descending. Ties are broken by the
    /// earlier completion of the best-scoring attempt, then by username, so
    /// the ordering never depends on storage iteration order.
    pub async fn global_rank(&self, username: &str) -> AppResult<GlobalRankResponse> {
        let completed = self.attempts.find_all_completed().await?;
        if completed.is_empty() {
            return Ok(GlobalRankResponse::no_data());
        }

        let mut best: HashMap<String, (i32, DateTime<Utc>)> = HashMap::new();
        for attempt in &completed {
            let finished = attempt.finished_at.unwrap_or(attempt.started_at);
            match best.get_mut(&attempt.username) {
                Some((score, at)) => {
                    if attempt.score > *score || (attempt.score == *score && finished < *at) {
                        *score = attempt.score;
                        *at = finished;
                    }
                }
                None => {
                    best.insert(attempt.username.clone(), (attempt.score, finished));
                }
            }
        }

        let mut standings: Vec<(&String, &(i32, DateTime<Utc>))> = best.iter().collect();
        standings.sort_by(|a, b| {
            let (score_a, finished_a) = a.1;
            let (score_b, finished_b) = b.1;
            score_b
                .cmp(score_a)
                .then_with(|| finished_a.cmp(finished_b))
                .then_with(|| a.0.cmp(b.0))
        });

        let global_rank = standings
            .iter()
            .position(|(name, _)| name.as_str() == username)
            .map(|idx| RankPosition::Ranked(idx as u64 + 1))
            .unwrap_or(RankPosition::Unranked);

        let player_attempts = self.attempts.count_by_player(username).await?;

        Ok(GlobalRankResponse {
            global_rank,
            total_players: best.len() as u64,
            player_attempts,
        })
    }
}
