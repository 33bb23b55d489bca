use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Tournament, TournamentQuestion},
    models::dto::request::{CreateTournamentRequest, UpdateTournamentRequest},
    models::dto::response::{PlayerScore, ScoreboardResponse},
    repositories::{
        AnswerRepository, AttemptRepository, QuestionRepository, TournamentRepository,
    },
    services::question_source::{FetchedQuestion, QuestionSource},
};

/// Admin-facing tournament lifecycle plus the per-tournament scoreboard.
pub struct TournamentService {
    tournaments: Arc<dyn TournamentRepository>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn AttemptRepository>,
    answers: Arc<dyn AnswerRepository>,
    question_source: Arc<dyn QuestionSource>,
    questions_per_tournament: u8,
}

impl TournamentService {
    pub fn new(
        tournaments: Arc<dyn TournamentRepository>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRepository>,
        answers: Arc<dyn AnswerRepository>,
        question_source: Arc<dyn QuestionSource>,
        questions_per_tournament: u8,
    ) -> Self {
        Self {
            tournaments,
            questions,
            attempts,
            answers,
            question_source,
            questions_per_tournament,
        }
    }

    /// Creates a tournament and provisions its fixed question set from the
    /// external bank. A bank outage leaves the tournament standing without
    /// questions; the failure is logged, not propagated.
    pub async fn create_tournament(
        &self,
        request: CreateTournamentRequest,
        creator: &str,
    ) -> AppResult<Tournament> {
        request.validate()?;

        let tournament = Tournament::new(
            &request.name,
            &request.category,
            &request.difficulty,
            creator,
            request.start_date,
            request.end_date,
            request.min_passing_score,
        );
        let saved = self.tournaments.create(tournament).await?;

        match self
            .question_source
            .fetch_questions(self.questions_per_tournament)
            .await
        {
            Ok(fetched) => {
                let questions = Self::build_question_set(&saved.id, fetched);
                let count = questions.len();
                self.questions.insert_many(questions).await?;
                log::info!("Attached {} questions to tournament '{}'", count, saved.name);
            }
            Err(err) => {
                log::warn!(
                    "Failed to fetch questions for tournament '{}': {}",
                    saved.name,
                    err
                );
            }
        }

        Ok(saved)
    }

    /// Assigns fetched questions to ordered slots. The correct answer's slot
    /// rotates with the question order instead of sitting in a fixed column.
    fn build_question_set(
        tournament_id: &str,
        fetched: Vec<FetchedQuestion>,
    ) -> Vec<TournamentQuestion> {
        let mut questions = Vec::with_capacity(fetched.len());
        let mut order: i32 = 1;

        for question in fetched {
            if question.incorrect_answers.len() < 3 {
                log::warn!(
                    "Skipping question with {} incorrect answers: {}",
                    question.incorrect_answers.len(),
                    question.question_text
                );
                continue;
            }

            let correct_slot = ((order - 1) % 4) as usize;
            let mut slots: [&str; 4] = ["", "", "", ""];
            let mut incorrect = question.incorrect_answers.iter();
            for (index, slot) in slots.iter_mut().enumerate() {
                if index == correct_slot {
                    *slot = &question.correct_answer;
                } else if let Some(answer) = incorrect.next() {
                    *slot = answer;
                }
            }

            questions.push(TournamentQuestion::new(
                tournament_id,
                order,
                &question.question_text,
                slots,
                &question.correct_answer,
            ));
            order += 1;
        }

        questions
    }

    pub async fn all_tournaments(&self) -> AppResult<Vec<Tournament>> {
        self.tournaments.find_all().await
    }

    pub async fn tournament_by_id(&self, id: &str) -> AppResult<Tournament> {
        self.tournaments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tournament with id '{}' not found", id)))
    }

    pub async fn update_tournament(
        &self,
        id: &str,
        request: UpdateTournamentRequest,
    ) -> AppResult<Tournament> {
        request.validate()?;

        let mut tournament = self.tournament_by_id(id).await?;
        tournament.name = request.name;
        tournament.start_date = request.start_date;
        tournament.end_date = request.end_date;

        self.tournaments.update(tournament).await
    }

    /// Deletes a tournament and everything hanging off it. The fan-out runs
    /// leaf-first (answers, attempts, question set, tournament) so an
    /// interrupted delete never strands children; rerunning it finishes the
    /// job.
    pub async fn delete_tournament(&self, id: &str) -> AppResult<()> {
        let tournament = self.tournament_by_id(id).await?;

        let attempts = self.attempts.find_by_tournament(id).await?;
        let attempt_ids: Vec<String> = attempts.iter().map(|a| a.id.clone()).collect();

        let removed_answers = self.answers.delete_by_attempts(&attempt_ids).await?;
        let removed_attempts = self.attempts.delete_by_tournament(id).await?;
        let removed_questions = self.questions.delete_by_tournament(id).await?;
        self.tournaments.delete(id).await?;

        log::info!(
            "Deleted tournament '{}' with {} attempts, {} answers, {} questions",
            tournament.name,
            removed_attempts,
            removed_answers,
            removed_questions
        );

        Ok(())
    }

    pub async fn add_like(&self, id: &str) -> AppResult<i32> {
        self.tournaments.add_like(id).await
    }

    pub async fn remove_like(&self, id: &str) -> AppResult<i32> {
        self.tournaments.remove_like(id).await
    }

    /// Per-tournament scoreboard over completed attempts. Ordered best score
    /// first with earlier completion winning ties; the average counts every
    /// completed attempt, while the player total counts each player once.
    pub async fn scoreboard(&self, tournament_id: &str) -> AppResult<ScoreboardResponse> {
        let tournament = self.tournament_by_id(tournament_id).await?;

        let attempts = self
            .attempts
            .find_completed_by_tournament(tournament_id)
            .await?;
        let scores = attempts.iter().map(PlayerScore::from_attempt).collect();

        let total_players = self.attempts.count_distinct_players(tournament_id).await?;
        let average_score = self
            .attempts
            .average_score(tournament_id)
            .await?
            .unwrap_or(0.0);

        Ok(ScoreboardResponse {
            tournament_name: tournament.name,
            likes: tournament.likes,
            total_players,
            average_score,
            scores,
        })
    }
}
