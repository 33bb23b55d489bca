#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quizarena_server::{
    errors::{AppError, AppResult},
    models::domain::{PlayerAnswer, PlayerAttempt, Tournament, TournamentQuestion, User},
    repositories::{
        AnswerRepository, AttemptRepository, QuestionRepository, TournamentRepository,
        UserRepository,
    },
    services::{
        question_source::{FetchedQuestion, QuestionSource},
        PlayerService, TournamentService,
    },
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(AppError::Conflict(format!(
                "User with username '{}' already exists",
                user.username
            )));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTournamentRepository {
    tournaments: RwLock<HashMap<String, Tournament>>,
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentRepository {
    async fn create(&self, tournament: Tournament) -> AppResult<Tournament> {
        let mut tournaments = self.tournaments.write().await;
        tournaments.insert(tournament.id.clone(), tournament.clone());
        Ok(tournament)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Tournament>> {
        let tournaments = self.tournaments.read().await;
        Ok(tournaments.get(id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Tournament>> {
        let tournaments = self.tournaments.read().await;
        let mut items: Vec<_> = tournaments.values().cloned().collect();
        items.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(items)
    }

    async fn update(&self, tournament: Tournament) -> AppResult<Tournament> {
        let mut tournaments = self.tournaments.write().await;
        if !tournaments.contains_key(&tournament.id) {
            return Err(AppError::NotFound(format!(
                "Tournament with id '{}' not found",
                tournament.id
            )));
        }
        tournaments.insert(tournament.id.clone(), tournament.clone());
        Ok(tournament)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut tournaments = self.tournaments.write().await;
        if tournaments.remove(id).is_none() {
            return Err(AppError::NotFound(format!(
                "Tournament with id '{}' not found",
                id
            )));
        }
        Ok(())
    }

    async fn add_like(&self, id: &str) -> AppResult<i32> {
        let mut tournaments = self.tournaments.write().await;
        let tournament = tournaments
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Tournament with id '{}' not found", id)))?;
        tournament.likes += 1;
        Ok(tournament.likes)
    }

    async fn remove_like(&self, id: &str) -> AppResult<i32> {
        let mut tournaments = self.tournaments.write().await;
        let tournament = tournaments
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Tournament with id '{}' not found", id)))?;
        tournament.likes = (tournament.likes - 1).max(0);
        Ok(tournament.likes)
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<String, TournamentQuestion>>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn insert_many(&self, new_questions: Vec<TournamentQuestion>) -> AppResult<()> {
        let mut questions = self.questions.write().await;
        for question in new_questions {
            questions.insert(question.id.clone(), question);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<TournamentQuestion>> {
        let questions = self.questions.read().await;
        Ok(questions.get(id).cloned())
    }

    async fn find_by_tournament(&self, tournament_id: &str) -> AppResult<Vec<TournamentQuestion>> {
        let questions = self.questions.read().await;
        let mut items: Vec<_> = questions
            .values()
            .filter(|q| q.tournament_id == tournament_id)
            .cloned()
            .collect();
        items.sort_by_key(|q| q.question_order);
        Ok(items)
    }

    async fn delete_by_tournament(&self, tournament_id: &str) -> AppResult<u64> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|_, q| q.tournament_id != tournament_id);
        Ok((before - questions.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAttemptRepository {
    attempts: RwLock<HashMap<String, PlayerAttempt>>,
}

impl InMemoryAttemptRepository {
    /// Inserts without the pair-uniqueness check, for modelling store state
    /// that predates the unique index (e.g. historical re-attempts).
    pub async fn insert_raw(&self, attempt: PlayerAttempt) {
        let mut attempts = self.attempts.write().await;
        attempts.insert(attempt.id.clone(), attempt);
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttemptRepository {
    async fn create(&self, attempt: PlayerAttempt) -> AppResult<PlayerAttempt> {
        let mut attempts = self.attempts.write().await;
        let duplicate = attempts
            .values()
            .any(|a| a.username == attempt.username && a.tournament_id == attempt.tournament_id);
        if duplicate {
            return Err(AppError::Conflict(format!(
                "Player '{}' has already started tournament '{}'",
                attempt.username, attempt.tournament_id
            )));
        }
        attempts.insert(attempt.id.clone(), attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PlayerAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(id).cloned())
    }

    async fn find_by_player_and_tournament(
        &self,
        username: &str,
        tournament_id: &str,
    ) -> AppResult<Option<PlayerAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .find(|a| a.username == username && a.tournament_id == tournament_id)
            .cloned())
    }

    async fn find_by_player(&self, username: &str) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .values()
            .filter(|a| a.username == username)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(items)
    }

    async fn find_by_tournament(&self, tournament_id: &str) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|a| a.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    async fn count_by_player(&self, username: &str) -> AppResult<u64> {
        let attempts = self.attempts.read().await;
        Ok(attempts.values().filter(|a| a.username == username).count() as u64)
    }

    async fn increment_score(&self, attempt_id: &str) -> AppResult<bool> {
        let mut attempts = self.attempts.write().await;
        match attempts.get_mut(attempt_id) {
            Some(attempt) if !attempt.completed => {
                attempt.score += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_completed(
        &self,
        attempt_id: &str,
        finished_at: DateTime<Utc>,
    ) -> AppResult<Option<PlayerAttempt>> {
        let mut attempts = self.attempts.write().await;
        match attempts.get_mut(attempt_id) {
            Some(attempt) if !attempt.completed => {
                attempt.completed = true;
                attempt.finished_at = Some(finished_at);
                Ok(Some(attempt.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_completed_by_tournament(
        &self,
        tournament_id: &str,
    ) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .values()
            .filter(|a| a.tournament_id == tournament_id && a.completed)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.finished_at.cmp(&b.finished_at))
        });
        Ok(items)
    }

    async fn find_all_completed(&self) -> AppResult<Vec<PlayerAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.values().filter(|a| a.completed).cloned().collect())
    }

    async fn count_distinct_players(&self, tournament_id: &str) -> AppResult<u64> {
        let attempts = self.attempts.read().await;
        let players: HashSet<&str> = attempts
            .values()
            .filter(|a| a.tournament_id == tournament_id && a.completed)
            .map(|a| a.username.as_str())
            .collect();
        Ok(players.len() as u64)
    }

    async fn average_score(&self, tournament_id: &str) -> AppResult<Option<f64>> {
        let attempts = self.attempts.read().await;
        let scores: Vec<i32> = attempts
            .values()
            .filter(|a| a.tournament_id == tournament_id && a.completed)
            .map(|a| a.score)
            .collect();
        if scores.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64,
        ))
    }

    async fn delete_by_tournament(&self, tournament_id: &str) -> AppResult<u64> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| a.tournament_id != tournament_id);
        Ok((before - attempts.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAnswerRepository {
    answers: RwLock<HashMap<String, PlayerAnswer>>,
}

#[async_trait]
impl AnswerRepository for InMemoryAnswerRepository {
    async fn create(&self, answer: PlayerAnswer) -> AppResult<PlayerAnswer> {
        let mut answers = self.answers.write().await;
        answers.insert(answer.id.clone(), answer.clone());
        Ok(answer)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut answers = self.answers.write().await;
        answers.remove(id);
        Ok(())
    }

    async fn find_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<PlayerAnswer>> {
        let answers = self.answers.read().await;
        let mut items: Vec<_> = answers
            .values()
            .filter(|a| a.attempt_id == attempt_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.answered_at.cmp(&b.answered_at));
        Ok(items)
    }

    async fn exists_for_question(&self, attempt_id: &str, question_id: &str) -> AppResult<bool> {
        let answers = self.answers.read().await;
        Ok(answers
            .values()
            .any(|a| a.attempt_id == attempt_id && a.question_id == question_id))
    }

    async fn delete_by_attempts(&self, attempt_ids: &[String]) -> AppResult<u64> {
        let mut answers = self.answers.write().await;
        let before = answers.len();
        answers.retain(|_, a| !attempt_ids.contains(&a.attempt_id));
        Ok((before - answers.len()) as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Canned question bank for provisioning tests.
pub struct FixedQuestionSource {
    pub questions: Vec<FetchedQuestion>,
}

#[async_trait]
impl QuestionSource for FixedQuestionSource {
    async fn fetch_questions(&self, amount: u8) -> AppResult<Vec<FetchedQuestion>> {
        Ok(self
            .questions
            .iter()
            .take(amount as usize)
            .cloned()
            .collect())
    }
}

pub struct TestApp {
    pub users: Arc<InMemoryUserRepository>,
    pub tournaments: Arc<InMemoryTournamentRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub attempts: Arc<InMemoryAttemptRepository>,
    pub answers: Arc<InMemoryAnswerRepository>,
    pub player_service: PlayerService,
    pub tournament_service: TournamentService,
}

/// Wires both services onto one shared set of in-memory repositories.
pub fn test_app(allow_repeat_answers: bool) -> TestApp {
    let users = Arc::new(InMemoryUserRepository::default());
    let tournaments = Arc::new(InMemoryTournamentRepository::default());
    let questions = Arc::new(InMemoryQuestionRepository::default());
    let attempts = Arc::new(InMemoryAttemptRepository::default());
    let answers = Arc::new(InMemoryAnswerRepository::default());

    let source = Arc::new(FixedQuestionSource {
        questions: vec![
            FetchedQuestion {
                question_text: "What is the capital of France?".to_string(),
                correct_answer: "Paris".to_string(),
                incorrect_answers: vec![
                    "Rome".to_string(),
                    "Berlin".to_string(),
                    "Madrid".to_string(),
                ],
            },
            FetchedQuestion {
                question_text: "Which planet is known as the Red Planet?".to_string(),
                correct_answer: "Mars".to_string(),
                incorrect_answers: vec![
                    "Venus".to_string(),
                    "Jupiter".to_string(),
                    "Saturn".to_string(),
                ],
            },
        ],
    });

    let player_service = PlayerService::new(
        users.clone(),
        tournaments.clone(),
        questions.clone(),
        attempts.clone(),
        answers.clone(),
        allow_repeat_answers,
    );

    let tournament_service = TournamentService::new(
        tournaments.clone(),
        questions.clone(),
        attempts.clone(),
        answers.clone(),
        source,
        2,
    );

    TestApp {
        users,
        tournaments,
        questions,
        attempts,
        answers,
        player_service,
        tournament_service,
    }
}

pub fn make_tournament(id: &str, name: &str) -> Tournament {
    let mut tournament = Tournament::new(
        name,
        "general",
        "medium",
        "admin",
        chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        50,
    );
    tournament.id = id.to_string();
    tournament
}

pub fn make_question(
    id: &str,
    tournament_id: &str,
    order: i32,
    options: [&str; 4],
    correct: &str,
) -> TournamentQuestion {
    let mut question =
        TournamentQuestion::new(tournament_id, order, "Sample question?", options, correct);
    question.id = id.to_string();
    question
}

pub fn make_completed_attempt(
    username: &str,
    tournament_id: &str,
    score: i32,
    finished_ts: i64,
) -> PlayerAttempt {
    use chrono::TimeZone;

    let mut attempt = PlayerAttempt::new(username, tournament_id);
    attempt.id = format!("attempt-{}-{}-{}", username, tournament_id, finished_ts);
    attempt.score = score;
    attempt.completed = true;
    attempt.finished_at = Some(Utc.timestamp_opt(finished_ts, 0).unwrap());
    attempt
}

pub async fn seed_player(app: &TestApp, username: &str) {
    app.users
        .create(User::new(
            username,
            &format!("{}@example.com", username),
            quizarena_server::models::domain::user::UserRole::Player,
        ))
        .await
        .expect("seeding player should succeed");
}

pub async fn seed_tournament_with_paris_question(app: &TestApp) -> (Tournament, TournamentQuestion) {
    let tournament = make_tournament("tournament-1", "Capitals Cup");
    app.tournaments
        .create(tournament.clone())
        .await
        .expect("seeding tournament should succeed");

    let question = make_question(
        "question-1",
        &tournament.id,
        1,
        ["Paris", "Rome", "Berlin", "Madrid"],
        "Paris",
    );
    app.questions
        .insert_many(vec![question.clone()])
        .await
        .expect("seeding question should succeed");

    (tournament, question)
}
