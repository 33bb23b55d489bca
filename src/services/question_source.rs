use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};

/// A multiple-choice question as delivered by the external question bank,
/// before it is assigned to a tournament slot.
#[derive(Clone, Debug, Deserialize)]
pub struct FetchedQuestion {
    #[serde(rename = "question")]
    pub question_text: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// External question bank seam. Tournaments are provisioned from whatever
/// implementation the app is wired with.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn fetch_questions(&self, amount: u8) -> AppResult<Vec<FetchedQuestion>>;
}

#[derive(Debug, Deserialize)]
struct OpenTdbResponse {
    response_code: i32,
    results: Vec<FetchedQuestion>,
}

/// Open Trivia DB client (https://opentdb.com).
pub struct OpenTdbClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenTdbClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl QuestionSource for OpenTdbClient {
    async fn fetch_questions(&self, amount: u8) -> AppResult<Vec<FetchedQuestion>> {
        let url = format!(
            "{}/api.php?amount={}&type=multiple",
            self.base_url, amount
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "Question bank returned status {}",
                response.status()
            )));
        }

        let body: OpenTdbResponse = response.json().await?;
        if body.response_code != 0 {
            return Err(AppError::InternalError(format!(
                "Question bank returned response_code {}",
                body.response_code
            )));
        }

        let questions = body
            .results
            .into_iter()
            .map(|q| FetchedQuestion {
                question_text: decode_html_entities(&q.question_text),
                correct_answer: decode_html_entities(&q.correct_answer),
                incorrect_answers: q
                    .incorrect_answers
                    .iter()
                    .map(|a| decode_html_entities(a))
                    .collect(),
            })
            .collect();

        Ok(questions)
    }
}

/// The bank serves entity-encoded text; decode the entities that actually
/// occur in its payloads.
fn decode_html_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}
