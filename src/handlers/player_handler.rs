use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_player, AuthenticatedUser},
    errors::AppError,
    models::dto::request::SubmitAnswerRequest,
    models::dto::response::AnswerFeedbackResponse,
};

#[post("/player/start/{tournament_id}")]
pub async fn start_attempt(
    state: web::Data<AppState>,
    tournament_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let attempt = state
        .player_service
        .start_attempt(&auth.0.sub, &tournament_id)
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}

#[post("/player/submit-answer")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    request: web::Json<SubmitAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;
    request.validate()?;

    let answer = state
        .player_service
        .submit_answer(
            &request.attempt_id,
            &request.question_id,
            &request.selected_option,
        )
        .await?;

    let question = state
        .player_service
        .question_by_id(&request.question_id)
        .await?;
    let response = AnswerFeedbackResponse::from_answer(answer, &question.correct_answer);

    Ok(HttpResponse::Ok().json(response))
}

#[post("/player/finish/{attempt_id}")]
pub async fn finish_attempt(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let attempt = state.player_service.finish_attempt(&attempt_id).await?;
    Ok(HttpResponse::Ok().json(attempt))
}

#[get("/player/tournament/{tournament_id}/questions")]
pub async fn tournament_questions(
    state: web::Data<AppState>,
    tournament_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let questions = state
        .player_service
        .tournament_questions(&tournament_id)
        .await?;
    Ok(HttpResponse::Ok().json(questions))
}

#[get("/player/tournament/{tournament_id}/question/{order}")]
pub async fn question_by_order(
    state: web::Data<AppState>,
    path: web::Path<(String, i32)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let (tournament_id, order) = path.into_inner();
    let page = state
        .player_service
        .question_by_order(&tournament_id, order)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/player/my-attempts")]
pub async fn my_attempts(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let attempts = state.player_service.player_attempts(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(attempts))
}

#[get("/player/attempt-history")]
pub async fn attempt_history(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let history = state.player_service.attempt_history(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(history))
}

#[get("/player/leaderboard-position")]
pub async fn leaderboard_position(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let position = state.player_service.global_rank(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(position))
}
