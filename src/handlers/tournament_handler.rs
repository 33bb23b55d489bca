use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, require_player, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateTournamentRequest, UpdateTournamentRequest},
};

#[get("/api/tournaments")]
pub async fn all_tournaments(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let tournaments = state.tournament_service.all_tournaments().await?;
    Ok(HttpResponse::Ok().json(tournaments))
}

#[get("/api/tournaments/{id}")]
pub async fn tournament_by_id(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let tournament = state.tournament_service.tournament_by_id(&id).await?;
    Ok(HttpResponse::Ok().json(tournament))
}

#[post("/api/tournaments")]
pub async fn create_tournament(
    state: web::Data<AppState>,
    request: web::Json<CreateTournamentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let tournament = state
        .tournament_service
        .create_tournament(request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(tournament))
}

#[put("/api/tournaments/{id}")]
pub async fn update_tournament(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateTournamentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let tournament = state
        .tournament_service
        .update_tournament(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(tournament))
}

#[delete("/api/tournaments/{id}")]
pub async fn delete_tournament(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    state.tournament_service.delete_tournament(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/tournaments/{id}/like")]
pub async fn add_like(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let likes = state.tournament_service.add_like(&id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "likes": likes })))
}

#[delete("/api/tournaments/{id}/like")]
pub async fn remove_like(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_player(&auth.0)?;

    let likes = state.tournament_service.remove_like(&id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "likes": likes })))
}

#[get("/api/tournaments/{id}/scoreboard")]
pub async fn scoreboard(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let scoreboard = state.tournament_service.scoreboard(&id).await?;
    Ok(HttpResponse::Ok().json(scoreboard))
}
