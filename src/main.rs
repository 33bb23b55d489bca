use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizarena_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    handlers::{player_handler, tournament_handler, user_handler},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    if std::env::var("APP_ENV").map(|v| v == "production").unwrap_or(false) {
        config.validate_for_production();
    }

    let state = AppState::new(config.clone())
        .await
        .expect("failed to initialize application state");
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

    log::info!(
        "Starting HTTP server on {}:{}",
        config.web_server_host,
        config.web_server_port
    );

    let bind_addr = (config.web_server_host.clone(), config.web_server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(user_handler::health_check)
            .service(user_handler::create_user)
            .service(user_handler::get_user)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(player_handler::start_attempt)
                    .service(player_handler::submit_answer)
                    .service(player_handler::finish_attempt)
                    .service(player_handler::tournament_questions)
                    .service(player_handler::question_by_order)
                    .service(player_handler::my_attempts)
                    .service(player_handler::attempt_history)
                    .service(player_handler::leaderboard_position)
                    .service(tournament_handler::all_tournaments)
                    .service(tournament_handler::create_tournament)
                    .service(tournament_handler::scoreboard)
                    .service(tournament_handler::add_like)
                    .service(tournament_handler::remove_like)
                    .service(tournament_handler::tournament_by_id)
                    .service(tournament_handler::update_tournament)
                    .service(tournament_handler::delete_tournament),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
