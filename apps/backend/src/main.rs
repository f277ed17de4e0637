use actix_web::{web, App, HttpServer};
use quizduel_backend::config::{DbKind, GameConfig, RuntimeEnv};
use quizduel_backend::infra::state::build_state;
use quizduel_backend::middleware::RequestTrace;
use quizduel_backend::routes;
use quizduel_backend::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

fn exit_with(message: &str) -> ! {
    error!("{message}");
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| exit_with("BACKEND_PORT must be a valid port number"));

    let jwt_secret = std::env::var("BACKEND_JWT_SECRET")
        .unwrap_or_else(|_| exit_with("BACKEND_JWT_SECRET must be set"));

    let db_kind = match std::env::var("BACKEND_DB") {
        Ok(raw) => DbKind::parse(&raw).unwrap_or_else(|e| exit_with(&e.to_string())),
        Err(_) => DbKind::Postgres,
    };

    let game_config = GameConfig::from_env().unwrap_or_else(|e| exit_with(&e.to_string()));

    let app_state = build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(db_kind)
        .with_security(SecurityConfig::new(jwt_secret.into_bytes()))
        .with_game_config(game_config)
        .build()
        .await
        .unwrap_or_else(|e| exit_with(&format!("Failed to build application state: {e}")));

    info!(%host, port, ?db_kind, "starting quiz duel backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
