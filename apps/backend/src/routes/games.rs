//! Game HTTP routes, mounted under `/api/games` behind `JwtExtract`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::extractors::{CurrentUser, GameId};
use crate::services::{matchmaking, progress, sessions};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// POST /api/games/connection
///
/// Joins the oldest open game or opens a new one. 409 when the caller is
/// already in a pending or active game.
async fn connect(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = matchmaking::connect_player(&app_state, user.id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/games/current
async fn current(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let game = sessions::current_game_for_user(db, user.id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, "No open game"))?;

    let view = sessions::read_view(&app_state, game.id, user.id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// GET /api/games/{game_id}
async fn get_game(
    game_id: GameId,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = sessions::read_view(&app_state, game_id.0, user.id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// POST /api/games/{game_id}/answers
async fn submit_answer(
    game_id: GameId,
    user: CurrentUser,
    body: web::Json<AnswerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let answer = body.into_inner().answer;
    let game_id = game_id.0;
    let user_id = user.id;

    let outcome = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            Ok(progress::record_answer(txn, game_id, user_id, &answer).await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/connection", web::post().to(connect))
        .route("/current", web::get().to(current))
        .route("/{game_id}", web::get().to(get_game))
        .route("/{game_id}/answers", web::post().to(submit_answer));
}
