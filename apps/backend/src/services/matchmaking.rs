//! Game matchmaking: find or create a pending game and bind the second
//! player to it without double-booking the slot.
//!
//! Activation is a conditional update (`status='PENDING' AND
//! second_player_progress_id IS NULL`) whose affected-row count decides the
//! race. The loser gets `RaceLost`; its transaction is rolled back so the
//! progress it created never persists, and [`connect_player`] reruns it as a
//! fresh `create_game`.
//!
//! Both `create_game` and `join_game` enforce the one-open-game gate; callers
//! take the admission lock (`users_repo::lock_user`) first.

use std::time::Duration;

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::repos::games::{self as games_repo, Game};
use crate::repos::progress as progress_repo;
use crate::repos::users as users_repo;
use crate::services::sessions::{self, GameView};
use crate::services::{participation, progress, questions};
use crate::state::app_state::AppState;

const CONNECT_RETRY_DELAY_MS: u64 = 25;

async fn ensure_no_open_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), DomainError> {
    if participation::is_user_in_open_game(conn, user_id).await? {
        return Err(DomainError::conflict(
            ConflictKind::ParticipationConflict,
            "User is already in a pending or active game",
        ));
    }
    Ok(())
}

/// Oldest pending game with a free second slot not created by
/// `joining_user_id`.
pub async fn find_open_slot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    joining_user_id: i64,
) -> Result<Option<Game>, DomainError> {
    games_repo::find_open_slot(conn, joining_user_id).await
}

/// New PENDING game with `user_id` as first player.
pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Game, DomainError> {
    ensure_no_open_game(conn, user_id).await?;

    let progress = progress::create_progress(conn, user_id).await?;
    let game = games_repo::create_game(conn, progress.id).await?;
    info!(game_id = game.id, user_id, "created pending game");
    Ok(game)
}

/// Bind `user_id` as second player of `game` and assign its question set.
///
/// `game` is a snapshot; the conditional activation re-checks it against the
/// row. Must run inside a transaction that is rolled back on error.
pub async fn join_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    game: &Game,
    questions_per_game: usize,
) -> Result<Game, DomainError> {
    let first = progress_repo::find_by_id(conn, game.first_player_progress_id)
        .await?
        .ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Game {} has no first player progress", game.id),
            )
        })?;
    if first.user_id == user_id {
        return Err(DomainError::validation(
            ValidationKind::SelfJoin,
            "Cannot join your own game",
        ));
    }
    ensure_no_open_game(conn, user_id).await?;

    if !game.is_pending() || game.second_player_progress_id.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::RaceLost,
            format!("Game {} is no longer open", game.id),
        ));
    }

    let joining = progress::create_progress(conn, user_id).await?;
    if !games_repo::activate_game(conn, game.id, joining.id).await? {
        warn!(game_id = game.id, user_id, "activation race lost");
        return Err(DomainError::conflict(
            ConflictKind::RaceLost,
            format!("Game {} was taken by another player", game.id),
        ));
    }

    let drawn = questions::draw_questions(conn, questions_per_game).await?;
    questions::assign_questions(conn, game.id, &drawn).await?;

    let activated = games_repo::require_game(conn, game.id).await?;
    info!(
        game_id = activated.id,
        user_id,
        questions = drawn.len(),
        "game activated"
    );
    Ok(activated)
}

/// Admission lock, then join the oldest open slot or create a new pending
/// game. One transaction.
pub async fn connect<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    questions_per_game: usize,
) -> Result<Game, DomainError> {
    users_repo::lock_user(conn, user_id).await?;

    match find_open_slot(conn, user_id).await? {
        Some(slot) => join_game(conn, user_id, &slot, questions_per_game).await,
        None => create_game(conn, user_id).await,
    }
}

/// One connect transaction, falling back to a fresh pending game when the
/// activation race is lost.
async fn connect_once(state: &AppState, user_id: i64) -> Result<Game, AppError> {
    let questions_per_game = state.game.questions_per_game;

    let connected = with_txn(state, move |txn| {
        Box::pin(async move { Ok(connect(txn, user_id, questions_per_game).await?) })
    })
    .await;

    match connected {
        Ok(game) => Ok(game),
        Err(err) if err.code() == ErrorCode::RaceLost => {
            info!(user_id, "retrying as a new pending game after lost race");
            with_txn(state, move |txn| {
                Box::pin(async move {
                    users_repo::lock_user(txn, user_id).await?;
                    Ok(create_game(txn, user_id).await?)
                })
            })
            .await
        }
        Err(err) => Err(err),
    }
}

/// Entry point for `POST /api/games/connection`.
///
/// A lost activation race is never surfaced: the caller becomes the first
/// player of a fresh pending game instead. A transient storage failure
/// (e.g. SQLite reporting the database as locked) rolls the transaction back
/// and the whole connect is rerun, up to `connect_retry_attempts` times.
pub async fn connect_player(state: &AppState, user_id: i64) -> Result<GameView, AppError> {
    let attempts = state.game.connect_retry_attempts.max(1);
    let mut attempt = 1;

    let game = loop {
        match connect_once(state, user_id).await {
            Ok(game) => break game,
            Err(err) if err.is_transient() && attempt < attempts => {
                warn!(
                    user_id,
                    attempt,
                    attempts,
                    code = %err.code(),
                    "connect rolled back; retrying"
                );
                tokio::time::sleep(Duration::from_millis(
                    CONNECT_RETRY_DELAY_MS * u64::from(attempt),
                ))
                .await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    };

    Ok(sessions::read_view(state, game.id, user_id).await?)
}
