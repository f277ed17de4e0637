//! Game repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::games_sea as games_adapter;
use crate::entities::games;
pub use crate::entities::games::GameStatus;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Game domain model
///
/// Players are referenced through their progress record ids; the records
/// themselves are resolved by explicit lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: i64,
    pub status: GameStatus,
    pub first_player_progress_id: i64,
    pub second_player_progress_id: Option<i64>,
    pub created_at: time::OffsetDateTime,
    pub start_game_date: Option<time::OffsetDateTime>,
    pub finish_game_date: Option<time::OffsetDateTime>,
}

impl Game {
    pub fn is_pending(&self) -> bool {
        self.status == GameStatus::Pending
    }

    /// Progress ids of both slots, first player first.
    pub fn progress_ids(&self) -> Vec<i64> {
        std::iter::once(self.first_player_progress_id)
            .chain(self.second_player_progress_id)
            .collect()
    }
}

impl From<games::Model> for Game {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            status: model.status,
            first_player_progress_id: model.first_player_progress_id,
            second_player_progress_id: model.second_player_progress_id,
            created_at: model.created_at,
            start_game_date: model.start_game_date,
            finish_game_date: model.finish_game_date,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    Ok(game.map(Game::from))
}

/// Find game by ID or return `NotFound(Game)`.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    find_by_id(conn, game_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
    })
}

pub async fn find_open_slot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    excluding_user_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_open_slot(conn, excluding_user_id).await?;
    Ok(game.map(Game::from))
}

pub async fn find_open_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_open_for_user(conn, user_id).await?;
    Ok(game.map(Game::from))
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    first_player_progress_id: i64,
) -> Result<Game, DomainError> {
    let game = games_adapter::create_game(
        conn,
        games_adapter::GameCreate::new(first_player_progress_id),
    )
    .await?;
    Ok(Game::from(game))
}

/// Compare-and-swap activation. Returns `false` when the game was no longer
/// pending with a free second slot.
pub async fn activate_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    second_player_progress_id: i64,
) -> Result<bool, DomainError> {
    let rows = games_adapter::activate(
        conn,
        games_adapter::GameActivate::new(game_id, second_player_progress_id),
    )
    .await?;
    Ok(rows == 1)
}

/// Move an active game to FINISHED and stamp `finish_game_date`.
///
/// Completion policy belongs to the caller; this only makes the terminal
/// state representable. Returns `false` if the game was not active.
pub async fn finish_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<bool, DomainError> {
    let rows = games_adapter::finish(conn, game_id, time::OffsetDateTime::now_utc()).await?;
    Ok(rows == 1)
}
