//! Game session reads: consistent snapshots of a game with its questions and
//! both players, and the per-viewer external shape.

use std::collections::HashSet;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::db::retry::retry_read;
use crate::entities::games::GameStatus;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::repos::games::{self as games_repo, Game};
use crate::repos::progress::{self as progress_repo, Answer, Progress};
use crate::repos::questions::{self as questions_repo, GameQuestion};
use crate::repos::users::{self as users_repo, User};
use crate::state::app_state::AppState;

/// One player's slot: progress, answers in submission order, and the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSession {
    pub progress: Progress,
    pub answers: Vec<Answer>,
    pub user: User,
}

/// A game with everything a session view needs, read as one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedGame {
    pub game: Game,
    /// Ordered by position; empty while the game is pending
    pub questions: Vec<GameQuestion>,
    pub first_player: PlayerSession,
    pub second_player: Option<PlayerSession>,
}

impl ExtendedGame {
    pub fn players(&self) -> impl Iterator<Item = &PlayerSession> {
        std::iter::once(&self.first_player).chain(self.second_player.as_ref())
    }

    pub fn player_for_user(&self, user_id: i64) -> Option<&PlayerSession> {
        self.players().find(|p| p.user.id == user_id)
    }
}

pub async fn get_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    games_repo::find_by_id(conn, game_id).await
}

fn corrupt(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

async fn load_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    progress_id: i64,
) -> Result<PlayerSession, DomainError> {
    let progress = progress_repo::find_by_id(conn, progress_id)
        .await?
        .ok_or_else(|| {
            corrupt(format!(
                "Game {game_id} references missing progress {progress_id}"
            ))
        })?;
    let user = users_repo::find_user_by_id(conn, progress.user_id)
        .await?
        .ok_or_else(|| corrupt(format!("Progress {progress_id} references missing user")))?;
    let answers = progress_repo::find_answers(conn, progress_id).await?;

    Ok(PlayerSession {
        progress,
        answers,
        user,
    })
}

/// Game plus ordered questions and both players, or `None` if unknown.
///
/// Rows that break the lifecycle invariants (an active game without a
/// second player, a pending one with questions, dangling ids) are reported
/// as `DataCorruption` rather than returned half-built.
pub async fn get_extended<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<ExtendedGame>, DomainError> {
    let Some(game) = games_repo::find_by_id(conn, game_id).await? else {
        return Ok(None);
    };

    let second_progress_id = match (game.status, game.second_player_progress_id) {
        (GameStatus::Pending, None) => None,
        (GameStatus::Pending, Some(_)) => {
            return Err(corrupt(format!("Pending game {game_id} has a second player")));
        }
        (_, None) => {
            return Err(corrupt(format!(
                "Game {game_id} is {:?} without a second player",
                game.status
            )));
        }
        (_, Some(id)) => Some(id),
    };

    let questions = if game.is_pending() {
        Vec::new()
    } else {
        let questions = questions_repo::find_assigned(conn, game_id).await?;
        if questions.is_empty() {
            return Err(corrupt(format!(
                "Game {game_id} is {:?} without a question set",
                game.status
            )));
        }
        questions
    };

    let first_player = load_player(conn, game_id, game.first_player_progress_id).await?;
    let second_player = match second_progress_id {
        Some(id) => Some(load_player(conn, game_id, id).await?),
        None => None,
    };

    Ok(Some(ExtendedGame {
        game,
        questions,
        first_player,
        second_player,
    }))
}

/// The caller's pending or active game, if any.
pub async fn current_game_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<Game>, DomainError> {
    games_repo::find_open_for_user(conn, user_id).await
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub order: i32,
    pub question_id: i64,
    pub body: String,
    /// Present only once the viewer has answered this question
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerView {
    pub question_id: i64,
    pub body: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub user_id: i64,
    pub login: String,
    pub score: i32,
    pub answered: usize,
    pub is_viewer: bool,
    /// The viewer's own answers; empty for the opponent
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<AnswerView>,
}

/// External shape of a game for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub id: i64,
    pub status: GameStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_game_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finish_game_date: Option<OffsetDateTime>,
    pub questions: Vec<QuestionView>,
    pub first_player: PlayerView,
    pub second_player: Option<PlayerView>,
}

impl GameView {
    pub fn for_viewer(ext: &ExtendedGame, viewer_user_id: i64) -> Self {
        let answered_by_viewer: HashSet<i64> = ext
            .player_for_user(viewer_user_id)
            .map(|p| p.answers.iter().map(|a| a.question_id).collect())
            .unwrap_or_default();

        let questions = ext
            .questions
            .iter()
            .map(|gq| QuestionView {
                order: gq.order,
                question_id: gq.question.id,
                body: gq.question.body.clone(),
                correct_answer: answered_by_viewer
                    .contains(&gq.question.id)
                    .then(|| gq.question.correct_answer.clone()),
            })
            .collect();

        let player_view = |p: &PlayerSession| {
            let is_viewer = p.user.id == viewer_user_id;
            PlayerView {
                user_id: p.user.id,
                login: p.user.login.clone(),
                score: p.progress.score,
                answered: p.answers.len(),
                is_viewer,
                answers: if is_viewer {
                    p.answers
                        .iter()
                        .map(|a| AnswerView {
                            question_id: a.question_id,
                            body: a.body.clone(),
                            is_correct: a.is_correct,
                        })
                        .collect()
                } else {
                    Vec::new()
                },
            }
        };

        Self {
            id: ext.game.id,
            status: ext.game.status,
            created_at: ext.game.created_at,
            start_game_date: ext.game.start_game_date,
            finish_game_date: ext.game.finish_game_date,
            questions,
            first_player: player_view(&ext.first_player),
            second_player: ext.second_player.as_ref().map(player_view),
        }
    }
}

/// Read a game for `viewer_user_id` with bounded retries on transient
/// failures. Unknown games and games the viewer does not play in are both
/// `NotFound(Game)`.
pub async fn read_view(
    state: &AppState,
    game_id: i64,
    viewer_user_id: i64,
) -> Result<GameView, AppError> {
    let db = require_db(state)?;
    let attempts = state.game.read_retry_attempts;
    let ext = retry_read(attempts, move || get_extended(db, game_id))
        .await?
        .filter(|ext| ext.player_for_user(viewer_user_id).is_some())
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
        })?;

    Ok(GameView::for_viewer(&ext, viewer_user_id))
}
