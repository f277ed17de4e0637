//! Progress tracking: per-player records and answer submission.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;

use crate::entities::games::GameStatus;
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};
use crate::repos::games as games_repo;
use crate::repos::progress::{self as progress_repo, Progress};
use crate::repos::questions as questions_repo;

/// Result of a submitted answer, as returned to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub game_id: i64,
    pub question_id: i64,
    pub order: i32,
    pub is_correct: bool,
    /// Revealed once the question is answered
    pub correct_answer: String,
    pub score: i32,
    pub answered: usize,
    pub total: usize,
}

/// Fresh record with `score = 0` and no answers. Linking it to a game is
/// the matchmaker's job.
pub async fn create_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Progress, DomainError> {
    progress_repo::create_progress(conn, user_id).await
}

fn answers_match(submitted: &str, expected: &str) -> bool {
    submitted.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Locate the progress record of `user_id` among the game's slots.
async fn participant_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game: &games_repo::Game,
    user_id: i64,
) -> Result<Progress, DomainError> {
    for progress_id in game.progress_ids() {
        let progress = progress_repo::find_by_id(conn, progress_id)
            .await?
            .ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Game {} references missing progress {progress_id}", game.id),
                )
            })?;
        if progress.user_id == user_id {
            return Ok(progress);
        }
    }

    Err(DomainError::validation(
        ValidationKind::NotAParticipant,
        format!("User {user_id} is not a player of game {}", game.id),
    ))
}

/// Answer the player's next unanswered question of an ACTIVE game.
///
/// Answers are taken strictly in question order. Matching is trimmed and
/// case-insensitive; a correct answer bumps the score by one. The game is
/// not finished here even when both players are done.
pub async fn record_answer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    user_id: i64,
    body: &str,
) -> Result<AnswerOutcome, DomainError> {
    if body.trim().is_empty() {
        return Err(DomainError::validation(
            ValidationKind::EmptyAnswer,
            "Answer must not be empty",
        ));
    }

    let game = games_repo::require_game(conn, game_id).await?;
    if game.status != GameStatus::Active {
        return Err(DomainError::validation(
            ValidationKind::GameNotActive,
            format!("Game {game_id} is not active"),
        ));
    }

    let progress = participant_progress(conn, &game, user_id).await?;
    let questions = questions_repo::find_assigned(conn, game_id).await?;
    let answered = progress_repo::find_answers(conn, progress.id).await?.len();

    let next = questions.get(answered).ok_or_else(|| {
        DomainError::validation(
            ValidationKind::AllQuestionsAnswered,
            format!("All {} questions already answered", questions.len()),
        )
    })?;

    let is_correct = answers_match(body, &next.question.correct_answer);
    progress_repo::create_answer(conn, progress.id, next.question.id, body.trim(), is_correct)
        .await?;
    if is_correct {
        progress_repo::increment_score(conn, progress.id).await?;
    }

    let score = progress.score + i32::from(is_correct);
    info!(
        game_id,
        user_id,
        question_id = next.question.id,
        is_correct,
        score,
        "answer recorded"
    );

    Ok(AnswerOutcome {
        game_id,
        question_id: next.question.id,
        order: next.order,
        is_correct,
        correct_answer: next.question.correct_answer.clone(),
        score,
        answered: answered + 1,
        total: questions.len(),
    })
}
