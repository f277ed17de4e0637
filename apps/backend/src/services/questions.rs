//! Question selection: random draw from the published pool and the one-time
//! assignment of the drawn set to a game.

use rand::seq::index;
use rand::Rng;
use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::repos::questions::{self as questions_repo, GameQuestion, Question};

/// Pick `count` distinct ids uniformly at random without replacement.
///
/// The result is in draw order (fully shuffled), not pool order.
pub fn sample_ids<R: Rng + ?Sized>(
    pool: &[i64],
    count: usize,
    rng: &mut R,
) -> Result<Vec<i64>, DomainError> {
    if pool.len() < count {
        return Err(DomainError::infra(
            InfraErrorKind::InsufficientQuestions,
            format!(
                "Question pool has {} published questions, {count} required",
                pool.len()
            ),
        ));
    }

    Ok(index::sample(rng, pool.len(), count)
        .into_iter()
        .map(|i| pool[i])
        .collect())
}

/// Draw `count` distinct published questions using the thread RNG.
pub async fn draw_questions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    count: usize,
) -> Result<Vec<Question>, DomainError> {
    let pool = questions_repo::published_ids(conn).await?;
    let picked = {
        let mut rng = rand::rng();
        sample_ids(&pool, count, &mut rng)?
    };
    debug!(pool_size = pool.len(), count, "drew question set");
    questions_repo::find_by_ids_ordered(conn, &picked).await
}

/// Same as [`draw_questions`] with a caller-supplied RNG (seeded in tests).
pub async fn draw_questions_with_rng<C, R>(
    conn: &C,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>, DomainError>
where
    C: ConnectionTrait + Send + Sync,
    R: Rng + Send + ?Sized,
{
    let pool = questions_repo::published_ids(conn).await?;
    let picked = sample_ids(&pool, count, rng)?;
    questions_repo::find_by_ids_ordered(conn, &picked).await
}

/// Persist the question set of a game in one batch, `order` = draw position.
///
/// A game gets its set exactly once: if any association already exists the
/// call fails with `DuplicateAssignment` and writes nothing. The unique
/// indexes on `(game_id, question_order)` and `(game_id, question_id)` map to
/// the same error if two writers race past the check.
pub async fn assign_questions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    questions: &[Question],
) -> Result<Vec<GameQuestion>, DomainError> {
    let existing = questions_repo::count_assigned(conn, game_id).await?;
    if existing > 0 {
        return Err(DomainError::conflict(
            ConflictKind::DuplicateAssignment,
            format!("Game {game_id} already has {existing} assigned questions"),
        ));
    }

    let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    questions_repo::insert_assignments(conn, game_id, &ids).await?;
    info!(game_id, count = ids.len(), "assigned question set");

    Ok(questions
        .iter()
        .cloned()
        .enumerate()
        .map(|(order, question)| GameQuestion {
            game_id,
            order: order as i32,
            question,
        })
        .collect())
}

/// Question set of a game ordered by position (empty before activation).
pub async fn questions_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<GameQuestion>, DomainError> {
    questions_repo::find_assigned(conn, game_id).await
}
