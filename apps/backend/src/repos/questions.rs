//! Question pool and game/question association repository functions.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::adapters::game_questions_sea as game_questions_adapter;
use crate::adapters::questions_sea as questions_adapter;
use crate::entities::{game_questions, questions};
use crate::errors::domain::{DomainError, InfraErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub body: String,
    pub correct_answer: String,
}

impl From<questions::Model> for Question {
    fn from(model: questions::Model) -> Self {
        Self {
            id: model.id,
            body: model.body,
            correct_answer: model.correct_answer,
        }
    }
}

/// A question bound to a game at a fixed 0-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameQuestion {
    pub game_id: i64,
    pub order: i32,
    pub question: Question,
}

pub async fn published_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<i64>, DomainError> {
    Ok(questions_adapter::find_published_ids(conn).await?)
}

/// Load questions by id, returned in the order of `ids`.
///
/// A missing id means the pool changed under us or an association dangles.
pub async fn find_by_ids_ordered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<Question>, DomainError> {
    let mut by_id: HashMap<i64, questions::Model> = questions_adapter::find_by_ids(conn, ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    ids.iter()
        .map(|id| {
            by_id.remove(id).map(Question::from).ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Question {id} is missing"),
                )
            })
        })
        .collect()
}

pub async fn create_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    body: &str,
    correct_answer: &str,
    published: bool,
) -> Result<Question, DomainError> {
    let question =
        questions_adapter::create_question(conn, body, correct_answer, published).await?;
    Ok(Question::from(question))
}

pub async fn count_assigned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(game_questions_adapter::count_for_game(conn, game_id).await?)
}

pub async fn insert_assignments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    question_ids: &[i64],
) -> Result<(), DomainError> {
    game_questions_adapter::insert_batch(conn, game_id, question_ids).await?;
    Ok(())
}

/// Question set of a game ordered by position.
pub async fn find_assigned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<GameQuestion>, DomainError> {
    let rows: Vec<game_questions::Model> =
        game_questions_adapter::find_for_game(conn, game_id).await?;
    let ids: Vec<i64> = rows.iter().map(|r| r.question_id).collect();
    let questions = find_by_ids_ordered(conn, &ids).await?;

    Ok(rows
        .into_iter()
        .zip(questions)
        .map(|(row, question)| GameQuestion {
            game_id: row.game_id,
            order: row.question_order,
            question,
        })
        .collect())
}
