//! Progress and answer repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::answers_sea as answers_adapter;
use crate::adapters::progress_sea as progress_adapter;
use crate::entities::{answers, progress};
use crate::errors::domain::DomainError;

/// A player's mutable state within one game.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub id: i64,
    pub user_id: i64,
    pub score: i32,
    pub created_at: time::OffsetDateTime,
}

impl From<progress::Model> for Progress {
    fn from(model: progress::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            score: model.score,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub id: i64,
    pub progress_id: i64,
    pub question_id: i64,
    pub body: String,
    pub is_correct: bool,
    pub added_at: time::OffsetDateTime,
}

impl From<answers::Model> for Answer {
    fn from(model: answers::Model) -> Self {
        Self {
            id: model.id,
            progress_id: model.progress_id,
            question_id: model.question_id,
            body: model.body,
            is_correct: model.is_correct,
            added_at: model.added_at,
        }
    }
}

pub async fn create_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Progress, DomainError> {
    let progress = progress_adapter::create_progress(conn, user_id).await?;
    Ok(Progress::from(progress))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    progress_id: i64,
) -> Result<Option<Progress>, DomainError> {
    let progress = progress_adapter::find_by_id(conn, progress_id).await?;
    Ok(progress.map(Progress::from))
}

pub async fn increment_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    progress_id: i64,
) -> Result<(), DomainError> {
    progress_adapter::increment_score(conn, progress_id).await?;
    Ok(())
}

pub async fn find_answers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    progress_id: i64,
) -> Result<Vec<Answer>, DomainError> {
    let answers = answers_adapter::find_by_progress(conn, progress_id).await?;
    Ok(answers.into_iter().map(Answer::from).collect())
}

pub async fn create_answer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    progress_id: i64,
    question_id: i64,
    body: &str,
    is_correct: bool,
) -> Result<Answer, DomainError> {
    let answer = answers_adapter::create_answer(
        conn,
        answers_adapter::AnswerCreate {
            progress_id,
            question_id,
            body: body.to_string(),
            is_correct,
        },
    )
    .await?;
    Ok(Answer::from(answer))
}
