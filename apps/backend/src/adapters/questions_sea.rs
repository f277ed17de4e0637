//! SeaORM adapter for the question pool.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::questions;

/// Ids of every published question, ascending.
pub async fn find_published_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    questions::Entity::find()
        .select_only()
        .column(questions::Column::Id)
        .filter(questions::Column::Published.eq(true))
        .order_by_asc(questions::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<questions::Model>, sea_orm::DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    questions::Entity::find()
        .filter(questions::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await
}

pub async fn create_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    body: &str,
    correct_answer: &str,
    published: bool,
) -> Result<questions::Model, sea_orm::DbErr> {
    let question_active = questions::ActiveModel {
        id: NotSet,
        body: Set(body.to_string()),
        correct_answer: Set(correct_answer.to_string()),
        published: Set(published),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    question_active.insert(conn).await
}
