//! SeaORM adapter for submitted answers.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::answers;

#[derive(Debug, Clone)]
pub struct AnswerCreate {
    pub progress_id: i64,
    pub question_id: i64,
    pub body: String,
    pub is_correct: bool,
}

pub async fn create_answer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AnswerCreate,
) -> Result<answers::Model, sea_orm::DbErr> {
    let answer_active = answers::ActiveModel {
        id: NotSet,
        progress_id: Set(dto.progress_id),
        question_id: Set(dto.question_id),
        body: Set(dto.body),
        is_correct: Set(dto.is_correct),
        added_at: Set(time::OffsetDateTime::now_utc()),
    };

    answer_active.insert(conn).await
}

/// Answers of one progress record in submission order.
pub async fn find_by_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    progress_id: i64,
) -> Result<Vec<answers::Model>, sea_orm::DbErr> {
    answers::Entity::find()
        .filter(answers::Column::ProgressId.eq(progress_id))
        .order_by_asc(answers::Column::Id)
        .all(conn)
        .await
}
