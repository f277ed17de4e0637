//! SeaORM adapter for game/question associations.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::game_questions;

/// Insert all associations for a game in one statement; `question_order` is
/// the position in `question_ids` (0-based).
pub async fn insert_batch<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    question_ids: &[i64],
) -> Result<(), sea_orm::DbErr> {
    if question_ids.is_empty() {
        return Ok(());
    }

    let rows = question_ids
        .iter()
        .enumerate()
        .map(|(order, question_id)| game_questions::ActiveModel {
            id: NotSet,
            game_id: Set(game_id),
            question_id: Set(*question_id),
            question_order: Set(order as i32),
        });

    game_questions::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

pub async fn count_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    game_questions::Entity::find()
        .filter(game_questions::Column::GameId.eq(game_id))
        .count(conn)
        .await
}

/// Associations for a game ordered by `question_order`.
pub async fn find_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<game_questions::Model>, sea_orm::DbErr> {
    game_questions::Entity::find()
        .filter(game_questions::Column::GameId.eq(game_id))
        .order_by_asc(game_questions::Column::QuestionOrder)
        .all(conn)
        .await
}
