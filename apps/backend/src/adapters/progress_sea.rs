//! SeaORM adapter for player progress records.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::entities::progress;

pub async fn create_progress<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<progress::Model, sea_orm::DbErr> {
    let progress_active = progress::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        score: Set(0),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    progress_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    progress_id: i64,
) -> Result<Option<progress::Model>, sea_orm::DbErr> {
    progress::Entity::find_by_id(progress_id).one(conn).await
}

/// Atomic `score = score + 1`; returns affected rows.
pub async fn increment_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    progress_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = progress::Entity::update_many()
        .col_expr(
            progress::Column::Score,
            Expr::col(progress::Column::Score).add(1),
        )
        .filter(progress::Column::Id.eq(progress_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
