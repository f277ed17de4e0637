//! SeaORM adapter for game repository - generic over ConnectionTrait.

use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType, NotSet,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::games::{self, GameStatus};
use crate::entities::progress;

pub mod dto;

pub use dto::{GameActivate, GameCreate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Oldest pending game with a free second slot whose first player is not
/// `excluding_user_id`. Ties on `created_at` are broken by id.
pub async fn find_open_slot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    excluding_user_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .join(
            JoinType::InnerJoin,
            games::Relation::FirstPlayerProgress.def(),
        )
        .filter(games::Column::Status.eq(GameStatus::Pending))
        .filter(games::Column::SecondPlayerProgressId.is_null())
        .filter(progress::Column::UserId.ne(excluding_user_id))
        .order_by_asc(games::Column::CreatedAt)
        .order_by_asc(games::Column::Id)
        .one(conn)
        .await
}

/// First open (pending or active) game that references a progress record of
/// `user_id` in either slot.
pub async fn find_open_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    let user_progress = Query::select()
        .column(progress::Column::Id)
        .from(progress::Entity)
        .and_where(progress::Column::UserId.eq(user_id))
        .to_owned();

    games::Entity::find()
        .filter(games::Column::Status.is_in([GameStatus::Pending, GameStatus::Active]))
        .filter(
            Condition::any()
                .add(games::Column::FirstPlayerProgressId.in_subquery(user_progress.clone()))
                .add(games::Column::SecondPlayerProgressId.in_subquery(user_progress)),
        )
        .order_by_asc(games::Column::CreatedAt)
        .order_by_asc(games::Column::Id)
        .one(conn)
        .await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let game_active = games::ActiveModel {
        id: NotSet,
        status: Set(GameStatus::Pending),
        first_player_progress_id: Set(dto.first_player_progress_id),
        second_player_progress_id: Set(None),
        created_at: Set(time::OffsetDateTime::now_utc()),
        start_game_date: Set(None),
        finish_game_date: Set(None),
    };

    game_active.insert(conn).await
}

/// Conditional activation:
///
/// `UPDATE games SET status='ACTIVE', second_player_progress_id=?, start_game_date=?
///  WHERE id=? AND status='PENDING' AND second_player_progress_id IS NULL`
///
/// Returns the number of affected rows; 0 means another transaction took the
/// slot (or the game does not exist).
pub async fn activate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameActivate,
) -> Result<u64, sea_orm::DbErr> {
    let result = games::Entity::update_many()
        .col_expr(games::Column::Status, Expr::val(GameStatus::Active).into())
        .col_expr(
            games::Column::SecondPlayerProgressId,
            Expr::val(Some(dto.second_player_progress_id)).into(),
        )
        .col_expr(
            games::Column::StartGameDate,
            Expr::val(Some(dto.started_at)).into(),
        )
        .filter(games::Column::Id.eq(dto.id))
        .filter(games::Column::Status.eq(GameStatus::Pending))
        .filter(games::Column::SecondPlayerProgressId.is_null())
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Moves an active game to FINISHED. Returns affected rows (0 if the game is
/// not active).
pub async fn finish<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    finished_at: time::OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let result = games::Entity::update_many()
        .col_expr(games::Column::Status, Expr::val(GameStatus::Finished).into())
        .col_expr(
            games::Column::FinishGameDate,
            Expr::val(Some(finished_at)).into(),
        )
        .filter(games::Column::Id.eq(game_id))
        .filter(games::Column::Status.eq(GameStatus::Active))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
