use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifecycle of a game: PENDING (waiting for an opponent), ACTIVE, FINISHED.
///
/// Stored as text so the same schema works on Postgres and SQLite.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "FINISHED")]
    Finished,
}

impl GameStatus {
    /// Pending and active games hold their players; finished ones do not.
    pub fn is_open(self) -> bool {
        matches!(self, GameStatus::Pending | GameStatus::Active)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub status: GameStatus,
    #[sea_orm(column_name = "first_player_progress_id")]
    pub first_player_progress_id: i64,
    #[sea_orm(column_name = "second_player_progress_id")]
    pub second_player_progress_id: Option<i64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "start_game_date")]
    pub start_game_date: Option<OffsetDateTime>,
    #[sea_orm(column_name = "finish_game_date")]
    pub finish_game_date: Option<OffsetDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::progress::Entity",
        from = "Column::FirstPlayerProgressId",
        to = "super::progress::Column::Id"
    )]
    FirstPlayerProgress,
    #[sea_orm(
        belongs_to = "super::progress::Entity",
        from = "Column::SecondPlayerProgressId",
        to = "super::progress::Column::Id"
    )]
    SecondPlayerProgress,
    #[sea_orm(has_many = "super::game_questions::Entity")]
    GameQuestions,
}

impl Related<super::game_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
