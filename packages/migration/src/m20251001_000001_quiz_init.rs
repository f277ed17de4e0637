use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Sub,
    Login,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Questions {
    Table,
    Id,
    Body,
    CorrectAnswer,
    Published,
    CreatedAt,
}

#[derive(Iden)]
enum Progress {
    Table,
    Id,
    UserId,
    Score,
    CreatedAt,
}

#[derive(Iden)]
enum Answers {
    Table,
    Id,
    ProgressId,
    QuestionId,
    Body,
    IsCorrect,
    AddedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    Status,
    FirstPlayerProgressId,
    SecondPlayerProgressId,
    CreatedAt,
    StartGameDate,
    FinishGameDate,
}

#[derive(Iden)]
enum GameQuestions {
    Table,
    Id,
    GameId,
    QuestionId,
    QuestionOrder,
}

fn big_pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(big_pk(Users::Id))
                    .col(ColumnDef::new(Users::Sub).string().not_null())
                    .col(ColumnDef::new(Users::Login).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_sub_unique")
                    .table(Users::Table)
                    .col(Users::Sub)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // questions
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(big_pk(Questions::Id))
                    .col(ColumnDef::new(Questions::Body).text().not_null())
                    .col(ColumnDef::new(Questions::CorrectAnswer).string().not_null())
                    .col(
                        ColumnDef::new(Questions::Published)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questions_published")
                    .table(Questions::Table)
                    .col(Questions::Published)
                    .to_owned(),
            )
            .await?;

        // progress
        manager
            .create_table(
                Table::create()
                    .table(Progress::Table)
                    .if_not_exists()
                    .col(big_pk(Progress::Id))
                    .col(ColumnDef::new(Progress::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Progress::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Progress::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_user_id")
                            .from(Progress::Table, Progress::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_progress_user_id")
                    .table(Progress::Table)
                    .col(Progress::UserId)
                    .to_owned(),
            )
            .await?;

        // answers
        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(big_pk(Answers::Id))
                    .col(ColumnDef::new(Answers::ProgressId).big_integer().not_null())
                    .col(ColumnDef::new(Answers::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(Answers::Body).string().not_null())
                    .col(ColumnDef::new(Answers::IsCorrect).boolean().not_null())
                    .col(
                        ColumnDef::new(Answers::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_progress_id")
                            .from(Answers::Table, Answers::ProgressId)
                            .to(Progress::Table, Progress::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_question_id")
                            .from(Answers::Table, Answers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One answer per question per player
        manager
            .create_index(
                Index::create()
                    .name("ux_answers_progress_question")
                    .table(Answers::Table)
                    .col(Answers::ProgressId)
                    .col(Answers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(big_pk(Games::Id))
                    .col(ColumnDef::new(Games::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Games::FirstPlayerProgressId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::SecondPlayerProgressId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::StartGameDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::FinishGameDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_first_player_progress_id")
                            .from(Games::Table, Games::FirstPlayerProgressId)
                            .to(Progress::Table, Progress::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_second_player_progress_id")
                            .from(Games::Table, Games::SecondPlayerProgressId)
                            .to(Progress::Table, Progress::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Open-slot scan: pending games oldest first
        manager
            .create_index(
                Index::create()
                    .name("idx_games_status_created_at")
                    .table(Games::Table)
                    .col(Games::Status)
                    .col(Games::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // A progress record belongs to at most one game slot
        manager
            .create_index(
                Index::create()
                    .name("ux_games_first_player_progress")
                    .table(Games::Table)
                    .col(Games::FirstPlayerProgressId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_games_second_player_progress")
                    .table(Games::Table)
                    .col(Games::SecondPlayerProgressId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // game_questions
        manager
            .create_table(
                Table::create()
                    .table(GameQuestions::Table)
                    .if_not_exists()
                    .col(big_pk(GameQuestions::Id))
                    .col(ColumnDef::new(GameQuestions::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(GameQuestions::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameQuestions::QuestionOrder)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_questions_game_id")
                            .from(GameQuestions::Table, GameQuestions::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_questions_question_id")
                            .from(GameQuestions::Table, GameQuestions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_questions_game_order")
                    .table(GameQuestions::Table)
                    .col(GameQuestions::GameId)
                    .col(GameQuestions::QuestionOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_questions_game_question")
                    .table(GameQuestions::Table)
                    .col(GameQuestions::GameId)
                    .col(GameQuestions::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Answers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Progress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
