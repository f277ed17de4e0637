//! SeaORM adapters. Functions are generic over `ConnectionTrait` and return
//! `DbErr`; the repos layer maps errors to `DomainError`.

pub mod answers_sea;
pub mod game_questions_sea;
pub mod games_sea;
pub mod progress_sea;
pub mod questions_sea;
pub mod users_sea;
