use std::path::Path;

use quizduel_backend::config::{DbKind, GameConfig, RuntimeEnv};
use quizduel_backend::infra::state::build_state;
use quizduel_backend::state::app_state::AppState;
use quizduel_backend::state::security_config::SecurityConfig;
use quizduel_backend::AppError;
use sea_orm::DatabaseConnection;

pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret";

/// Fresh migrated in-memory database per call.
pub async fn build_test_state(questions_per_game: usize) -> Result<AppState, AppError> {
    build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(DbKind::SqliteMemory)
        .with_security(SecurityConfig::new(TEST_JWT_SECRET))
        .with_game_config(GameConfig::default().with_questions_per_game(questions_per_game))
        .build()
        .await
}

/// Migrated SQLite file at `path` behind the multi-connection file pool.
///
/// Points `SQLITE_DB_PATH` at the file; callers must be `#[serial]`.
pub async fn build_file_test_state(
    path: &Path,
    questions_per_game: usize,
) -> Result<AppState, AppError> {
    std::env::set_var("SQLITE_DB_PATH", path);
    build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(DbKind::SqliteFile)
        .with_security(SecurityConfig::new(TEST_JWT_SECRET))
        .with_game_config(GameConfig::default().with_questions_per_game(questions_per_game))
        .build()
        .await
}

pub fn db(state: &AppState) -> &DatabaseConnection {
    state.db().expect("test state has a database")
}
