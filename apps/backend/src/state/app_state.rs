use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::game::GameConfig;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Matchmaking and session tunables
    pub game: GameConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig, game: GameConfig) -> Self {
        Self {
            db: Some(db),
            security,
            game,
        }
    }

    /// AppState without a database connection (health checks, extractor tests)
    pub fn new_without_db(security: SecurityConfig, game: GameConfig) -> Self {
        Self {
            db: None,
            security,
            game,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
