use std::env;

use crate::error::AppError;

const DEFAULT_QUESTIONS_PER_GAME: usize = 5;
const DEFAULT_READ_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_CONNECT_RETRY_ATTEMPTS: u32 = 5;

/// Tunables for matchmaking and session reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Size of the question set drawn for every game
    pub questions_per_game: usize,
    /// Attempts for idempotent reads that hit a transient storage failure
    pub read_retry_attempts: u32,
    /// Attempts for a whole connect transaction rolled back by a transient
    /// storage failure
    pub connect_retry_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            questions_per_game: DEFAULT_QUESTIONS_PER_GAME,
            read_retry_attempts: DEFAULT_READ_RETRY_ATTEMPTS,
            connect_retry_attempts: DEFAULT_CONNECT_RETRY_ATTEMPTS,
        }
    }
}

impl GameConfig {
    /// Read `QUIZ_QUESTIONS_PER_GAME`, `QUIZ_READ_RETRY_ATTEMPTS` and
    /// `QUIZ_CONNECT_RETRY_ATTEMPTS`, falling back to defaults when unset.
    pub fn from_env() -> Result<Self, AppError> {
        let questions_per_game = match env::var("QUIZ_QUESTIONS_PER_GAME") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
                AppError::config(format!(
                    "QUIZ_QUESTIONS_PER_GAME must be a positive integer, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_QUESTIONS_PER_GAME,
        };
        if questions_per_game == 0 {
            return Err(AppError::config(
                "QUIZ_QUESTIONS_PER_GAME must be at least 1",
            ));
        }

        let read_retry_attempts =
            attempts_var("QUIZ_READ_RETRY_ATTEMPTS", DEFAULT_READ_RETRY_ATTEMPTS)?;
        let connect_retry_attempts =
            attempts_var("QUIZ_CONNECT_RETRY_ATTEMPTS", DEFAULT_CONNECT_RETRY_ATTEMPTS)?;

        Ok(Self {
            questions_per_game,
            read_retry_attempts: read_retry_attempts.max(1),
            connect_retry_attempts: connect_retry_attempts.max(1),
        })
    }

    pub fn with_questions_per_game(mut self, count: usize) -> Self {
        self.questions_per_game = count;
        self
    }
}

fn attempts_var(name: &str, default: u32) -> Result<u32, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<u32>().map_err(|_| {
            AppError::config(format!(
                "{name} must be a non-negative integer, got '{raw}'"
            ))
        }),
        Err(_) => Ok(default),
    }
}
