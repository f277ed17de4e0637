//! Error codes for the quiz duel API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the quiz duel API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// User not found in database
    ForbiddenUserNotFound,

    // Request Validation
    /// Invalid game ID provided
    InvalidGameId,
    /// User tried to join their own game
    SelfJoin,
    /// Game is not accepting answers
    GameNotActive,
    /// User is not one of the game's players
    NotAParticipant,
    /// Every question of the game has been answered
    AllQuestionsAnswered,
    /// Answer body is blank
    EmptyAnswer,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// User already has an open game
    ParticipationConflict,
    /// Join attempt lost the activation race
    RaceLost,
    /// Questions were already assigned to the game
    DuplicateAssignment,
    /// Unique user sub constraint
    UniqueSub,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database unavailable
    DbUnavailable,
    /// Database timeout (gateway timeout)
    DbTimeout,
    /// Question pool too small for a game
    InsufficientQuestions,

    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",

            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::SelfJoin => "SELF_JOIN",
            Self::GameNotActive => "GAME_NOT_ACTIVE",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::AllQuestionsAnswered => "ALL_QUESTIONS_ANSWERED",
            Self::EmptyAnswer => "EMPTY_ANSWER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::ParticipationConflict => "PARTICIPATION_CONFLICT",
            Self::RaceLost => "RACE_LOST",
            Self::DuplicateAssignment => "DUPLICATE_ASSIGNMENT",
            Self::UniqueSub => "UNIQUE_SUB",
            Self::Conflict => "CONFLICT",

            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::InsufficientQuestions => "INSUFFICIENT_QUESTIONS",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
