//! DTOs for games_sea adapter.

use time::OffsetDateTime;

/// DTO for creating a new pending game.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub first_player_progress_id: i64,
}

impl GameCreate {
    pub fn new(first_player_progress_id: i64) -> Self {
        Self {
            first_player_progress_id,
        }
    }
}

/// DTO for the compare-and-swap activation of a pending game.
#[derive(Debug, Clone)]
pub struct GameActivate {
    pub id: i64,
    pub second_player_progress_id: i64,
    pub started_at: OffsetDateTime,
}

impl GameActivate {
    pub fn new(id: i64, second_player_progress_id: i64) -> Self {
        Self {
            id,
            second_player_progress_id,
            started_at: OffsetDateTime::now_utc(),
        }
    }
}
