use sea_orm::ConnectionTrait;

use crate::errors::domain::DomainError;
use crate::repos::games as games_repo;

/// True if a PENDING or ACTIVE game references a progress record of
/// `user_id` in either slot.
///
/// Only meaningful as an admission gate when evaluated in the same
/// transaction as the write it guards, after the user row lock is taken.
pub async fn is_user_in_open_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    Ok(games_repo::find_open_for_user(conn, user_id)
        .await?
        .is_some())
}
