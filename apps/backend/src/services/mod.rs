//! Matchmaking and game-session services.
//!
//! Services are free functions over a `ConnectionTrait`; callers decide the
//! transaction boundary (see `db::txn::with_txn`).

pub mod matchmaking;
pub mod participation;
pub mod progress;
pub mod questions;
pub mod sessions;
