//! Repository functions for the domain layer (generic over ConnectionTrait).

pub mod games;
pub mod progress;
pub mod questions;
pub mod users;
