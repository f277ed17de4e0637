pub mod db;
pub mod game;

pub use db::{db_url, DbKind, RuntimeEnv};
pub use game::GameConfig;
