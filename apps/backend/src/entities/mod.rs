pub mod answers;
pub mod game_questions;
pub mod games;
pub mod progress;
pub mod questions;
pub mod users;

pub use answers::Entity as Answers;
pub use game_questions::Entity as GameQuestions;
pub use games::Entity as Games;
pub use progress::Entity as Progress;
pub use questions::Entity as Questions;
pub use users::Entity as Users;
pub use users::Model as User;
