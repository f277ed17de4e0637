use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use quizduel_backend::auth::jwt::mint_access_token;
use quizduel_backend::entities::progress;
use quizduel_backend::repos::questions::{self as questions_repo, Question};
use quizduel_backend::repos::users::{self as users_repo, User};
use quizduel_backend::state::app_state::AppState;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

static NEXT_SUB: AtomicU64 = AtomicU64::new(1);

/// User with a unique `sub` derived from `login`.
pub async fn create_user<C: ConnectionTrait + Send + Sync>(conn: &C, login: &str) -> User {
    let n = NEXT_SUB.fetch_add(1, Ordering::Relaxed);
    users_repo::create_user(conn, &format!("sub-{login}-{n}"), login)
        .await
        .expect("create user")
}

/// `count` published questions; question `i` answers to `answer-i`.
pub async fn seed_questions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    count: usize,
) -> Vec<Question> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let q = questions_repo::create_question(
            conn,
            &format!("Question {i}?"),
            &format!("answer-{i}"),
            true,
        )
        .await
        .expect("create question");
        out.push(q);
    }
    out
}

pub async fn seed_unpublished_question<C: ConnectionTrait + Send + Sync>(conn: &C) -> Question {
    questions_repo::create_question(conn, "Draft?", "draft", false)
        .await
        .expect("create draft question")
}

pub async fn count_progress_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> u64 {
    progress::Entity::find()
        .filter(progress::Column::UserId.eq(user_id))
        .count(conn)
        .await
        .expect("count progress")
}

pub fn bearer_for(state: &AppState, user: &User) -> String {
    let token = mint_access_token(&user.sub, SystemTime::now(), &state.security)
        .expect("mint token");
    format!("Bearer {token}")
}
