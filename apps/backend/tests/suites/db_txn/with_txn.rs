use quizduel_backend::db::txn::with_txn;
use quizduel_backend::errors::ErrorCode;
use quizduel_backend::infra::state::build_state;
use quizduel_backend::repos::users as users_repo;
use quizduel_backend::AppError;

use crate::support::build_test_state;
use crate::support::test_state::db;

#[tokio::test]
async fn commits_on_ok() {
    let state = build_test_state(3).await.unwrap();

    let user = with_txn(&state, |txn| {
        Box::pin(async move { Ok(users_repo::create_user(txn, "sub-commit", "committed").await?) })
    })
    .await
    .unwrap();

    let found = users_repo::find_user_by_sub(db(&state), "sub-commit")
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn rolls_back_on_err() {
    let state = build_test_state(3).await.unwrap();

    let err = with_txn(&state, |txn| {
        Box::pin(async move {
            users_repo::create_user(txn, "sub-rollback", "doomed").await?;
            Err::<(), _>(AppError::conflict(ErrorCode::RaceLost, "lost"))
        })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RaceLost);

    let found = users_repo::find_user_by_sub(db(&state), "sub-rollback")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn unique_sub_maps_to_conflict() {
    let state = build_test_state(3).await.unwrap();
    users_repo::create_user(db(&state), "sub-dup", "first")
        .await
        .unwrap();

    let err = with_txn(&state, |txn| {
        Box::pin(async move { Ok(users_repo::create_user(txn, "sub-dup", "second").await?) })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UniqueSub);
}

#[tokio::test]
async fn without_db_is_unavailable() {
    let state = build_state().build().await.unwrap();

    let err = with_txn(&state, |_txn| Box::pin(async move { Ok(()) }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DbUnavailable);
}
