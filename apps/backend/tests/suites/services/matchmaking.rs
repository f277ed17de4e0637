use std::collections::HashMap;

use futures_util::future::join_all;
use serial_test::serial;
use quizduel_backend::db::txn::with_txn;
use quizduel_backend::entities::games::GameStatus;
use quizduel_backend::errors::domain::{ConflictKind, DomainError, ValidationKind};
use quizduel_backend::errors::ErrorCode;
use quizduel_backend::repos::games as games_repo;
use quizduel_backend::services::{matchmaking, participation, questions, sessions};
use quizduel_backend::state::app_state::AppState;

use crate::support::factory::{count_progress_for_user, create_user, seed_questions};
use crate::support::test_state::{build_file_test_state, db};
use crate::support::build_test_state;

async fn connect_in_txn(
    state: &AppState,
    user_id: i64,
) -> Result<games_repo::Game, quizduel_backend::AppError> {
    let n = state.game.questions_per_game;
    with_txn(state, move |txn| {
        Box::pin(async move { Ok(matchmaking::connect(txn, user_id, n).await?) })
    })
    .await
}

#[tokio::test]
async fn first_connection_creates_pending_game() {
    let state = build_test_state(5).await.unwrap();
    seed_questions(db(&state), 10).await;
    let alice = create_user(db(&state), "alice").await;

    let view = matchmaking::connect_player(&state, alice.id).await.unwrap();

    assert_eq!(view.status, GameStatus::Pending);
    assert!(view.second_player.is_none());
    assert!(view.questions.is_empty());
    assert!(view.start_game_date.is_none());
    assert_eq!(view.first_player.user_id, alice.id);
    assert!(view.first_player.is_viewer);
    assert_eq!(view.first_player.score, 0);
}

#[tokio::test]
async fn second_connection_while_open_is_participation_conflict() {
    let state = build_test_state(5).await.unwrap();
    seed_questions(db(&state), 10).await;
    let alice = create_user(db(&state), "alice").await;

    matchmaking::connect_player(&state, alice.id).await.unwrap();
    let err = matchmaking::connect_player(&state, alice.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ParticipationConflict);

    let err = matchmaking::create_game(db(&state), alice.id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::ParticipationConflict, _)
    ));
    assert_eq!(count_progress_for_user(db(&state), alice.id).await, 1);
}

#[tokio::test]
async fn second_player_activates_game_with_ordered_questions() {
    let state = build_test_state(5).await.unwrap();
    seed_questions(db(&state), 12).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;

    let pending = matchmaking::connect_player(&state, alice.id).await.unwrap();
    let active = matchmaking::connect_player(&state, bob.id).await.unwrap();

    assert_eq!(active.id, pending.id);
    assert_eq!(active.status, GameStatus::Active);
    assert!(active.start_game_date.is_some());
    assert!(active.finish_game_date.is_none());

    let orders: Vec<i32> = active.questions.iter().map(|q| q.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    assert!(active.questions.iter().all(|q| q.correct_answer.is_none()));

    let second = active.second_player.as_ref().unwrap();
    assert_eq!(second.user_id, bob.id);
    assert!(second.is_viewer);
    assert!(!active.first_player.is_viewer);

    assert!(participation::is_user_in_open_game(db(&state), alice.id).await.unwrap());
    assert!(participation::is_user_in_open_game(db(&state), bob.id).await.unwrap());
}

#[tokio::test]
async fn own_pending_game_is_never_offered_or_joinable() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 5).await;
    let alice = create_user(db(&state), "alice").await;

    let game = matchmaking::create_game(db(&state), alice.id).await.unwrap();
    assert!(matchmaking::find_open_slot(db(&state), alice.id)
        .await
        .unwrap()
        .is_none());

    let err = matchmaking::join_game(db(&state), alice.id, &game, 3)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::SelfJoin, _)));

    let reloaded = games_repo::require_game(db(&state), game.id).await.unwrap();
    assert!(reloaded.is_pending());
}

#[tokio::test]
async fn stale_slot_loses_race_and_leaves_no_progress_behind() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 6).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;
    let carol = create_user(db(&state), "carol").await;

    connect_in_txn(&state, alice.id).await.unwrap();
    let stale = matchmaking::find_open_slot(db(&state), bob.id)
        .await
        .unwrap()
        .unwrap();

    let taken = connect_in_txn(&state, carol.id).await.unwrap();
    assert_eq!(taken.id, stale.id);
    assert_eq!(taken.status, GameStatus::Active);

    let err = with_txn(&state, move |txn| {
        Box::pin(async move { Ok(matchmaking::join_game(txn, bob.id, &stale, 3).await?) })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RaceLost);

    assert_eq!(count_progress_for_user(db(&state), bob.id).await, 0);
    let game = games_repo::require_game(db(&state), taken.id).await.unwrap();
    assert_eq!(game.second_player_progress_id, taken.second_player_progress_id);
    assert_eq!(
        questions::questions_for_game(db(&state), taken.id).await.unwrap().len(),
        3
    );
}

#[tokio::test]
async fn joining_while_already_pending_is_participation_conflict() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 6).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;

    let alice_game = matchmaking::create_game(db(&state), alice.id).await.unwrap();
    let bob_game = matchmaking::create_game(db(&state), bob.id).await.unwrap();

    let err = matchmaking::join_game(db(&state), bob.id, &alice_game, 3)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::ParticipationConflict, _)
    ));

    let untouched = games_repo::require_game(db(&state), alice_game.id).await.unwrap();
    assert!(untouched.is_pending());
    assert!(untouched.second_player_progress_id.is_none());
    assert!(games_repo::require_game(db(&state), bob_game.id)
        .await
        .unwrap()
        .is_pending());
    assert_eq!(count_progress_for_user(db(&state), bob.id).await, 1);
}

#[tokio::test]
#[serial]
async fn concurrent_connections_pair_every_player_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_file_test_state(&dir.path().join("quizduel.db"), 3)
        .await
        .unwrap();
    seed_questions(db(&state), 6).await;
    let mut users = Vec::new();
    for i in 0..20 {
        users.push(create_user(db(&state), &format!("player{i}")).await);
    }

    let results = join_all(
        users
            .iter()
            .map(|u| matchmaking::connect_player(&state, u.id)),
    )
    .await;

    let mut per_game: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut failures = Vec::new();
    for (user, result) in users.iter().zip(results) {
        match result {
            Ok(view) => per_game.entry(view.id).or_default().push(user.id),
            Err(err) => failures.push(err.code()),
        }
    }
    assert!(failures.is_empty(), "connects failed: {failures:?}");

    assert_eq!(per_game.len(), 10);
    for (game_id, players) in &per_game {
        assert_eq!(players.len(), 2, "game {game_id} has players {players:?}");
        let ext = sessions::get_extended(db(&state), *game_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ext.game.status, GameStatus::Active);
        assert_ne!(
            ext.first_player.user.id,
            ext.second_player.as_ref().unwrap().user.id
        );
        assert_eq!(ext.questions.len(), 3);
    }
    for user in &users {
        assert_eq!(count_progress_for_user(db(&state), user.id).await, 1);
    }
}

#[tokio::test]
async fn insufficient_pool_rolls_back_the_join() {
    let state = build_test_state(5).await.unwrap();
    seed_questions(db(&state), 2).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;

    let pending = matchmaking::connect_player(&state, alice.id).await.unwrap();
    let err = matchmaking::connect_player(&state, bob.id).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientQuestions);

    let game = games_repo::require_game(db(&state), pending.id).await.unwrap();
    assert!(game.is_pending());
    assert!(game.second_player_progress_id.is_none());
    assert_eq!(count_progress_for_user(db(&state), bob.id).await, 0);
}

#[tokio::test]
async fn finished_game_frees_both_players() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 6).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;

    matchmaking::connect_player(&state, alice.id).await.unwrap();
    let active = matchmaking::connect_player(&state, bob.id).await.unwrap();

    assert!(games_repo::finish_game(db(&state), active.id).await.unwrap());
    assert!(!games_repo::finish_game(db(&state), active.id).await.unwrap());

    let finished = games_repo::require_game(db(&state), active.id).await.unwrap();
    assert_eq!(finished.status, GameStatus::Finished);
    assert!(finished.finish_game_date.is_some());

    assert!(!participation::is_user_in_open_game(db(&state), alice.id).await.unwrap());
    assert!(!participation::is_user_in_open_game(db(&state), bob.id).await.unwrap());

    let next = matchmaking::connect_player(&state, alice.id).await.unwrap();
    assert_ne!(next.id, active.id);
    assert_eq!(next.status, GameStatus::Pending);
}

#[tokio::test]
async fn oldest_pending_game_is_joined_first() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 6).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;
    let carol = create_user(db(&state), "carol").await;

    let first = matchmaking::create_game(db(&state), alice.id).await.unwrap();
    let second = matchmaking::create_game(db(&state), bob.id).await.unwrap();

    let joined = connect_in_txn(&state, carol.id).await.unwrap();
    assert_eq!(joined.id, first.id);
    assert!(games_repo::require_game(db(&state), second.id)
        .await
        .unwrap()
        .is_pending());
}
