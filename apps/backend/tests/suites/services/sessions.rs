use quizduel_backend::entities::games::GameStatus;
use quizduel_backend::errors::ErrorCode;
use quizduel_backend::services::{matchmaking, sessions};

use crate::support::build_test_state;
use crate::support::factory::{create_user, seed_questions};
use crate::support::test_state::db;

#[tokio::test]
async fn unknown_game_has_no_extended_view() {
    let state = build_test_state(3).await.unwrap();
    assert!(sessions::get_extended(db(&state), 4242).await.unwrap().is_none());
    assert!(sessions::get_by_id(db(&state), 4242).await.unwrap().is_none());
}

#[tokio::test]
async fn pending_game_extends_to_first_player_only() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 5).await;
    let alice = create_user(db(&state), "alice").await;

    let game = matchmaking::create_game(db(&state), alice.id).await.unwrap();
    let ext = sessions::get_extended(db(&state), game.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(ext.game.status, GameStatus::Pending);
    assert!(ext.questions.is_empty());
    assert!(ext.second_player.is_none());
    assert_eq!(ext.first_player.user.id, alice.id);
    assert_eq!(ext.first_player.user.login, "alice");
    assert_eq!(ext.first_player.progress.id, game.first_player_progress_id);
    assert!(ext.first_player.answers.is_empty());
}

#[tokio::test]
async fn active_game_reads_the_same_for_both_players() {
    let state = build_test_state(4).await.unwrap();
    seed_questions(db(&state), 10).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;

    matchmaking::connect_player(&state, alice.id).await.unwrap();
    let joined = matchmaking::connect_player(&state, bob.id).await.unwrap();

    let ext = sessions::get_extended(db(&state), joined.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ext.game.status, GameStatus::Active);
    assert_eq!(ext.first_player.user.id, alice.id);
    assert_eq!(ext.second_player.as_ref().unwrap().user.id, bob.id);
    assert_eq!(
        ext.questions.iter().map(|q| q.order).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );

    let for_alice = sessions::read_view(&state, joined.id, alice.id).await.unwrap();
    let for_bob = sessions::read_view(&state, joined.id, bob.id).await.unwrap();
    let ids = |v: &sessions::GameView| v.questions.iter().map(|q| q.question_id).collect::<Vec<_>>();
    assert_eq!(ids(&for_alice), ids(&for_bob));
    assert_eq!(for_alice.status, for_bob.status);
    assert!(for_alice.first_player.is_viewer);
    assert!(for_bob.second_player.unwrap().is_viewer);
}

#[tokio::test]
async fn outsiders_cannot_read_a_game() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 5).await;
    let alice = create_user(db(&state), "alice").await;
    let mallory = create_user(db(&state), "mallory").await;

    let game = matchmaking::create_game(db(&state), alice.id).await.unwrap();

    let err = sessions::read_view(&state, game.id, mallory.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);

    let err = sessions::read_view(&state, game.id + 100, alice.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
}

#[tokio::test]
async fn current_game_follows_the_user() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 5).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;

    assert!(sessions::current_game_for_user(db(&state), alice.id)
        .await
        .unwrap()
        .is_none());

    let pending = matchmaking::connect_player(&state, alice.id).await.unwrap();
    let current = sessions::current_game_for_user(db(&state), alice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, pending.id);

    matchmaking::connect_player(&state, bob.id).await.unwrap();
    let bobs = sessions::current_game_for_user(db(&state), bob.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bobs.id, pending.id);
    assert_eq!(bobs.status, GameStatus::Active);
}
