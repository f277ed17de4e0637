use quizduel_backend::errors::domain::{DomainError, ValidationKind};
use quizduel_backend::repos::questions::GameQuestion;
use quizduel_backend::services::{matchmaking, progress, questions, sessions};
use quizduel_backend::state::app_state::AppState;

use crate::support::build_test_state;
use crate::support::factory::{create_user, seed_questions};
use crate::support::test_state::db;

struct Duel {
    state: AppState,
    game_id: i64,
    alice: i64,
    bob: i64,
    questions: Vec<GameQuestion>,
}

async fn active_duel(questions_per_game: usize) -> Duel {
    let state = build_test_state(questions_per_game).await.unwrap();
    seed_questions(db(&state), questions_per_game + 3).await;
    let alice = create_user(db(&state), "alice").await.id;
    let bob = create_user(db(&state), "bob").await.id;

    matchmaking::connect_player(&state, alice).await.unwrap();
    let game = matchmaking::connect_player(&state, bob).await.unwrap();
    let questions = questions::questions_for_game(db(&state), game.id)
        .await
        .unwrap();

    Duel {
        state,
        game_id: game.id,
        alice,
        bob,
        questions,
    }
}

#[tokio::test]
async fn answers_follow_question_order_and_score() {
    let duel = active_duel(3).await;
    let conn = db(&duel.state);
    let q = &duel.questions;

    let expected = format!("  {}  ", q[0].question.correct_answer.to_uppercase());
    let first = progress::record_answer(conn, duel.game_id, duel.alice, &expected)
        .await
        .unwrap();
    assert!(first.is_correct);
    assert_eq!(first.question_id, q[0].question.id);
    assert_eq!(first.order, 0);
    assert_eq!((first.score, first.answered, first.total), (1, 1, 3));

    let second = progress::record_answer(conn, duel.game_id, duel.alice, "wrong")
        .await
        .unwrap();
    assert!(!second.is_correct);
    assert_eq!(second.question_id, q[1].question.id);
    assert_eq!(second.correct_answer, q[1].question.correct_answer);
    assert_eq!(second.score, 1);

    let third = progress::record_answer(
        conn,
        duel.game_id,
        duel.alice,
        &q[2].question.correct_answer,
    )
    .await
    .unwrap();
    assert_eq!((third.score, third.answered), (2, 3));

    let err = progress::record_answer(conn, duel.game_id, duel.alice, "more")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::AllQuestionsAnswered, _)
    ));

    let ext = sessions::get_extended(conn, duel.game_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ext.first_player.progress.score, 2);
    assert_eq!(ext.first_player.answers.len(), 3);
    assert_eq!(ext.second_player.unwrap().progress.score, 0);
}

#[tokio::test]
async fn answers_reveal_only_to_the_answering_player() {
    let duel = active_duel(2).await;
    let conn = db(&duel.state);

    progress::record_answer(conn, duel.game_id, duel.bob, "guess")
        .await
        .unwrap();

    let for_bob = sessions::read_view(&duel.state, duel.game_id, duel.bob)
        .await
        .unwrap();
    assert!(for_bob.questions[0].correct_answer.is_some());
    assert!(for_bob.questions[1].correct_answer.is_none());

    let for_alice = sessions::read_view(&duel.state, duel.game_id, duel.alice)
        .await
        .unwrap();
    assert!(for_alice.questions.iter().all(|q| q.correct_answer.is_none()));
    let opponent = for_alice.second_player.unwrap();
    assert_eq!(opponent.answered, 1);
    assert!(opponent.answers.is_empty());
}

#[tokio::test]
async fn rejected_submissions() {
    let duel = active_duel(2).await;
    let conn = db(&duel.state);
    let outsider = create_user(conn, "outsider").await;

    let err = progress::record_answer(conn, duel.game_id, duel.alice, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::EmptyAnswer, _)));

    let err = progress::record_answer(conn, duel.game_id, outsider.id, "x")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotAParticipant, _)
    ));

    let err = progress::record_answer(conn, duel.game_id + 50, duel.alice, "x")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_, _)));

    let pending = matchmaking::create_game(conn, outsider.id).await.unwrap();
    let err = progress::record_answer(conn, pending.id, outsider.id, "x")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::GameNotActive, _)
    ));
}
