use actix_web::test;
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::factory::{bearer_for, create_user, seed_questions};
use crate::support::test_state::db;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn connection_flow_over_http() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 6).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;
    let alice_auth = bearer_for(&state, &alice);
    let bob_auth = bearer_for(&state, &bob);
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/games/connection")
        .insert_header(("Authorization", alice_auth.clone()))
        .to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending["status"], "PENDING");
    assert!(pending["second_player"].is_null());
    assert_eq!(pending["first_player"]["login"], "alice");

    let req = test::TestRequest::post()
        .uri("/api/games/connection")
        .insert_header(("Authorization", alice_auth.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 409, "PARTICIPATION_CONFLICT").await;

    let req = test::TestRequest::post()
        .uri("/api/games/connection")
        .insert_header(("Authorization", bob_auth))
        .to_request();
    let active: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active["id"], pending["id"]);
    assert_eq!(active["status"], "ACTIVE");
    assert_eq!(active["second_player"]["login"], "bob");
    assert_eq!(active["second_player"]["is_viewer"], true);

    let questions = active["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    for (i, q) in questions.iter().enumerate() {
        assert_eq!(q["order"], i);
        assert!(q.get("correct_answer").is_none());
    }

    let req = test::TestRequest::get()
        .uri("/api/games/current")
        .insert_header(("Authorization", alice_auth))
        .to_request();
    let current: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(current["id"], pending["id"]);
    assert_eq!(current["first_player"]["is_viewer"], true);
}

#[actix_web::test]
async fn games_are_visible_to_their_players_only() {
    let state = build_test_state(3).await.unwrap();
    seed_questions(db(&state), 6).await;
    let alice = create_user(db(&state), "alice").await;
    let mallory = create_user(db(&state), "mallory").await;
    let alice_auth = bearer_for(&state, &alice);
    let mallory_auth = bearer_for(&state, &mallory);
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/games/connection")
        .insert_header(("Authorization", alice_auth.clone()))
        .to_request();
    let game: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/games/{}", game["id"]);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", alice_auth.clone()))
        .to_request();
    let own: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own["id"], game["id"]);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(("Authorization", mallory_auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 404, "GAME_NOT_FOUND").await;

    for bad in ["/api/games/abc", "/api/games/0", "/api/games/-1"] {
        let req = test::TestRequest::get()
            .uri(bad)
            .insert_header(("Authorization", alice_auth.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem(resp, 400, "INVALID_GAME_ID").await;
    }
}

#[actix_web::test]
async fn answering_over_http_reveals_the_answer() {
    let state = build_test_state(2).await.unwrap();
    seed_questions(db(&state), 4).await;
    let alice = create_user(db(&state), "alice").await;
    let bob = create_user(db(&state), "bob").await;
    let alice_auth = bearer_for(&state, &alice);
    let bob_auth = bearer_for(&state, &bob);
    let app = create_test_app(state).await;

    for auth in [&alice_auth, &bob_auth] {
        let req = test::TestRequest::post()
            .uri("/api/games/connection")
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri("/api/games/current")
        .insert_header(("Authorization", alice_auth.clone()))
        .to_request();
    let game: Value = test::call_and_read_body_json(&app, req).await;
    let answers_uri = format!("/api/games/{}/answers", game["id"]);

    let req = test::TestRequest::post()
        .uri(&answers_uri)
        .insert_header(("Authorization", alice_auth.clone()))
        .set_json(json!({ "answer": "surely wrong" }))
        .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(outcome["is_correct"], false);
    assert_eq!(outcome["order"], 0);
    assert_eq!(outcome["answered"], 1);
    assert_eq!(outcome["total"], 2);
    assert_eq!(outcome["score"], 0);
    let revealed = outcome["correct_answer"].clone();

    let req = test::TestRequest::post()
        .uri(&answers_uri)
        .insert_header(("Authorization", alice_auth.clone()))
        .set_json(json!({ "answer": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, 422, "EMPTY_ANSWER").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{}", game["id"]))
        .insert_header(("Authorization", alice_auth))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["questions"][0]["correct_answer"], revealed);
    assert!(view["questions"][1].get("correct_answer").is_none());
    assert_eq!(view["first_player"]["answers"][0]["body"], "surely wrong");
    assert!(view["second_player"].get("answers").is_none());
}
