use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;

use hackjam::{InMemoryStore, TeamWorkflow};

mod common;

use common::{ALICE, BOB, EVENT, app, seeded_store, send};

/// Alpha team with Bob invited, accepted, kicked, then invited again.
async fn busy_inbox(store: &InMemoryStore) -> i64 {
    let workflow = TeamWorkflow::new(store.clone());
    let team_id = workflow
        .create_team("tok-alice", EVENT, "Alpha")
        .await
        .unwrap()
        .id;
    workflow
        .invite_user("tok-alice", team_id, BOB, "Designer")
        .await
        .unwrap();
    workflow.accept_invite("tok-bob", team_id, ALICE).await.unwrap();
    workflow.kick_user("tok-alice", team_id, BOB).await.unwrap();
    workflow
        .invite_user("tok-alice", team_id, BOB, "Designer")
        .await
        .unwrap();
    team_id
}

#[actix_web::test]
async fn test_list_notifications_newest_first() {
    let store = seeded_store().await;
    let team_id = busy_inbox(&store).await;
    let app = test::init_service(app(store)).await;

    let req = test::TestRequest::get()
        .uri("/api/notifications")
        .insert_header(("Authorization", "Bearer tok-bob"))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    let notifications = body["data"]["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0]["notify_type"], 0);
    assert_eq!(notifications[1]["notify_type"], 3);
    assert_eq!(notifications[0]["team_id"], team_id);
    assert_eq!(notifications[0]["event_urid"], EVENT);
    assert_eq!(notifications[0]["from"]["email"], ALICE);
    assert_eq!(notifications[0]["from"]["username"], "alice");
}

#[actix_web::test]
async fn test_clear_keeps_pending_invites() {
    let store = seeded_store().await;
    busy_inbox(&store).await;
    let app = test::init_service(app(store.clone())).await;

    let req = test::TestRequest::delete()
        .uri("/api/notifications")
        .insert_header(("Authorization", "Bearer tok-bob"))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    let remaining = body["data"]["notifications"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["notify_type"], 0);
    assert_eq!(store.notifications_for(BOB).await.len(), 1);
}

#[actix_web::test]
async fn test_notifications_require_a_token() {
    let app = test::init_service(app(seeded_store().await)).await;

    let req = test::TestRequest::get().uri("/api/notifications").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User not found");

    let req = test::TestRequest::get()
        .uri("/api/notifications")
        .insert_header(("Authorization", "Bearer nope"))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_notifications_accept_body_token() {
    let store = seeded_store().await;
    busy_inbox(&store).await;
    let app = test::init_service(app(store.clone())).await;

    let req = test::TestRequest::get()
        .uri("/api/notifications")
        .set_json(json!({ "access_token": "tok-bob" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notifications"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::delete()
        .uri("/api/notifications")
        .set_json(json!({ "access_token": "tok-bob" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["notifications"].as_array().unwrap().len(), 1);
    assert_eq!(store.notifications_for(BOB).await.len(), 1);

    let req = test::TestRequest::delete()
        .uri("/api/notifications")
        .set_json(json!({ "access_token": "nope" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_profile_card_by_username() {
    let app = test::init_service(app(seeded_store().await)).await;

    let req = test::TestRequest::get().uri("/api/user/bob").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], BOB);
    assert_eq!(body["data"]["skills"], json!(["figma"]));

    let req = test::TestRequest::get().uri("/api/user/nobody").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_join_then_create_then_exit() {
    let store = seeded_store().await;
    let app = test::init_service(app(store)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/event/{}/join", EVENT))
        .set_json(json!({ "access_token": "tok-bob" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let req = test::TestRequest::post()
        .uri("/api/team/create")
        .set_json(json!({ "access_token": "tok-bob", "urid": EVENT, "name": "Beta" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["teamleader"], BOB);

    let req = test::TestRequest::post()
        .uri(&format!("/api/event/{}/exit", EVENT))
        .set_json(json!({ "access_token": "tok-bob" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/team/create")
        .set_json(json!({ "access_token": "tok-bob", "urid": EVENT, "name": "Gamma" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_event_registration_errors() {
    let app = test::init_service(app(seeded_store().await)).await;

    let req = test::TestRequest::post()
        .uri("/api/event/unknown/join")
        .set_json(json!({ "access_token": "tok-bob" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri(&format!("/api/event/{}/join", EVENT))
        .set_json(json!({ "access_token": "tok-org" }))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
