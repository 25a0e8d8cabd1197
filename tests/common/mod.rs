#![allow(dead_code)]

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    test, web,
};
use fake::{
    Fake,
    faker::internet::en::{SafeEmail, Username},
};
use serde_json::Value;
use uuid::Uuid;

use hackjam::middleware::RequestId;
use hackjam::{AppState, InMemoryStore, routes};

pub const ALICE: &str = "alice@example.com";
pub const BOB: &str = "bob@example.com";
pub const CAROL: &str = "carol@example.com";
pub const ORGANIZER: &str = "org@example.com";
pub const EVENT: &str = "jam1";

/// Three participants and one organizer; only Alice is registered for `jam1`.
pub async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.add_user(ALICE, "alice", 0, "tok-alice").await;
    store.add_user(BOB, "bob", 0, "tok-bob").await;
    store.add_user(CAROL, "carol", 0, "tok-carol").await;
    store.add_user(ORGANIZER, "org", 1, "tok-org").await;
    store.add_skill(ALICE, "rust").await;
    store.add_skill(BOB, "figma").await;
    store.add_event(EVENT).await;
    store.register_for_event(EVENT, ALICE).await;
    store
}

/// Adds a participant with generated credentials and returns `(email, token)`.
pub async fn random_participant(store: &InMemoryStore) -> (String, String) {
    let email: String = SafeEmail().fake();
    let username: String = Username().fake();
    let token = Uuid::new_v4().to_string();
    store.add_user(&email, &username, 0, &token).await;
    (email, token)
}

pub fn app(
    store: InMemoryStore,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(AppState::new(store)))
        .wrap(RequestId)
        .configure(routes::configure::<InMemoryStore>)
}

/// Sends `req` and returns the status with the decoded JSON body.
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}
