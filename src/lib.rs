pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::{InMemoryStore, PgStore, store::Store};
pub use error::AppError;
pub use services::{EventRegistration, NotificationInbox, ProfileDirectory, TeamWorkflow};

/// Services shared by every worker, all backed by the same store.
pub struct AppState<S: Store> {
    pub workflow: TeamWorkflow<S>,
    pub inbox: NotificationInbox<S>,
    pub events: EventRegistration<S>,
    pub profiles: ProfileDirectory<S>,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S) -> Self {
        Self {
            workflow: TeamWorkflow::new(store.clone()),
            inbox: NotificationInbox::new(store.clone()),
            events: EventRegistration::new(store.clone()),
            profiles: ProfileDirectory::new(store),
        }
    }
}
