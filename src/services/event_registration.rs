use crate::database::{
    store::{EventRoster, IdentityLookup, Store},
    transaction::finish,
};
use crate::error::AppError;

/// Joining and leaving events. Registration gates team creation.
#[derive(Clone)]
pub struct EventRegistration<S: Store> {
    store: S,
}

impl<S: Store> EventRegistration<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers the caller. Joining twice is not an error.
    pub async fn join(&self, access_token: &str, urid: &str) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            if !tx.event_exists(urid).await? {
                return Err(AppError::not_found(format!("event {} not found", urid)));
            }
            let actor = tx
                .find_by_token(access_token)
                .await?
                .ok_or(AppError::Unauthenticated)?;
            if !actor.is_participant() {
                return Err(AppError::forbidden(
                    "only ordinary participants can join events",
                ));
            }

            if tx.join_event(urid, &actor.email).await? {
                log::info!("{} registered for event {}", actor.email, urid);
            }
            Ok(())
        }
        .await;
        finish(tx, outcome).await
    }

    pub async fn exit(&self, access_token: &str, urid: &str) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            if !tx.event_exists(urid).await? {
                return Err(AppError::not_found(format!("event {} not found", urid)));
            }
            let actor = tx
                .find_by_token(access_token)
                .await?
                .ok_or(AppError::Unauthenticated)?;
            if !actor.is_participant() {
                return Err(AppError::forbidden(
                    "only ordinary participants can leave events",
                ));
            }

            if tx.leave_event(urid, &actor.email).await? {
                log::info!("{} left event {}", actor.email, urid);
            }
            Ok(())
        }
        .await;
        finish(tx, outcome).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use crate::services::TeamWorkflow;
    use assert_matches::assert_matches;

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.add_user("a@example.com", "alice", 0, "tok-a").await;
        store.add_user("org@example.com", "org", 1, "tok-org").await;
        store.add_event("jam1").await;
        store
    }

    #[tokio::test]
    async fn joining_enables_team_creation() {
        let store = seeded().await;
        let events = EventRegistration::new(store.clone());
        let workflow = TeamWorkflow::new(store);

        assert_matches!(
            workflow.create_team("tok-a", "jam1", "Alpha").await,
            Err(AppError::Forbidden(_))
        );

        events.join("tok-a", "jam1").await.unwrap();
        events.join("tok-a", "jam1").await.unwrap();
        assert!(workflow.create_team("tok-a", "jam1", "Alpha").await.is_ok());

        events.exit("tok-a", "jam1").await.unwrap();
        assert_matches!(
            workflow.create_team("tok-a", "jam1", "Beta").await,
            Err(AppError::Forbidden(_))
        );
    }

    #[tokio::test]
    async fn unknown_events_are_not_found() {
        let events = EventRegistration::new(seeded().await);

        assert_matches!(
            events.join("tok-a", "nope").await,
            Err(AppError::NotFound(_))
        );
        assert_matches!(
            events.exit("tok-a", "nope").await,
            Err(AppError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn organizers_cannot_register() {
        let events = EventRegistration::new(seeded().await);

        assert_matches!(
            events.join("tok-org", "jam1").await,
            Err(AppError::Forbidden(_))
        );
    }
}
