use crate::database::{
    models::UserShortInfo,
    store::{IdentityLookup, ProfileLookup, Store},
    transaction::finish,
};
use crate::error::AppError;

/// Public profile cards, looked up by username.
#[derive(Clone)]
pub struct ProfileDirectory<S: Store> {
    store: S,
}

impl<S: Store> ProfileDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn by_username(&self, username: &str) -> Result<UserShortInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            let identity = tx
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("user {} not found", username)))?;

            tx.short_info(&identity.email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("user {} not found", username)))
        }
        .await;
        finish(tx, outcome).await
    }
}
