use crate::database::store::UnitOfWork;
use crate::error::AppError;

/// Commit `tx` if `outcome` succeeded, otherwise roll it back and return the
/// original error.
pub async fn finish<T, Tx>(tx: Tx, outcome: Result<T, AppError>) -> Result<T, AppError>
where
    Tx: UnitOfWork,
{
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            // The error itself is logged once, when it becomes a response.
            log::debug!("Rolling back unit of work");
            if let Err(rollback_err) = tx.rollback().await {
                log::error!("Rollback failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{
        InMemoryStore,
        models::NewMembership,
        store::{Store, TeamStore},
    };
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn failed_outcome_rolls_back_and_keeps_the_error() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_membership(NewMembership {
            team_id: 1,
            member_email: "b@example.com".to_string(),
            role: "Developer".to_string(),
            pending: true,
        })
        .await
        .unwrap();

        let outcome: Result<(), AppError> = Err(AppError::conflict("already invited"));
        assert_matches!(
            finish(tx, outcome).await,
            Err(AppError::Conflict(message)) if message == "already invited"
        );
        assert!(store.memberships(1).await.is_empty());
    }

    #[tokio::test]
    async fn successful_outcome_commits() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();

        assert_eq!(finish(tx, Ok(7)).await.unwrap(), 7);
    }
}
