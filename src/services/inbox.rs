use crate::database::{
    models::{Notification, NotificationView, NotificationsOutput, UserShortInfo},
    store::{IdentityLookup, NotificationSink, Store, UnitOfWork},
    transaction::finish,
};
use crate::error::AppError;

/// Read side of the notification log, scoped to the caller.
#[derive(Clone)]
pub struct NotificationInbox<S: Store> {
    store: S,
}

impl<S: Store> NotificationInbox<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Newest first, each entry carrying the sender's short profile.
    pub async fn list(&self, access_token: &str) -> Result<NotificationsOutput, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            let actor = tx
                .find_by_token(access_token)
                .await?
                .ok_or(AppError::Unauthenticated)?;
            let notifications = tx.list_by_recipient(&actor.email).await?;
            render(&mut tx, notifications).await
        }
        .await;
        finish(tx, outcome).await
    }

    /// Drops everything except pending invites and returns what is left.
    pub async fn clear(&self, access_token: &str) -> Result<NotificationsOutput, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            let actor = tx
                .find_by_token(access_token)
                .await?
                .ok_or(AppError::Unauthenticated)?;

            let removed = tx.delete_all_except_pending_invites(&actor.email).await?;
            log::info!("Cleared {} notifications for {}", removed, actor.email);

            let remaining = tx.list_by_recipient(&actor.email).await?;
            render(&mut tx, remaining).await
        }
        .await;
        finish(tx, outcome).await
    }
}

async fn render<Tx: UnitOfWork>(
    tx: &mut Tx,
    notifications: Vec<Notification>,
) -> Result<NotificationsOutput, AppError> {
    let mut views = Vec::with_capacity(notifications.len());
    for notification in notifications {
        // Senders whose account has since disappeared still show their email.
        let from = tx
            .short_info(&notification.from_email)
            .await?
            .unwrap_or_else(|| UserShortInfo {
                email: notification.from_email.clone(),
                username: String::new(),
                first_name: None,
                last_name: None,
                avatar: None,
                skills: Vec::new(),
            });

        views.push(NotificationView {
            notify_type: notification.kind,
            from,
            team_id: notification.team_id,
            event_urid: notification.event_urid,
            created_at: notification.created_at,
        });
    }

    Ok(NotificationsOutput {
        notifications: views,
    })
}
