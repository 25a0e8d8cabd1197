//! Storage seams used by the services.
//!
//! Every service operation opens one [`UnitOfWork`] from a [`Store`], performs
//! all of its reads and writes through it, then commits or rolls back. The
//! Postgres backend maps a unit of work onto a single database transaction;
//! the in-memory backend onto an exclusive snapshot of its state.

use async_trait::async_trait;

use crate::database::models::{
    Identity, Membership, NewMembership, NewNotification, NewTeam, Notification, NotificationKind,
    Team, TeamUpdate, UserShortInfo,
};
use crate::error::AppError;

#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: UnitOfWork;

    async fn begin(&self) -> Result<Self::Tx, AppError>;
}

#[async_trait]
pub trait UnitOfWork:
    IdentityLookup + EventRoster + ProfileLookup + TeamStore + NotificationSink + Send + Sized
{
    async fn commit(self) -> Result<(), AppError>;

    async fn rollback(self) -> Result<(), AppError>;
}

/// Resolves access tokens and user keys to identities.
#[async_trait]
pub trait IdentityLookup {
    async fn find_by_token(&mut self, token: &str) -> Result<Option<Identity>, AppError>;

    async fn find_by_email(&mut self, email: &str) -> Result<Option<Identity>, AppError>;

    async fn find_by_username(&mut self, username: &str) -> Result<Option<Identity>, AppError>;
}

/// Event existence and registration.
#[async_trait]
pub trait EventRoster {
    async fn event_exists(&mut self, urid: &str) -> Result<bool, AppError>;

    async fn is_event_member(&mut self, urid: &str, email: &str) -> Result<bool, AppError>;

    /// Returns `false` when the user was already registered.
    async fn join_event(&mut self, urid: &str, email: &str) -> Result<bool, AppError>;

    /// Returns `false` when the user was not registered.
    async fn leave_event(&mut self, urid: &str, email: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProfileLookup {
    async fn short_info(&mut self, email: &str) -> Result<Option<UserShortInfo>, AppError>;
}

/// Team rows and their membership rows.
///
/// Single-row operations only; cross-entity rules belong to the workflow.
#[async_trait]
pub trait TeamStore {
    async fn create_team(&mut self, team: NewTeam) -> Result<Team, AppError>;

    async fn get_team_by_id(&mut self, team_id: i64) -> Result<Option<Team>, AppError>;

    async fn update_team_field(
        &mut self,
        team_id: i64,
        update: TeamUpdate,
    ) -> Result<Option<Team>, AppError>;

    /// Inserts the row unless one already exists for `(team_id, member_email)`.
    /// Returns `false` on that conflict; existing rows are never overwritten.
    async fn insert_membership(&mut self, membership: NewMembership) -> Result<bool, AppError>;

    async fn get_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
    ) -> Result<Option<Membership>, AppError>;

    /// Flips a pending row to confirmed. Returns `false` if no pending row exists.
    async fn confirm_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
    ) -> Result<bool, AppError>;

    async fn update_membership_role(
        &mut self,
        team_id: i64,
        member_email: &str,
        role: &str,
    ) -> Result<bool, AppError>;

    /// Deletes the row only if its `pending` flag equals `pending`.
    async fn delete_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
        pending: bool,
    ) -> Result<bool, AppError>;

    /// Members in join order.
    async fn list_members_by_team(&mut self, team_id: i64) -> Result<Vec<Membership>, AppError>;
}

/// Append/delete-only notification log.
#[async_trait]
pub trait NotificationSink {
    async fn emit(&mut self, notification: NewNotification) -> Result<Notification, AppError>;

    async fn delete_matching(
        &mut self,
        recipient_email: &str,
        team_id: i64,
        kind: NotificationKind,
    ) -> Result<Vec<Notification>, AppError>;

    async fn list_by_recipient(
        &mut self,
        recipient_email: &str,
    ) -> Result<Vec<Notification>, AppError>;

    async fn delete_all_except_pending_invites(
        &mut self,
        recipient_email: &str,
    ) -> Result<u64, AppError>;
}
