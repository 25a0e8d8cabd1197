use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::database::{
    models::{
        Identity, Membership, NewMembership, NewNotification, NewTeam, Notification,
        NotificationKind, Team, TeamUpdate, UserShortInfo,
    },
    repositories::{
        event as event_repo, notification as notification_repo, team as team_repo,
        user as user_repo,
    },
    store::{
        EventRoster, IdentityLookup, NotificationSink, ProfileLookup, Store, TeamStore,
        UnitOfWork,
    },
};
use crate::error::AppError;

/// Postgres-backed store. Each unit of work is one database transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnitOfWork { tx })
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityLookup for PgUnitOfWork {
    async fn find_by_token(&mut self, token: &str) -> Result<Option<Identity>, AppError> {
        Ok(user_repo::find_by_token(&mut self.tx, token).await?)
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<Identity>, AppError> {
        Ok(user_repo::find_by_email(&mut self.tx, email).await?)
    }

    async fn find_by_username(&mut self, username: &str) -> Result<Option<Identity>, AppError> {
        Ok(user_repo::find_by_username(&mut self.tx, username).await?)
    }
}

#[async_trait]
impl EventRoster for PgUnitOfWork {
    async fn event_exists(&mut self, urid: &str) -> Result<bool, AppError> {
        Ok(event_repo::event_exists(&mut self.tx, urid).await?)
    }

    async fn is_event_member(&mut self, urid: &str, email: &str) -> Result<bool, AppError> {
        Ok(event_repo::is_event_member(&mut self.tx, urid, email).await?)
    }

    async fn join_event(&mut self, urid: &str, email: &str) -> Result<bool, AppError> {
        Ok(event_repo::add_event_member(&mut self.tx, urid, email).await?)
    }

    async fn leave_event(&mut self, urid: &str, email: &str) -> Result<bool, AppError> {
        Ok(event_repo::remove_event_member(&mut self.tx, urid, email).await?)
    }
}

#[async_trait]
impl ProfileLookup for PgUnitOfWork {
    async fn short_info(&mut self, email: &str) -> Result<Option<UserShortInfo>, AppError> {
        Ok(user_repo::get_short_info(&mut self.tx, email).await?)
    }
}

#[async_trait]
impl TeamStore for PgUnitOfWork {
    async fn create_team(&mut self, team: NewTeam) -> Result<Team, AppError> {
        Ok(team_repo::create_team(&mut self.tx, team).await?)
    }

    async fn get_team_by_id(&mut self, team_id: i64) -> Result<Option<Team>, AppError> {
        Ok(team_repo::get_team_by_id(&mut self.tx, team_id).await?)
    }

    async fn update_team_field(
        &mut self,
        team_id: i64,
        update: TeamUpdate,
    ) -> Result<Option<Team>, AppError> {
        Ok(team_repo::update_team_field(&mut self.tx, team_id, update).await?)
    }

    async fn insert_membership(&mut self, membership: NewMembership) -> Result<bool, AppError> {
        Ok(team_repo::insert_membership(&mut self.tx, membership).await?)
    }

    async fn get_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
    ) -> Result<Option<Membership>, AppError> {
        Ok(team_repo::get_membership(&mut self.tx, team_id, member_email).await?)
    }

    async fn confirm_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
    ) -> Result<bool, AppError> {
        Ok(team_repo::confirm_membership(&mut self.tx, team_id, member_email).await?)
    }

    async fn update_membership_role(
        &mut self,
        team_id: i64,
        member_email: &str,
        role: &str,
    ) -> Result<bool, AppError> {
        Ok(team_repo::update_membership_role(&mut self.tx, team_id, member_email, role).await?)
    }

    async fn delete_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
        pending: bool,
    ) -> Result<bool, AppError> {
        Ok(team_repo::delete_membership(&mut self.tx, team_id, member_email, pending).await?)
    }

    async fn list_members_by_team(&mut self, team_id: i64) -> Result<Vec<Membership>, AppError> {
        Ok(team_repo::list_members_by_team(&mut self.tx, team_id).await?)
    }
}

#[async_trait]
impl NotificationSink for PgUnitOfWork {
    async fn emit(&mut self, notification: NewNotification) -> Result<Notification, AppError> {
        Ok(notification_repo::insert_notification(&mut self.tx, notification).await?)
    }

    async fn delete_matching(
        &mut self,
        recipient_email: &str,
        team_id: i64,
        kind: NotificationKind,
    ) -> Result<Vec<Notification>, AppError> {
        Ok(notification_repo::delete_matching(&mut self.tx, recipient_email, team_id, kind).await?)
    }

    async fn list_by_recipient(
        &mut self,
        recipient_email: &str,
    ) -> Result<Vec<Notification>, AppError> {
        Ok(notification_repo::list_by_recipient(&mut self.tx, recipient_email).await?)
    }

    async fn delete_all_except_pending_invites(
        &mut self,
        recipient_email: &str,
    ) -> Result<u64, AppError> {
        Ok(notification_repo::delete_all_except_invites(&mut self.tx, recipient_email).await?)
    }
}
