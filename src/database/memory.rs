//! In-memory store used by tests and local experiments.
//!
//! A unit of work holds the store's lock for its whole lifetime and mutates a
//! private copy of the state, which replaces the shared state on commit.
//! Units of work are therefore fully serialized and an uncommitted one leaves
//! no trace.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::database::{
    models::{
        Identity, Membership, NewMembership, NewNotification, NewTeam, Notification,
        NotificationKind, Team, TeamUpdate, UserShortInfo,
    },
    store::{
        EventRoster, IdentityLookup, NotificationSink, ProfileLookup, Store, TeamStore,
        UnitOfWork,
    },
};
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<String, UserShortInfo>,
    perms: HashMap<String, i32>,
    tokens: HashMap<String, String>,
    events: BTreeMap<String, BTreeSet<String>>,
    teams: BTreeMap<i64, Team>,
    last_team_id: i64,
    memberships: Vec<Membership>,
    notifications: Vec<Notification>,
    last_notification_id: i64,
}

impl MemoryState {
    fn identity(&self, email: &str) -> Option<Identity> {
        let user = self.users.get(email)?;
        Some(Identity {
            email: user.email.clone(),
            username: user.username.clone(),
            perms: self.perms.get(email).copied().unwrap_or_default(),
        })
    }

    fn membership_position(&self, team_id: i64, member_email: &str) -> Option<usize> {
        self.memberships
            .iter()
            .position(|m| m.team_id == team_id && m.member_email == member_email)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_notification_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user reachable by `token`.
    pub async fn add_user(&self, email: &str, username: &str, perms: i32, token: &str) {
        let mut state = self.state.lock().await;
        state.users.insert(
            email.to_string(),
            UserShortInfo {
                email: email.to_string(),
                username: username.to_string(),
                first_name: None,
                last_name: None,
                avatar: None,
                skills: Vec::new(),
            },
        );
        state.perms.insert(email.to_string(), perms);
        state.tokens.insert(token.to_string(), email.to_string());
    }

    pub async fn add_skill(&self, email: &str, skill: &str) {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(email) {
            user.skills.push(skill.to_string());
            user.skills.sort();
        }
    }

    pub async fn add_event(&self, urid: &str) {
        let mut state = self.state.lock().await;
        state.events.entry(urid.to_string()).or_default();
    }

    pub async fn register_for_event(&self, urid: &str, email: &str) {
        let mut state = self.state.lock().await;
        state
            .events
            .entry(urid.to_string())
            .or_default()
            .insert(email.to_string());
    }

    pub async fn memberships(&self, team_id: i64) -> Vec<Membership> {
        let state = self.state.lock().await;
        state
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect()
    }

    pub async fn notifications_for(&self, email: &str) -> Vec<Notification> {
        let state = self.state.lock().await;
        state
            .notifications
            .iter()
            .filter(|n| n.recipient_email == email)
            .cloned()
            .collect()
    }

    /// Makes every subsequent notification write fail, to exercise rollback paths.
    pub fn fail_notification_writes(&self, fail: bool) {
        self.fail_notification_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = InMemoryUnitOfWork;

    async fn begin(&self) -> Result<InMemoryUnitOfWork, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(InMemoryUnitOfWork {
            guard,
            work,
            fail_notification_writes: self.fail_notification_writes.clone(),
        })
    }
}

pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
    fail_notification_writes: Arc<AtomicBool>,
}

impl InMemoryUnitOfWork {
    fn check_notification_write(&self) -> Result<(), AppError> {
        if self.fail_notification_writes.load(Ordering::SeqCst) {
            return Err(AppError::internal_server_error_message(
                "notification store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(mut self) -> Result<(), AppError> {
        *self.guard = self.work;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityLookup for InMemoryUnitOfWork {
    async fn find_by_token(&mut self, token: &str) -> Result<Option<Identity>, AppError> {
        Ok(self
            .work
            .tokens
            .get(token)
            .and_then(|email| self.work.identity(email)))
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<Identity>, AppError> {
        Ok(self.work.identity(email))
    }

    async fn find_by_username(&mut self, username: &str) -> Result<Option<Identity>, AppError> {
        Ok(self
            .work
            .users
            .values()
            .find(|u| u.username == username)
            .and_then(|u| self.work.identity(&u.email)))
    }
}

#[async_trait]
impl EventRoster for InMemoryUnitOfWork {
    async fn event_exists(&mut self, urid: &str) -> Result<bool, AppError> {
        Ok(self.work.events.contains_key(urid))
    }

    async fn is_event_member(&mut self, urid: &str, email: &str) -> Result<bool, AppError> {
        Ok(self
            .work
            .events
            .get(urid)
            .is_some_and(|members| members.contains(email)))
    }

    async fn join_event(&mut self, urid: &str, email: &str) -> Result<bool, AppError> {
        match self.work.events.get_mut(urid) {
            Some(members) => Ok(members.insert(email.to_string())),
            None => Err(AppError::not_found(format!("event {} not found", urid))),
        }
    }

    async fn leave_event(&mut self, urid: &str, email: &str) -> Result<bool, AppError> {
        Ok(self
            .work
            .events
            .get_mut(urid)
            .is_some_and(|members| members.remove(email)))
    }
}

#[async_trait]
impl ProfileLookup for InMemoryUnitOfWork {
    async fn short_info(&mut self, email: &str) -> Result<Option<UserShortInfo>, AppError> {
        Ok(self.work.users.get(email).cloned())
    }
}

#[async_trait]
impl TeamStore for InMemoryUnitOfWork {
    async fn create_team(&mut self, team: NewTeam) -> Result<Team, AppError> {
        self.work.last_team_id += 1;
        let team = Team {
            id: self.work.last_team_id,
            event_urid: team.event_urid,
            name: team.name,
            teamleader_email: team.teamleader_email,
            created_at: Utc::now(),
        };
        self.work.teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn get_team_by_id(&mut self, team_id: i64) -> Result<Option<Team>, AppError> {
        Ok(self.work.teams.get(&team_id).cloned())
    }

    async fn update_team_field(
        &mut self,
        team_id: i64,
        update: TeamUpdate,
    ) -> Result<Option<Team>, AppError> {
        let Some(team) = self.work.teams.get_mut(&team_id) else {
            return Ok(None);
        };
        match update {
            TeamUpdate::Name(name) => team.name = name,
        }
        Ok(Some(team.clone()))
    }

    async fn insert_membership(&mut self, membership: NewMembership) -> Result<bool, AppError> {
        if self
            .work
            .membership_position(membership.team_id, &membership.member_email)
            .is_some()
        {
            return Ok(false);
        }
        self.work.memberships.push(Membership {
            team_id: membership.team_id,
            member_email: membership.member_email,
            role: membership.role,
            pending: membership.pending,
            joined_at: Utc::now(),
        });
        Ok(true)
    }

    async fn get_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
    ) -> Result<Option<Membership>, AppError> {
        Ok(self
            .work
            .membership_position(team_id, member_email)
            .map(|i| self.work.memberships[i].clone()))
    }

    async fn confirm_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
    ) -> Result<bool, AppError> {
        match self.work.membership_position(team_id, member_email) {
            Some(i) if self.work.memberships[i].pending => {
                self.work.memberships[i].pending = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_membership_role(
        &mut self,
        team_id: i64,
        member_email: &str,
        role: &str,
    ) -> Result<bool, AppError> {
        match self.work.membership_position(team_id, member_email) {
            Some(i) => {
                self.work.memberships[i].role = role.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_membership(
        &mut self,
        team_id: i64,
        member_email: &str,
        pending: bool,
    ) -> Result<bool, AppError> {
        match self.work.membership_position(team_id, member_email) {
            Some(i) if self.work.memberships[i].pending == pending => {
                self.work.memberships.remove(i);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_members_by_team(&mut self, team_id: i64) -> Result<Vec<Membership>, AppError> {
        Ok(self
            .work
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationSink for InMemoryUnitOfWork {
    async fn emit(&mut self, notification: NewNotification) -> Result<Notification, AppError> {
        self.check_notification_write()?;
        self.work.last_notification_id += 1;
        let notification = Notification {
            id: self.work.last_notification_id,
            recipient_email: notification.recipient_email,
            team_id: notification.team_id,
            kind: notification.kind,
            from_email: notification.from_email,
            event_urid: notification.event_urid,
            created_at: Utc::now(),
        };
        self.work.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn delete_matching(
        &mut self,
        recipient_email: &str,
        team_id: i64,
        kind: NotificationKind,
    ) -> Result<Vec<Notification>, AppError> {
        self.check_notification_write()?;
        let (deleted, kept): (Vec<Notification>, Vec<Notification>) =
            std::mem::take(&mut self.work.notifications)
                .into_iter()
                .partition(|n| {
                    n.recipient_email == recipient_email && n.team_id == team_id && n.kind == kind
                });
        self.work.notifications = kept;
        Ok(deleted)
    }

    async fn list_by_recipient(
        &mut self,
        recipient_email: &str,
    ) -> Result<Vec<Notification>, AppError> {
        Ok(self
            .work
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_email == recipient_email)
            .cloned()
            .collect())
    }

    async fn delete_all_except_pending_invites(
        &mut self,
        recipient_email: &str,
    ) -> Result<u64, AppError> {
        self.check_notification_write()?;
        let before = self.work.notifications.len();
        self.work.notifications.retain(|n| {
            n.recipient_email != recipient_email || n.kind == NotificationKind::Invite
        });
        Ok((before - self.work.notifications.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(team_id: i64, email: &str, pending: bool) -> NewMembership {
        NewMembership {
            team_id,
            member_email: email.to_string(),
            role: "Developer".to_string(),
            pending,
        }
    }

    #[tokio::test]
    async fn committed_work_is_visible() {
        let store = InMemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        assert!(tx.insert_membership(membership(1, "b@example.com", true)).await.unwrap());
        tx.commit().await.unwrap();

        assert_eq!(store.memberships(1).await.len(), 1);
    }

    #[tokio::test]
    async fn dropped_work_is_discarded() {
        let store = InMemoryStore::new();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_membership(membership(1, "b@example.com", true))
                .await
                .unwrap();
        }
        let mut tx = store.begin().await.unwrap();
        tx.insert_membership(membership(1, "c@example.com", true))
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        assert!(store.memberships(1).await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_memberships_are_refused() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        assert!(tx.insert_membership(membership(1, "b@example.com", true)).await.unwrap());
        assert!(!tx.insert_membership(membership(1, "b@example.com", false)).await.unwrap());

        let row = tx.get_membership(1, "b@example.com").await.unwrap().unwrap();
        assert!(row.pending);
    }

    #[tokio::test]
    async fn deletes_respect_the_pending_flag() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_membership(membership(1, "b@example.com", true))
            .await
            .unwrap();

        assert!(!tx.delete_membership(1, "b@example.com", false).await.unwrap());
        assert!(tx.confirm_membership(1, "b@example.com").await.unwrap());
        assert!(!tx.confirm_membership(1, "b@example.com").await.unwrap());
        assert!(tx.delete_membership(1, "b@example.com", false).await.unwrap());
        assert!(tx.list_members_by_team(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tokens_resolve_to_identities() {
        let store = InMemoryStore::new();
        store.add_user("a@example.com", "alice", 0, "tok-a").await;

        let mut tx = store.begin().await.unwrap();
        let identity = tx.find_by_token("tok-a").await.unwrap().unwrap();
        assert_eq!(identity.email, "a@example.com");
        assert!(tx.find_by_token("nope").await.unwrap().is_none());
        assert_eq!(
            tx.find_by_username("alice").await.unwrap().unwrap().email,
            "a@example.com"
        );
    }
}
