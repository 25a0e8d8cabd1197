//! Team formation workflow.
//!
//! Membership rows move through `absent -> pending -> member`; cancel returns a
//! pending row to absent and kick returns a member to absent. Each transition
//! and the notification it emits are written in one unit of work, so either
//! both land or neither does.

use crate::database::{
    models::{
        Identity, MemberInfo, NewMembership, NewNotification, NewTeam, NotificationKind,
        TEAM_LEADER_ROLE, Team, TeamInfo, TeamUpdate,
    },
    store::{Store, TeamStore, UnitOfWork},
    transaction::finish,
};
use crate::error::AppError;

#[derive(Clone)]
pub struct TeamWorkflow<S: Store> {
    store: S,
}

impl<S: Store> TeamWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_team(
        &self,
        access_token: &str,
        event_urid: &str,
        name: &str,
    ) -> Result<TeamInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = create_team_in(&mut tx, access_token, event_urid, name).await;
        finish(tx, outcome).await
    }

    pub async fn team_info(&self, team_id: i64) -> Result<TeamInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            let team = tx
                .get_team_by_id(team_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("team {} not found", team_id)))?;
            load_team_info(&mut tx, team).await
        }
        .await;
        finish(tx, outcome).await
    }

    pub async fn invite_user(
        &self,
        access_token: &str,
        team_id: i64,
        invitee_email: &str,
        role: &str,
    ) -> Result<TeamInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = invite_user_in(&mut tx, access_token, team_id, invitee_email, role).await;
        finish(tx, outcome).await
    }

    pub async fn accept_invite(
        &self,
        access_token: &str,
        team_id: i64,
        inviter_email: &str,
    ) -> Result<TeamInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = accept_invite_in(&mut tx, access_token, team_id, inviter_email).await;
        finish(tx, outcome).await
    }

    pub async fn cancel_invite(
        &self,
        access_token: &str,
        team_id: i64,
        inviter_email: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = cancel_invite_in(&mut tx, access_token, team_id, inviter_email).await;
        finish(tx, outcome).await
    }

    pub async fn kick_user(
        &self,
        access_token: &str,
        team_id: i64,
        target_email: &str,
    ) -> Result<TeamInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = kick_user_in(&mut tx, access_token, team_id, target_email).await;
        finish(tx, outcome).await
    }

    pub async fn change_team_name(
        &self,
        access_token: &str,
        team_id: i64,
        new_name: &str,
    ) -> Result<TeamInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            let actor = authenticate(&mut tx, access_token).await?;
            led_team(&mut tx, team_id, &actor).await?;
            let name = validate_team_name(new_name)?;

            let team = tx
                .update_team_field(team_id, TeamUpdate::Name(name))
                .await?
                .ok_or_else(|| AppError::forbidden("team not found"))?;

            log::info!("Team {} renamed to '{}'", team.id, team.name);
            load_team_info(&mut tx, team).await
        }
        .await;
        finish(tx, outcome).await
    }

    pub async fn change_member_role(
        &self,
        access_token: &str,
        team_id: i64,
        member_email: &str,
        new_role: &str,
    ) -> Result<TeamInfo, AppError> {
        let mut tx = self.store.begin().await?;
        let outcome = async {
            let actor = authenticate(&mut tx, access_token).await?;
            let team = led_team(&mut tx, team_id, &actor).await?;

            if !tx
                .update_membership_role(team_id, member_email, new_role)
                .await?
            {
                return Err(AppError::not_found(format!(
                    "{} is not a member of this team",
                    member_email
                )));
            }

            log::info!(
                "Role of {} in team {} changed to '{}'",
                member_email,
                team_id,
                new_role
            );
            load_team_info(&mut tx, team).await
        }
        .await;
        finish(tx, outcome).await
    }
}

async fn create_team_in<Tx: UnitOfWork>(
    tx: &mut Tx,
    access_token: &str,
    event_urid: &str,
    name: &str,
) -> Result<TeamInfo, AppError> {
    let actor = authenticate(tx, access_token).await?;
    if !actor.is_participant() {
        return Err(AppError::forbidden(
            "only ordinary participants can create teams",
        ));
    }
    let name = validate_team_name(name)?;

    if !tx.is_event_member(event_urid, &actor.email).await? {
        return Err(AppError::forbidden("not registered for this event"));
    }

    let team = tx
        .create_team(NewTeam {
            event_urid: event_urid.to_string(),
            name,
            teamleader_email: actor.email.clone(),
        })
        .await?;

    let inserted = tx
        .insert_membership(NewMembership {
            team_id: team.id,
            member_email: actor.email.clone(),
            role: TEAM_LEADER_ROLE.to_string(),
            pending: false,
        })
        .await?;
    if !inserted {
        return Err(AppError::conflict("team leader membership already exists"));
    }

    log::info!(
        "Team {} '{}' created for event {} by {}",
        team.id,
        team.name,
        team.event_urid,
        actor.email
    );
    load_team_info(tx, team).await
}

async fn invite_user_in<Tx: UnitOfWork>(
    tx: &mut Tx,
    access_token: &str,
    team_id: i64,
    invitee_email: &str,
    role: &str,
) -> Result<TeamInfo, AppError> {
    let actor = authenticate(tx, access_token).await?;
    let team = led_team(tx, team_id, &actor).await?;

    let invitee = tx
        .find_by_email(invitee_email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("user {} not found", invitee_email)))?;
    if !invitee.is_participant() {
        return Err(AppError::forbidden(
            "only ordinary participants can join teams",
        ));
    }

    let inserted = tx
        .insert_membership(NewMembership {
            team_id,
            member_email: invitee.email.clone(),
            role: role.to_string(),
            pending: true,
        })
        .await?;
    if !inserted {
        return Err(AppError::conflict(format!(
            "{} is already invited to or a member of this team",
            invitee.email
        )));
    }

    tx.emit(NewNotification {
        recipient_email: invitee.email.clone(),
        team_id,
        kind: NotificationKind::Invite,
        from_email: actor.email.clone(),
        event_urid: team.event_urid.clone(),
    })
    .await?;

    log::info!(
        "{} invited {} to team {} as '{}'",
        actor.email,
        invitee.email,
        team_id,
        role
    );
    load_team_info(tx, team).await
}

async fn accept_invite_in<Tx: UnitOfWork>(
    tx: &mut Tx,
    access_token: &str,
    team_id: i64,
    inviter_email: &str,
) -> Result<TeamInfo, AppError> {
    let actor = authenticate(tx, access_token).await?;
    let team = invited_team(tx, team_id, &actor).await?;

    consume_invite(tx, team_id, &actor, inviter_email).await?;
    if !tx.confirm_membership(team_id, &actor.email).await? {
        return Err(AppError::not_found("no pending invite for this team"));
    }

    tx.emit(NewNotification {
        recipient_email: inviter_email.to_string(),
        team_id,
        kind: NotificationKind::Accept,
        from_email: actor.email.clone(),
        event_urid: team.event_urid.clone(),
    })
    .await?;

    log::info!("{} joined team {}", actor.email, team_id);
    load_team_info(tx, team).await
}

async fn cancel_invite_in<Tx: UnitOfWork>(
    tx: &mut Tx,
    access_token: &str,
    team_id: i64,
    inviter_email: &str,
) -> Result<(), AppError> {
    let actor = authenticate(tx, access_token).await?;
    let team = invited_team(tx, team_id, &actor).await?;

    consume_invite(tx, team_id, &actor, inviter_email).await?;
    if !tx.delete_membership(team_id, &actor.email, true).await? {
        return Err(AppError::not_found("no pending invite for this team"));
    }

    tx.emit(NewNotification {
        recipient_email: inviter_email.to_string(),
        team_id,
        kind: NotificationKind::Reject,
        from_email: actor.email.clone(),
        event_urid: team.event_urid,
    })
    .await?;

    log::info!("{} declined the invite to team {}", actor.email, team_id);
    Ok(())
}

async fn kick_user_in<Tx: UnitOfWork>(
    tx: &mut Tx,
    access_token: &str,
    team_id: i64,
    target_email: &str,
) -> Result<TeamInfo, AppError> {
    let actor = authenticate(tx, access_token).await?;
    let team = led_team(tx, team_id, &actor).await?;

    if target_email == team.teamleader_email {
        return Err(AppError::forbidden("the team leader cannot be kicked"));
    }
    if !tx.delete_membership(team_id, target_email, false).await? {
        return Err(AppError::not_found(format!(
            "{} is not a member of this team",
            target_email
        )));
    }

    tx.emit(NewNotification {
        recipient_email: target_email.to_string(),
        team_id,
        kind: NotificationKind::Kick,
        from_email: actor.email.clone(),
        event_urid: team.event_urid.clone(),
    })
    .await?;

    log::info!("{} kicked {} from team {}", actor.email, target_email, team_id);
    load_team_info(tx, team).await
}

async fn authenticate<Tx: UnitOfWork>(tx: &mut Tx, access_token: &str) -> Result<Identity, AppError> {
    tx.find_by_token(access_token)
        .await?
        .ok_or(AppError::Unauthenticated)
}

/// Loads the team and checks that `actor` leads it.
async fn led_team<Tx: UnitOfWork>(
    tx: &mut Tx,
    team_id: i64,
    actor: &Identity,
) -> Result<Team, AppError> {
    let team = tx
        .get_team_by_id(team_id)
        .await?
        .ok_or_else(|| AppError::forbidden("team not found"))?;

    if team.teamleader_email != actor.email {
        log::warn!(
            "{} attempted a leader-only action on team {}",
            actor.email,
            team_id
        );
        return Err(AppError::forbidden("not the team leader"));
    }
    Ok(team)
}

/// Loads the team and checks that `actor` holds a pending invite to it.
async fn invited_team<Tx: UnitOfWork>(
    tx: &mut Tx,
    team_id: i64,
    actor: &Identity,
) -> Result<Team, AppError> {
    let team = tx
        .get_team_by_id(team_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("team {} not found", team_id)))?;

    match tx.get_membership(team_id, &actor.email).await? {
        Some(membership) if membership.pending => Ok(team),
        _ => Err(AppError::not_found("no pending invite for this team")),
    }
}

/// Removes the actor's INVITE notification for the team. If it recorded a
/// sender, that sender must be the `inviter_email` the caller named.
async fn consume_invite<Tx: UnitOfWork>(
    tx: &mut Tx,
    team_id: i64,
    actor: &Identity,
    inviter_email: &str,
) -> Result<(), AppError> {
    let consumed = tx
        .delete_matching(&actor.email, team_id, NotificationKind::Invite)
        .await?;

    if !consumed.is_empty() && !consumed.iter().any(|n| n.from_email == inviter_email) {
        return Err(AppError::forbidden(format!(
            "the invite to team {} was not sent by {}",
            team_id, inviter_email
        )));
    }
    Ok(())
}

fn validate_team_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("team name must not be empty"));
    }
    Ok(name.to_string())
}

async fn load_team_info<Tx: UnitOfWork>(tx: &mut Tx, team: Team) -> Result<TeamInfo, AppError> {
    let memberships = tx.list_members_by_team(team.id).await?;

    let mut members = Vec::with_capacity(memberships.len());
    for membership in memberships {
        let user = tx
            .short_info(&membership.member_email)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("user {} not found", membership.member_email))
            })?;
        members.push(MemberInfo {
            role: membership.role,
            pending: membership.pending,
            user,
        });
    }

    Ok(TeamInfo {
        id: team.id,
        name: team.name,
        urid: team.event_urid,
        teamleader: team.teamleader_email,
        members,
    })
}
