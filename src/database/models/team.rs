use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserShortInfo;

pub const TEAM_LEADER_ROLE: &str = "Team Leader";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub event_urid: String,
    pub name: String,
    pub teamleader_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub event_urid: String,
    pub name: String,
    pub teamleader_email: String,
}

/// Mutable team columns. Each variant maps to exactly one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamUpdate {
    Name(String),
}

impl TeamUpdate {
    pub fn column(&self) -> &'static str {
        match self {
            TeamUpdate::Name(_) => "name",
        }
    }

    pub fn into_value(self) -> String {
        match self {
            TeamUpdate::Name(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub team_id: i64,
    pub member_email: String,
    pub role: String,
    pub pending: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMembership {
    pub team_id: i64,
    pub member_email: String,
    pub role: String,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub role: String,
    pub pending: bool,
    pub user: UserShortInfo,
}

/// Team fields plus the resolved member list; returned by every team operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: i64,
    pub name: String,
    pub urid: String,
    pub teamleader: String,
    pub members: Vec<MemberInfo>,
}

impl TeamInfo {
    pub fn member(&self, email: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.user.email == email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamInput {
    pub access_token: String,
    pub urid: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteUserInput {
    pub access_token: String,
    pub email: String,
    pub role: String,
}

/// Body of both `/invite/accept` and `/invite/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteResponseInput {
    pub access_token: String,
    pub team_id: i64,
    pub inviter_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickUserInput {
    pub access_token: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeTeamNameInput {
    pub access_token: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeMemberRoleInput {
    pub access_token: String,
    pub email: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_update_names_its_column() {
        let update = TeamUpdate::Name("Alpha".to_string());
        assert_eq!(update.column(), "name");
        assert_eq!(update.into_value(), "Alpha");
    }

    #[test]
    fn team_info_serializes_with_wire_names() {
        let info = TeamInfo {
            id: 7,
            name: "Alpha".to_string(),
            urid: "jam1".to_string(),
            teamleader: "a@example.com".to_string(),
            members: vec![],
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["urid"], "jam1");
        assert_eq!(json["teamleader"], "a@example.com");
        assert!(json["members"].as_array().unwrap().is_empty());
    }
}
