use serde::{Deserialize, Serialize};

/// Permission levels as stored in `users.perms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Participant,
    Organizer,
    Administrator,
}

impl Permission {
    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            0 => Some(Permission::Participant),
            1 => Some(Permission::Organizer),
            10 => Some(Permission::Administrator),
            _ => None,
        }
    }
}

/// Request body that carries nothing but the caller's token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenInput {
    pub access_token: String,
}

/// A resolved user identity: who is calling, and with what rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Identity {
    pub email: String,
    pub username: String,
    pub perms: i32,
}

impl Identity {
    pub fn permission(&self) -> Option<Permission> {
        Permission::from_level(self.perms)
    }

    /// Only ordinary participants may register for events and form teams.
    pub fn is_participant(&self) -> bool {
        self.permission() == Some(Permission::Participant)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

/// Display-ready user card embedded in team and notification payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserShortInfo {
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub skills: Vec<String>,
}

impl UserShortInfo {
    pub fn from_row(row: ProfileRow, skills: Vec<String>) -> Self {
        Self {
            email: row.email,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            avatar: row.avatar,
            skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_levels_map_to_permissions() {
        assert_eq!(Permission::from_level(0), Some(Permission::Participant));
        assert_eq!(Permission::from_level(1), Some(Permission::Organizer));
        assert_eq!(Permission::from_level(10), Some(Permission::Administrator));
        assert_eq!(Permission::from_level(5), None);
    }

    #[test]
    fn only_level_zero_is_a_participant() {
        let mut identity = Identity {
            email: "a@example.com".to_string(),
            username: "a".to_string(),
            perms: 0,
        };
        assert!(identity.is_participant());

        identity.perms = 1;
        assert!(!identity.is_participant());

        identity.perms = 42;
        assert!(!identity.is_participant());
    }
}
