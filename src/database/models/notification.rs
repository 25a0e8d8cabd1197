use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserShortInfo;

/// Notification types, stored and serialized as their numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum NotificationKind {
    Invite,
    Reject,
    Accept,
    Kick,
}

impl NotificationKind {
    pub fn code(self) -> i16 {
        match self {
            NotificationKind::Invite => 0,
            NotificationKind::Reject => 1,
            NotificationKind::Accept => 2,
            NotificationKind::Kick => 3,
        }
    }
}

impl From<NotificationKind> for i16 {
    fn from(kind: NotificationKind) -> Self {
        kind.code()
    }
}

impl TryFrom<i16> for NotificationKind {
    type Error = String;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(NotificationKind::Invite),
            1 => Ok(NotificationKind::Reject),
            2 => Ok(NotificationKind::Accept),
            3 => Ok(NotificationKind::Kick),
            _ => Err(format!("Invalid NotificationKind: {}", code)),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for NotificationKind {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for NotificationKind {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i16 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.code(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for NotificationKind {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let code = <i16 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(NotificationKind::try_from(code)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub recipient_email: String,
    pub team_id: i64,
    pub kind: NotificationKind,
    pub from_email: String,
    pub event_urid: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_email: String,
    pub team_id: i64,
    pub kind: NotificationKind,
    pub from_email: String,
    pub event_urid: String,
}

/// Inbox entry as shown to the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationView {
    pub notify_type: NotificationKind,
    pub from: UserShortInfo,
    pub team_id: i64,
    pub event_urid: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsOutput {
    pub notifications: Vec<NotificationView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_use_numeric_codes_on_the_wire() {
        assert_eq!(serde_json::to_string(&NotificationKind::Invite).unwrap(), "0");
        assert_eq!(serde_json::to_string(&NotificationKind::Kick).unwrap(), "3");

        let kind: NotificationKind = serde_json::from_str("2").unwrap();
        assert_eq!(kind, NotificationKind::Accept);
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert!(NotificationKind::try_from(4).is_err());
        assert!(serde_json::from_str::<NotificationKind>("9").is_err());
    }
}
