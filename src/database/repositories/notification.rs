use sqlx::PgConnection;

use crate::database::{
    models::{NewNotification, Notification, NotificationKind},
    utils::sql,
};

pub async fn insert_notification(
    conn: &mut PgConnection,
    input: NewNotification,
) -> Result<Notification, sqlx::Error> {
    let notification = sqlx::query_as::<_, Notification>(&sql(r#"
            INSERT INTO
                notifications (
                    recipient_email,
                    team_id,
                    kind,
                    from_email,
                    event_urid
                )
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id,
                recipient_email,
                team_id,
                kind,
                from_email,
                event_urid,
                created_at
        "#))
    .bind(input.recipient_email)
    .bind(input.team_id)
    .bind(input.kind)
    .bind(input.from_email)
    .bind(input.event_urid)
    .fetch_one(&mut *conn)
    .await?;

    Ok(notification)
}

pub async fn delete_matching(
    conn: &mut PgConnection,
    recipient_email: &str,
    team_id: i64,
    kind: NotificationKind,
) -> Result<Vec<Notification>, sqlx::Error> {
    let deleted = sqlx::query_as::<_, Notification>(&sql(r#"
            DELETE FROM notifications
            WHERE
                recipient_email = ?
                AND team_id = ?
                AND kind = ?
            RETURNING
                id,
                recipient_email,
                team_id,
                kind,
                from_email,
                event_urid,
                created_at
        "#))
    .bind(recipient_email)
    .bind(team_id)
    .bind(kind)
    .fetch_all(&mut *conn)
    .await?;

    Ok(deleted)
}

pub async fn list_by_recipient(
    conn: &mut PgConnection,
    recipient_email: &str,
) -> Result<Vec<Notification>, sqlx::Error> {
    let notifications = sqlx::query_as::<_, Notification>(&sql(r#"
            SELECT
                id,
                recipient_email,
                team_id,
                kind,
                from_email,
                event_urid,
                created_at
            FROM
                notifications
            WHERE
                recipient_email = ?
            ORDER BY
                created_at DESC,
                id DESC
        "#))
    .bind(recipient_email)
    .fetch_all(&mut *conn)
    .await?;

    Ok(notifications)
}

/// Invite notifications only exist while their invitation is pending, so
/// keeping every INVITE row keeps exactly the pending invites.
pub async fn delete_all_except_invites(
    conn: &mut PgConnection,
    recipient_email: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            DELETE FROM notifications
            WHERE
                recipient_email = ?
                AND kind <> ?
        "#))
    .bind(recipient_email)
    .bind(NotificationKind::Invite)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
