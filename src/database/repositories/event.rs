use sqlx::PgConnection;

use crate::database::utils::sql;

pub async fn event_exists(conn: &mut PgConnection, urid: &str) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(&sql(
        "SELECT EXISTS (SELECT 1 FROM events WHERE urid = ?)",
    ))
    .bind(urid)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

pub async fn is_event_member(
    conn: &mut PgConnection,
    urid: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(&sql(r#"
            SELECT EXISTS (
                SELECT
                    1
                FROM
                    event_members
                WHERE
                    event_urid = ?
                    AND member_email = ?
            )
        "#))
    .bind(urid)
    .bind(email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

pub async fn add_event_member(
    conn: &mut PgConnection,
    urid: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            INSERT INTO
                event_members (event_urid, member_email)
            VALUES
                (?, ?)
            ON CONFLICT (event_urid, member_email) DO NOTHING
        "#))
    .bind(urid)
    .bind(email)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove_event_member(
    conn: &mut PgConnection,
    urid: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            DELETE FROM event_members
            WHERE
                event_urid = ?
                AND member_email = ?
        "#))
    .bind(urid)
    .bind(email)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
