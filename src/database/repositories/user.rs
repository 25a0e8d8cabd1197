use sqlx::PgConnection;

use crate::database::{
    models::{Identity, ProfileRow, UserShortInfo},
    utils::sql,
};

pub async fn find_by_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<Identity>, sqlx::Error> {
    let identity = sqlx::query_as::<_, Identity>(&sql(r#"
            SELECT
                u.email,
                u.username,
                u.perms
            FROM
                users u
                INNER JOIN tokens t ON t.user_email = u.email
            WHERE
                t.token = ?
        "#))
    .bind(token)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(identity)
}

pub async fn find_by_email(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<Identity>, sqlx::Error> {
    let identity = sqlx::query_as::<_, Identity>(&sql(r#"
            SELECT
                email,
                username,
                perms
            FROM
                users
            WHERE
                email = ?
        "#))
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(identity)
}

pub async fn find_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<Identity>, sqlx::Error> {
    let identity = sqlx::query_as::<_, Identity>(&sql(r#"
            SELECT
                email,
                username,
                perms
            FROM
                users
            WHERE
                username = ?
        "#))
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(identity)
}

pub async fn get_short_info(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<UserShortInfo>, sqlx::Error> {
    let Some(row) = sqlx::query_as::<_, ProfileRow>(&sql(r#"
            SELECT
                email,
                username,
                first_name,
                last_name,
                avatar
            FROM
                users
            WHERE
                email = ?
        "#))
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?
    else {
        return Ok(None);
    };

    let skills = sqlx::query_scalar::<_, String>(&sql(r#"
            SELECT
                skill
            FROM
                skills
            WHERE
                user_email = ?
            ORDER BY
                skill
        "#))
    .bind(email)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(UserShortInfo::from_row(row, skills)))
}
