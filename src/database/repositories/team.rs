use sqlx::PgConnection;

use crate::database::{
    models::{Membership, NewMembership, NewTeam, Team, TeamUpdate},
    utils::sql,
};

// Team management methods
pub async fn create_team(conn: &mut PgConnection, input: NewTeam) -> Result<Team, sqlx::Error> {
    let team = sqlx::query_as::<_, Team>(&sql(r#"
            INSERT INTO
                teams (
                    event_urid,
                    name,
                    teamleader_email
                )
            VALUES
                (?, ?, ?)
            RETURNING
                id,
                event_urid,
                name,
                teamleader_email,
                created_at
        "#))
    .bind(input.event_urid)
    .bind(input.name)
    .bind(input.teamleader_email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(team)
}

pub async fn get_team_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Team>, sqlx::Error> {
    let team = sqlx::query_as::<_, Team>(&sql(r#"
            SELECT
                id,
                event_urid,
                name,
                teamleader_email,
                created_at
            FROM
                teams
            WHERE
                id = ?
        "#))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(team)
}

pub async fn update_team_field(
    conn: &mut PgConnection,
    id: i64,
    update: TeamUpdate,
) -> Result<Option<Team>, sqlx::Error> {
    // The column comes from a closed enum, never from request input.
    let query = format!(
        r#"
            UPDATE
                teams
            SET
                {} = ?
            WHERE
                id = ?
            RETURNING
                id,
                event_urid,
                name,
                teamleader_email,
                created_at
        "#,
        update.column()
    );

    let team = sqlx::query_as::<_, Team>(&sql(&query))
        .bind(update.into_value())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(team)
}

// Team member management
pub async fn insert_membership(
    conn: &mut PgConnection,
    input: NewMembership,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            INSERT INTO
                team_members (
                    team_id,
                    member_email,
                    role,
                    pending
                )
            VALUES
                (?, ?, ?, ?)
            ON CONFLICT (team_id, member_email) DO NOTHING
        "#))
    .bind(input.team_id)
    .bind(input.member_email)
    .bind(input.role)
    .bind(input.pending)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_membership(
    conn: &mut PgConnection,
    team_id: i64,
    member_email: &str,
) -> Result<Option<Membership>, sqlx::Error> {
    let membership = sqlx::query_as::<_, Membership>(&sql(r#"
            SELECT
                team_id,
                member_email,
                role,
                pending,
                joined_at
            FROM
                team_members
            WHERE
                team_id = ?
                AND member_email = ?
        "#))
    .bind(team_id)
    .bind(member_email)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(membership)
}

pub async fn confirm_membership(
    conn: &mut PgConnection,
    team_id: i64,
    member_email: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            UPDATE
                team_members
            SET
                pending = FALSE
            WHERE
                team_id = ?
                AND member_email = ?
                AND pending = TRUE
        "#))
    .bind(team_id)
    .bind(member_email)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_membership_role(
    conn: &mut PgConnection,
    team_id: i64,
    member_email: &str,
    role: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            UPDATE
                team_members
            SET
                role = ?
            WHERE
                team_id = ?
                AND member_email = ?
        "#))
    .bind(role)
    .bind(team_id)
    .bind(member_email)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_membership(
    conn: &mut PgConnection,
    team_id: i64,
    member_email: &str,
    pending: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            DELETE FROM team_members
            WHERE
                team_id = ?
                AND member_email = ?
                AND pending = ?
        "#))
    .bind(team_id)
    .bind(member_email)
    .bind(pending)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_members_by_team(
    conn: &mut PgConnection,
    team_id: i64,
) -> Result<Vec<Membership>, sqlx::Error> {
    let members = sqlx::query_as::<_, Membership>(&sql(r#"
            SELECT
                team_id,
                member_email,
                role,
                pending,
                joined_at
            FROM
                team_members
            WHERE
                team_id = ?
            ORDER BY
                joined_at,
                member_email
        "#))
    .bind(team_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(members)
}
