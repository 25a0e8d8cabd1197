use actix_web::{HttpRequest, HttpResponse, Result, web};

use crate::AppState;
use crate::database::{
    models::{
        ChangeMemberRoleInput, ChangeTeamNameInput, CreateTeamInput, InviteResponseInput,
        InviteUserInput, KickUserInput,
    },
    store::Store,
};
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;

pub async fn create_team<S: Store>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
    input: web::Json<CreateTeamInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    log::debug!(
        "[{}] create team '{}' for event {}",
        req.correlation_id(),
        input.name,
        input.urid
    );

    let team = state
        .workflow
        .create_team(&input.access_token, &input.urid, &input.name)
        .await?;

    Ok(ApiResponse::created(team, "Team created"))
}

pub async fn get_team<S: Store>(
    state: web::Data<AppState<S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let team = state.workflow.team_info(path.into_inner()).await?;

    Ok(ApiResponse::success(team))
}

pub async fn invite_user<S: Store>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
    path: web::Path<i64>,
    input: web::Json<InviteUserInput>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let input = input.into_inner();
    log::debug!(
        "[{}] invite {} to team {}",
        req.correlation_id(),
        input.email,
        team_id
    );

    let team = state
        .workflow
        .invite_user(&input.access_token, team_id, &input.email, &input.role)
        .await?;

    Ok(ApiResponse::success_with_message(team, "Invite sent"))
}

pub async fn accept_invite<S: Store>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
    input: web::Json<InviteResponseInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    log::debug!(
        "[{}] accept invite to team {}",
        req.correlation_id(),
        input.team_id
    );

    let team = state
        .workflow
        .accept_invite(&input.access_token, input.team_id, &input.inviter_email)
        .await?;

    Ok(ApiResponse::success_with_message(team, "Invite accepted"))
}

pub async fn cancel_invite<S: Store>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
    input: web::Json<InviteResponseInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    log::debug!(
        "[{}] decline invite to team {}",
        req.correlation_id(),
        input.team_id
    );

    state
        .workflow
        .cancel_invite(&input.access_token, input.team_id, &input.inviter_email)
        .await?;

    Ok(ApiResponse::ok_with_message("Invite declined"))
}

pub async fn kick_user<S: Store>(
    state: web::Data<AppState<S>>,
    req: HttpRequest,
    path: web::Path<i64>,
    input: web::Json<KickUserInput>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    let input = input.into_inner();
    log::debug!(
        "[{}] kick {} from team {}",
        req.correlation_id(),
        input.email,
        team_id
    );

    let team = state
        .workflow
        .kick_user(&input.access_token, team_id, &input.email)
        .await?;

    Ok(ApiResponse::success_with_message(team, "Member removed"))
}

pub async fn change_team_name<S: Store>(
    state: web::Data<AppState<S>>,
    path: web::Path<i64>,
    input: web::Json<ChangeTeamNameInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    let team = state
        .workflow
        .change_team_name(&input.access_token, path.into_inner(), &input.name)
        .await?;

    Ok(ApiResponse::success(team))
}

pub async fn change_member_role<S: Store>(
    state: web::Data<AppState<S>>,
    path: web::Path<i64>,
    input: web::Json<ChangeMemberRoleInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    let team = state
        .workflow
        .change_member_role(
            &input.access_token,
            path.into_inner(),
            &input.email,
            &input.role,
        )
        .await?;

    Ok(ApiResponse::success(team))
}
