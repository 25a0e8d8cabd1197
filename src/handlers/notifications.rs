use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::auth::BearerToken;
use crate::database::{models::AccessTokenInput, store::Store};
use crate::handlers::shared::ApiResponse;

pub async fn get_notifications<S: Store>(
    state: web::Data<AppState<S>>,
    header: Option<BearerToken>,
    body: Option<web::Json<AccessTokenInput>>,
) -> Result<HttpResponse> {
    let token = BearerToken::or_body(header, body.map(web::Json::into_inner))?;
    let notifications = state.inbox.list(token.as_str()).await?;

    Ok(ApiResponse::success(notifications))
}

pub async fn clear_notifications<S: Store>(
    state: web::Data<AppState<S>>,
    header: Option<BearerToken>,
    body: Option<web::Json<AccessTokenInput>>,
) -> Result<HttpResponse> {
    let token = BearerToken::or_body(header, body.map(web::Json::into_inner))?;
    let remaining = state.inbox.clear(token.as_str()).await?;

    Ok(ApiResponse::success_with_message(
        remaining,
        "Notifications cleared",
    ))
}
