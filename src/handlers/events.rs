use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::database::{models::AccessTokenInput, store::Store};
use crate::handlers::shared::ApiResponse;
use crate::middleware::CorrelationId;

pub async fn join_event<S: Store>(
    state: web::Data<AppState<S>>,
    correlation_id: CorrelationId,
    path: web::Path<String>,
    input: web::Json<AccessTokenInput>,
) -> Result<HttpResponse> {
    let urid = path.into_inner();
    log::debug!("[{}] join event {}", correlation_id, urid);

    state.events.join(&input.access_token, &urid).await?;

    Ok(ApiResponse::ok_with_message("Joined event"))
}

pub async fn exit_event<S: Store>(
    state: web::Data<AppState<S>>,
    correlation_id: CorrelationId,
    path: web::Path<String>,
    input: web::Json<AccessTokenInput>,
) -> Result<HttpResponse> {
    let urid = path.into_inner();
    log::debug!("[{}] exit event {}", correlation_id, urid);

    state.events.exit(&input.access_token, &urid).await?;

    Ok(ApiResponse::ok_with_message("Left event"))
}
