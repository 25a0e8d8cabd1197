use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::database::store::Store;
use crate::handlers::shared::ApiResponse;

pub async fn get_profile<S: Store>(
    state: web::Data<AppState<S>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let username = path.into_inner();
    let card = state.profiles.by_username(&username).await?;

    Ok(ApiResponse::success(card))
}
