use actix_web::{HttpResponse, Responder, web};

use crate::database::store::Store;
use crate::handlers::shared::json_config;

pub mod events;
pub mod notifications;
pub mod profiles;
pub mod teams;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api")
                .configure(teams::configure::<S>)
                .configure(notifications::configure::<S>)
                .configure(events::configure::<S>)
                .configure(profiles::configure::<S>),
        );
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}
