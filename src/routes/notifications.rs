use actix_web::web;

use crate::database::store::Store;
use crate::handlers::notifications;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::get_notifications::<S>))
            .route("", web::delete().to(notifications::clear_notifications::<S>)),
    );
}
