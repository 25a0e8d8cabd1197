use actix_web::web;

use crate::database::store::Store;
use crate::handlers::events;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/event")
            .route("/{urid}/join", web::post().to(events::join_event::<S>))
            .route("/{urid}/exit", web::post().to(events::exit_event::<S>)),
    );
}
