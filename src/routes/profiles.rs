use actix_web::web;

use crate::database::store::Store;
use crate::handlers::profiles;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user").route("/{username}", web::get().to(profiles::get_profile::<S>)),
    );
}
