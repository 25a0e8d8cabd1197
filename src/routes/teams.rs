use actix_web::web;

use crate::database::store::Store;
use crate::handlers::teams;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/team")
            .route("/create", web::post().to(teams::create_team::<S>))
            .route("/{id}", web::get().to(teams::get_team::<S>))
            .route("/{id}/invite", web::post().to(teams::invite_user::<S>))
            .route("/{id}/kick", web::put().to(teams::kick_user::<S>))
            .route(
                "/{id}/change-name",
                web::patch().to(teams::change_team_name::<S>),
            )
            .route(
                "/{id}/member-role",
                web::patch().to(teams::change_member_role::<S>),
            ),
    )
    .service(
        web::scope("/invite")
            .route("/accept", web::put().to(teams::accept_invite::<S>))
            .route("/cancel", web::put().to(teams::cancel_invite::<S>)),
    );
}
