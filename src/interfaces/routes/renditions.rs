use actix_web::web;

use crate::handlers::renditions;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/renditions")
            .service(
                web::resource("")
                    .route(web::get().to(renditions::list_renditions))
            )
            .service(
                web::resource("/resolve")
                    .route(web::post().to(renditions::resolve_rendition))
            )
    );
}
