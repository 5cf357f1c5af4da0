use actix_web::web;

use crate::handlers::assets;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/assets")
            .service(
                web::resource("")
                    .route(web::post().to(assets::upload_asset))
                    .route(web::get().to(assets::list_assets))
            )
            .service(
                web::resource("/{asset_id}")
                    .route(web::get().to(assets::get_asset))
            )
            .service(
                web::resource("/{asset_id}/renditions/{rendition}")
                    .route(web::get().to(assets::get_asset_rendition))
            )
    );
}
