use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod assets;
mod renditions;
mod payload_errors;

pub fn configure_routes(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.service(home);

    cfg.configure(admin::config_routes);

    cfg.service(
        web::scope("/api/v1")
            .configure(assets::config_routes)
            .configure(renditions::config_routes)
    );

    payload_errors::config_routes(cfg, max_upload_bytes);
}
