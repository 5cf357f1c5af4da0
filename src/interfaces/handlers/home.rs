use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Clipforge media asset API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "assets": "/api/v1/assets",
            "renditions": "/api/v1/renditions",
            "health": "/admin/health"
        }
    }))
}
