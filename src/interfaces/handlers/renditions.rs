use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::rendition::{RenditionRequest, RenditionResponse, ResolveRequest, SourceMedia},
    errors::AppError,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_renditions(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.resolver.catalog().specs())
}

/// Resolves a rendition straight from a source reference, without a registry read.
#[instrument(skip(state, data))]
pub async fn resolve_rendition(
    state: web::Data<AppState>,
    data: web::Json<ResolveRequest>,
) -> Result<impl Responder, AppError> {
    let request = data.into_inner();

    let source = SourceMedia {
        source_reference: request.source_reference,
        media_kind: request.media_kind,
        duration_seconds: request.duration_seconds,
    };
    let url = state.resolver
        .resolve_request(&source, &RenditionRequest::parse(&request.rendition))?;

    Ok(HttpResponse::Ok().json(RenditionResponse {
        rendition: request.rendition,
        url,
    }))
}
