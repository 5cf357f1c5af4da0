use std::collections::HashMap;

use actix_multipart::form::{text::Text, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    constants::DEFAULT_PAGE_SIZE,
    entities::{
        rendition::{RenditionRequest, RenditionResponse},
        upload::{AssetUploadForm, UploadRequest},
    },
    errors::AppError,
    AppState,
};

#[instrument(skip(state, form))]
pub async fn upload_asset(
    state: web::Data<AppState>,
    form: MultipartForm<AssetUploadForm>,
) -> Result<impl Responder, AppError> {
    let request = read_upload_form(form.into_inner()).await?;

    let asset = state.ingestion.ingest(request).await?;

    Ok(HttpResponse::Created().json(asset))
}

/// Loads the spooled temp file into memory for the provider call.
async fn read_upload_form(form: AssetUploadForm) -> Result<UploadRequest, AppError> {
    let bytes = tokio::fs::read(form.file.file.path()).await?;

    Ok(UploadRequest {
        title: form.title.into_inner(),
        description: form.description.map(Text::into_inner),
        file_name: form.file.file_name,
        content_type: form.file.content_type.map(|mime| mime.to_string()),
        original_size: form.original_size.map(Text::into_inner),
        bytes,
    })
}

#[instrument(skip(state, query))]
pub async fn list_assets(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let page = page_param(&query, "page")?;
    let per_page = page_param(&query, "per_page")?;

    let listing = match (page, per_page) {
        (None, None) => state.lister.list().await?,
        (page, per_page) => {
            state.lister
                .list_page(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PAGE_SIZE))
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(listing))
}

/// Absent paging parameters are `None`; present ones must parse.
fn page_param(query: &HashMap<String, String>, key: &str) -> Result<Option<u32>, AppError> {
    query
        .get(key)
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::invalid(key, format!("{} must be a positive integer", key)))
        })
        .transpose()
}

#[instrument(skip(state))]
pub async fn get_asset(
    asset_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let asset = state.lister.get(&asset_id).await?;
    Ok(HttpResponse::Ok().json(asset))
}

#[instrument(skip(state))]
pub async fn get_asset_rendition(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (asset_id, rendition) = path.into_inner();

    let asset = state.lister.get(&asset_id).await?;
    let url = state.resolver
        .resolve_request(&asset.source(), &RenditionRequest::parse(&rendition))?;

    Ok(HttpResponse::Ok().json(RenditionResponse { rendition, url }))
}
