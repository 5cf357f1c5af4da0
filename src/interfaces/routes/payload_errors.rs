use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{
    web,
    http::StatusCode,
    ResponseError,
    HttpResponse,
    error::JsonPayloadError,
};
use serde_json::json;

/// Multipart bodies may carry a few text fields next to the file.
const FORM_FIELDS_OVERHEAD: usize = 1024 * 1024;

pub fn config_routes(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        PayloadError::from(err).into()
    }));

    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(max_upload_bytes.saturating_add(FORM_FIELDS_OVERHEAD))
            .error_handler(|err, _req| PayloadError::from(err).into()),
    );
}

#[derive(Debug)]
pub struct PayloadError {
    kind: &'static str,
    message: String,
    status: StatusCode
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({
            "error": self.kind,
            "message": self.message
        }))
    }
}

impl From<JsonPayloadError> for PayloadError {
    fn from(err: JsonPayloadError) -> Self {
        let status = match err {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => StatusCode::BAD_REQUEST,
        };
        PayloadError {
            kind: "invalid_json",
            message: format!("JSON payload error: {}", err),
            status,
        }
    }
}

impl From<MultipartError> for PayloadError {
    fn from(err: MultipartError) -> Self {
        let status = err.status_code();
        let kind = if status == StatusCode::PAYLOAD_TOO_LARGE {
            "payload_too_large"
        } else {
            "invalid_multipart"
        };
        PayloadError {
            kind,
            message: format!("Multipart payload error: {}", err),
            status,
        }
    }
}
