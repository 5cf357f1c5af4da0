use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path id, reporting a field-level validation error on failure
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::invalid("id", "Invalid UUID format"))
}
