use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// 70 MiB, the largest upload the web form accepts.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 70 * 1024 * 1024;

pub const MAX_TITLE_LENGTH: u64 = 200;
pub const MAX_DESCRIPTION_LENGTH: u64 = 2000;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
