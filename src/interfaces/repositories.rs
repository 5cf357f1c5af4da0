pub mod asset;
pub mod media_provider;
pub mod sqlx_repo;
