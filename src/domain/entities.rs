pub mod asset;
pub mod listing;
pub mod rendition;
pub mod upload;
