pub mod catalog;
pub mod ingestion;
pub mod lister;
pub mod resolver;
