pub mod db;
pub mod provider;
pub mod utils;
