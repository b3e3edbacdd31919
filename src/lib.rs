pub mod config;
pub mod drive;
pub mod export;
pub mod fetch;
pub mod process;
pub mod schema;
