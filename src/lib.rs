pub mod cli;
pub mod error;
pub mod exporter;
pub mod github;
pub mod models;
pub mod rate_limit;
pub mod source;
pub mod types;
