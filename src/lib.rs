pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod export;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod strategies;
pub mod types;

// Ports and their adapters
pub mod app;
pub mod infra;
