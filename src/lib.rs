pub mod collectors;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;

// Application ports and their infrastructure adapters
pub mod app;
pub mod infra;
