pub mod csv_store;
pub mod http_client;
pub mod rate_limiter;
pub mod website_analyzer;
