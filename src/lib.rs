pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod query;
pub mod storage;
pub mod types;

// Layered boundaries: ports the adapters depend on, and their live implementations
pub mod app;
pub mod infra;
