pub mod config;
pub mod error;
pub mod import;
pub mod scoring;
pub mod service;
pub mod telemetry;
