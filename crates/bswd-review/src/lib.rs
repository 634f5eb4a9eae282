pub mod config;
pub mod error;
pub mod review;
pub mod telemetry;
