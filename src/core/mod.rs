//! Core plumbing shared by every pydepin operation
//!
//! - **config**: pydepin.toml parsing and validation
//! - **context**: validated project root + config, built once per invocation
//! - **error**: error types with contextual help messages and exit codes

pub mod config;
pub mod context;
pub mod error;
