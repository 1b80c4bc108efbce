//! # Mall Config
//!
//! Configuration management for the Mall catalog.
//! Supports layered configuration from files and environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
