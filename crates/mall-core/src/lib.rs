//! # Mall Core
//!
//! Core types, domain entities, and error definitions for the Mall catalog.
//! This crate provides the foundational abstractions shared by the
//! repository and service layers.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, HasComponent, Interface};
