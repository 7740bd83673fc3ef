//! # oq-core
//!
//! Core types, traits, and utilities for the resource query engine.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types and the `QueryResult` alias
//! - Property values (`PropValue`) extracted from records
//! - The `PropEnum` trait every resource property enumeration implements
//! - Configuration types
//! - Tracing bootstrap

pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod value;

pub use config::{ConfigError, OutputFormat, QueryConfig};
pub use error::*;
pub use traits::*;
pub use value::*;
