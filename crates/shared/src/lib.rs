//! Shared types, errors, and configuration for Tienda.
//!
//! This crate provides common types used across all other crates:
//! - Money type with decimal precision and half-up rounding
//! - Typed IDs for type-safe entity references
//! - The canonical store clock (all financial timestamps share one zone)
//! - Application-wide error types
//! - Configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::StoreClock;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
