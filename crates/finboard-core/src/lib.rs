//! # finboard-core
//!
//! Core crate for the Finboard dashboard client. Contains configuration
//! schemas and the unified error system.
//!
//! This crate has **no** internal dependencies on other Finboard crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
