//! # finboard-entity
//!
//! Domain entity models for the Finboard dashboard client. Every struct in
//! this crate mirrors a value object delivered by the backend identity
//! endpoint. All entities derive `Debug`, `Clone`, `Serialize`, and
//! `Deserialize`.

pub mod identity;
pub mod module;
pub mod permission;
pub mod role;
pub mod session;
