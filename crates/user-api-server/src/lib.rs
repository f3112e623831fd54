//! # User API Server Library
//!
//! Dependency injection wiring, logging setup and startup helpers for the
//! `user-api-server` binary.

pub mod di;
pub mod logging;
pub mod startup;
