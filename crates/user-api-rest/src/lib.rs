//! # User API REST
//!
//! HTTP surface for the User API: user lookup and management endpoints,
//! health probes and the OpenAPI document.

pub mod controllers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
