//! # User API Service
//!
//! Business logic for the User API: the cached entry lookup and the user
//! write operations that keep that cache coherent.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::{UserServiceComponent, UserServiceComponentParameters};
pub use user_service::*;
