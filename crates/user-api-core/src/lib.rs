//! # User API Core
//!
//! Core types, traits, and error definitions shared by every layer of the
//! User API: the unified error type, the `User` entity and its identifier,
//! and the identifier-generation seam.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
