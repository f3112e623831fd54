//! Domain entities of the User API.

pub mod user;

pub use user::*;
