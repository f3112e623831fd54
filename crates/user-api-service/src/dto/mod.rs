//! Data transfer objects for the service layer.

pub mod user_dto;

pub use user_dto::*;
