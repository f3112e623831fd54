//! Repository layer implementations.
//!
//! Trait definitions live in `traits.rs`; this module holds the structs
//! that implement them.

pub mod user_repository_impl;

pub use user_repository_impl::UserRepositoryImpl;
