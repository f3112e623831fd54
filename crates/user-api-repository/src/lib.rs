//! # User API Repository
//!
//! Layered data access:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>  (domain interface)
//! UserRepositoryImpl            (coordinates DAOs)
//!   ↓  Arc<dyn UserDao>         (DAO interface)
//! MySqlUserDao                  (MySQL / SQLx)
//!   ↓
//! MySQL
//! ```
//!
//! [`DatabasePool`] owns the connection pool and applies the schema
//! migrations found in the workspace `migrations/` directory.

pub mod dao;
pub mod r#impl;
pub mod pool;
pub mod traits;

pub use dao::{MySqlUserDao, UserDao};
pub use pool::*;
pub use r#impl::UserRepositoryImpl;
pub use traits::*;
