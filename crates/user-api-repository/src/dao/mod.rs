//! DAO (Data Access Object) layer.
//!
//! Each DAO interface maps to one data source.
//!
//! ```text
//! Service → Repository (interface + impl) → DAO (interface + impl) → DB
//! ```

pub mod r#impl;
pub mod user_dao;

pub use r#impl::MySqlUserDao;
pub use user_dao::UserDao;
