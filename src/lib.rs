pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

// Convenient re-exports (so call sites can do `sqli_dao::User`, etc.)
pub use db::Db;
pub use models::user::{NewUser, User};
pub use models::types::UserId;
