pub mod types;
pub mod user;
