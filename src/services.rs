mod password;
mod user;

pub use password::{PasswordHasher, HASH_LEN, MEMORY_COST_KIB, PARALLELISM, ITERATIONS};
pub use user::{LoginResult, UserService};
