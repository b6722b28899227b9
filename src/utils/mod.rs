pub mod jwt;
pub mod password;
pub mod time;

pub use jwt::encode_session_token;
pub use password::{hash_password, verify_password};
