pub mod auth;
pub mod bootstrap_admin;
pub mod chat;
pub mod email;
pub mod habit;
pub mod reminder;
pub mod stats;
pub mod tracking;
