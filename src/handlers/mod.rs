pub mod auth;
pub mod chat;
pub mod contact;
pub mod habit;
pub mod tracking;
