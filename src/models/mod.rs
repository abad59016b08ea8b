//! Data models

pub mod auth;
pub mod payment;
pub mod post;
pub mod user;
