//! HTTP handlers

pub mod access;
pub mod auth;
pub mod health;
pub mod payment;
pub mod post;
