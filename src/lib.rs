//! ClearAid donation platform backend
//! Bearer-token authentication, role-based access control and the
//! fundraising feed, mock payments and receipts built on top of it.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod receipt;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
