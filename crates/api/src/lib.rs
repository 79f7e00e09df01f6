//! HTTP API: server, routing, and request/response mapping.

pub mod app;
pub mod config;
pub mod context;
pub mod jwt;
pub mod middleware;
pub mod route;
pub mod search;
