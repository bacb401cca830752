//! cuadro-server library
//!
//! Exposes the router, configuration, and shared state so integration
//! tests can drive the service in-process. The server binary is in
//! main.rs.

pub mod config;
pub mod routes;
pub mod state;
