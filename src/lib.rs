/*
 * Responsibility
 * - module tree of the service (the binary in main.rs only calls app::run())
 * - exposed as a library so tests/ can assemble the router in-process
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
