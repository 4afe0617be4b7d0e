pub mod config;
pub mod cors;
pub mod engine;
pub mod routes;

pub use routes::{AppState, router};
