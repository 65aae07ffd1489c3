pub mod config;
pub mod dto;
pub mod errors;
pub mod index;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod services;
pub mod state;
