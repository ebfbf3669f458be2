pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod seed;
pub mod state;
pub mod types;

#[cfg(test)]
pub mod testing;
