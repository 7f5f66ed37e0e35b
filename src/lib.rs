pub mod config;
pub mod database;
pub mod error;
pub mod health;
pub mod routes;
pub mod server;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use server::Server;
