pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod forecast;
pub mod host;
pub mod memory;
pub mod model;
pub mod replay_engine;

#[cfg(test)]
mod sim_test;
