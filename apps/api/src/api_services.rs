mod database;
mod state_builder;

pub use database::{DatabasePools, connect_and_migrate};
pub use state_builder::{StatePorts, assemble_app_state, build_app_state};
