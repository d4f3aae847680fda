//! Ludex CLI - argument parsing and fixture loading for the `ludex` binary.

pub mod config;
pub mod fixture;

pub use config::{Config, DataSource};
pub use fixture::load_fixture;
