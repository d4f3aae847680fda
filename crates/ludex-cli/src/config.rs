use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Where the harvest reads its records from.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
    /// The remote IGDB API.
    Api,
    /// A local fixture file.
    Mock,
}

/// Command-line and environment configuration for the `ludex` binary.
///
/// Credentials and backend location come from the environment (or a
/// `.env` file via dotenvy); the flags select what happens to the
/// harvested dataset.
#[derive(Parser, Debug)]
#[command(name = "ludex", version, about = "Harvest the IGDB game catalog into a search index")]
pub struct Config {
    /// Use a local fixture dataset instead of the remote API.
    #[arg(long)]
    pub mock: bool,

    /// Fixture file read in mock mode.
    #[arg(long, default_value = "data.json")]
    pub mock_file: PathBuf,

    /// Load the harvested dataset into the search index.
    #[arg(long)]
    pub persist: bool,

    /// Print the harvested dataset as JSON on stdout.
    #[arg(long)]
    pub output: bool,

    /// Data source selector; `mock` behaves like --mock.
    #[arg(long, value_enum, env = "IGDB_SRC", default_value = "api", ignore_case = true)]
    pub source: DataSource,

    /// Twitch application client id.
    #[arg(long, env = "IGDB_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Twitch application client secret.
    #[arg(long, env = "IGDB_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Redis hostname, required for --persist.
    #[arg(long, env = "REDIS_HOSTNAME")]
    pub redis_hostname: Option<String>,

    /// Redis port.
    #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
    pub redis_port: u16,
}

impl Config {
    /// True when the harvest should read the fixture instead of the API.
    pub fn mock_mode(&self) -> bool {
        self.mock || self.source == DataSource::Mock
    }
}
