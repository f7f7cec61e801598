//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): PostgreSQL connection string. Without it the
///   server keeps everything in memory.
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3333
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `IMPORT_DIR` (optional): directory CSV imports are read from, defaults to `tmp`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_import_dir")]
    pub import_dir: PathBuf,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3333
}

fn default_max_connections() -> u32 {
    5
}

fn default_import_dir() -> PathBuf {
    PathBuf::from("tmp")
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into
    /// expected types (e.g. a non-numeric `SERVER_PORT`).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build a Config from an explicit list of variables.
    ///
    /// Field names are matched case-insensitively: database_url <- DATABASE_URL
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }
}
