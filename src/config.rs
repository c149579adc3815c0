use std::env;
use std::str::FromStr;

use tracing::Level;

use crate::error::Error;

pub const DEFAULT_DATABASE_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "yelp-camp";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_uri: String,
    pub database_name: String,
    pub bind_address: String,
    /// drop the database and fill it with sample campgrounds on startup
    pub seed: bool,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            database_uri: DEFAULT_DATABASE_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            seed: false,
            log_level: Level::DEBUG,
        }
    }
}

impl Config {
    /// Defaults, overridden by any `YELPCAMP_*` variables that are set.
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
        let mut config = Config::default();

        if let Some(uri) = lookup("YELPCAMP_DATABASE_URI") {
            config.database_uri = uri;
        }
        if let Some(name) = lookup("YELPCAMP_DATABASE_NAME") {
            config.database_name = name;
        }
        if let Some(address) = lookup("YELPCAMP_BIND_ADDRESS") {
            config.bind_address = address;
        }
        if let Some(seed) = lookup("YELPCAMP_SEED") {
            config.seed = parse_flag(&seed).ok_or(Error::InvalidConfiguration {
                name: "YELPCAMP_SEED",
                value: seed,
            })?;
        }
        if let Some(level) = lookup("YELPCAMP_LOG_LEVEL") {
            config.log_level = Level::from_str(&level).map_err(|_| Error::InvalidConfiguration {
                name: "YELPCAMP_LOG_LEVEL",
                value: level.clone(),
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
