use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use evlog::meta;

use crate::runtime::get_logger;

pub const DATABASE_URL: &str = "EASYSURVEY_DATABASE_URL";
pub const DB_MAX_CONNECTIONS: &str = "EASYSURVEY_DB_MAX_CONNECTIONS";
pub const EXPORT_DIR: &str = "EASYSURVEY_EXPORT_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub export_dir: PathBuf,
}

impl Config {
    /// Reads the environment, after merging in a `.env` file when one exists.
    pub fn load() -> anyhow::Result<Self> {
        if dotenv::dotenv().is_err() {
            get_logger().debug("No .env file loaded.", meta! {
                "Dir" => env::current_dir().map(|d| d.display().to_string()).unwrap_or_default(),
            });
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            database_url: try_load(&lookup, DATABASE_URL, "sqlite://easysurvey.db?mode=rwc")?,
            db_max_connections: try_load(&lookup, DB_MAX_CONNECTIONS, "5")?,
            export_dir: try_load(&lookup, EXPORT_DIR, ".")?,
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = match lookup(key) {
        Some(v) => v,
        None => {
            get_logger().info("Configuration value not set; using default.", meta! {
                "Key" => key,
                "Default" => default,
            });
            default.to_owned()
        }
    };

    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("invalid value for {}: '{}'", key, raw))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.database_url, "sqlite://easysurvey.db?mode=rwc");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = Config::from_lookup(lookup(&[
            (DATABASE_URL, "sqlite::memory:"),
            (DB_MAX_CONNECTIONS, "2"),
            (EXPORT_DIR, "/tmp/exports"),
        ])).unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.db_max_connections, 2);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn unparsable_values_are_errors() {
        let err = Config::from_lookup(lookup(&[(DB_MAX_CONNECTIONS, "many")])).unwrap_err();
        assert!(err.to_string().contains(DB_MAX_CONNECTIONS));
    }
}
