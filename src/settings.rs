use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_PATH: &str = "data/reviews.sqlite";
/// Browser-like agent; some review sites reject the default reqwest agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then an optional `reviews.toml`, then `REVIEWS_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .add_source(File::with_name("reviews").required(false))
            .add_source(Environment::with_prefix("REVIEWS"))
            .build()?
            .try_deserialize()
    }
}
