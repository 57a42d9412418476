use std::env;
use std::path::PathBuf;

pub const DB_FILE: &str = "etymon_database.json";
pub const PENDING_FILE: &str = "pending_data.json";
pub const FEEDBACK_FILE: &str = "feedback.csv";

pub const DB_ENV: &str = "ETYMON_DB";
pub const PENDING_ENV: &str = "ETYMON_PENDING";
pub const FEEDBACK_ENV: &str = "ETYMON_FEEDBACK";

/// File locations used by the command line tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
    pub pending: PathBuf,
    pub feedback: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from(DB_FILE),
            pending: PathBuf::from(PENDING_FILE),
            feedback: PathBuf::from(FEEDBACK_FILE),
        }
    }
}

impl Config {
    /// Defaults, overridden by `ETYMON_DB`, `ETYMON_PENDING` and
    /// `ETYMON_FEEDBACK` when set and non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let pick = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        if let Some(p) = pick(DB_ENV) {
            config.database = p;
        }
        if let Some(p) = pick(PENDING_ENV) {
            config.pending = p;
        }
        if let Some(p) = pick(FEEDBACK_ENV) {
            config.feedback = p;
        }
        config
    }

    /// Applies explicit overrides (command line flags) on top.
    pub fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        pending: Option<PathBuf>,
        feedback: Option<PathBuf>,
    ) -> Self {
        if let Some(p) = database {
            self.database = p;
        }
        if let Some(p) = pending {
            self.pending = p;
        }
        if let Some(p) = feedback {
            self.feedback = p;
        }
        self
    }
}
