use crate::core::reconcile::MatchPolicy;
use crate::core::services::BudgetSettings;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Realtime document store held in process memory.
    Memory,
    /// One JSON blob per collection under `data_dir`.
    Local,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "local" | "file" => Ok(StorageBackend::Local),
            other => Err(format!("unknown storage backend `{}`", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub total_budget: Decimal,
    pub storage_backend: StorageBackend,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub export_prefix: String,
    pub match_policy: MatchPolicy,
    pub seed_on_first_run: bool,
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str, default: &str| -> String { lookup(key).unwrap_or_else(|| default.to_string()) };

        Self {
            port: parse_or(&lookup, "PORT", 3000),
            log_level: parsed("LOG_LEVEL", "info"),
            total_budget: parse_or(&lookup, "TOTAL_BUDGET", Decimal::from(230_000)),
            storage_backend: parse_or(&lookup, "STORAGE_BACKEND", StorageBackend::Memory),
            data_dir: PathBuf::from(parsed("DATA_DIR", "./data")),
            export_dir: PathBuf::from(parsed("EXPORT_DIR", "./exports")),
            export_prefix: parsed("EXPORT_PREFIX", "rozpocet-bytu"),
            match_policy: parse_or(&lookup, "MATCH_POLICY", MatchPolicy::Exact),
            seed_on_first_run: parse_or(&lookup, "SEED_ON_FIRST_RUN", true),
        }
    }

    pub fn budget_settings(&self) -> BudgetSettings {
        BudgetSettings {
            total_budget: self.total_budget,
            match_policy: self.match_policy,
            export_dir: self.export_dir.clone(),
            export_prefix: self.export_prefix.clone(),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Ignoring invalid {}={:?}: {}", key, raw, e);
            default
        }),
        None => default,
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
