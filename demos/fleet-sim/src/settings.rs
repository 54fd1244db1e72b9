//! Layered settings: optional JSON file, overridden by flags or `FLEET_*`
//! variables.
//!
//! ```json
//! { "interval_secs": 5, "max_parallel": 100, "agent_count": 10,
//!   "city": "jodhpur", "endpoint": "http://10.0.0.2/api/location" }
//! ```
//!
//! Every key is also a flag (`--interval-secs 2`) and an environment
//! variable (`FLEET_INTERVAL_SECS=2`).  Precedence is flag, then
//! environment, then file, then default.  Values stay raw strings until
//! [`SimConfig::resolve`] sees them, so a bad value falls back to its
//! default with a warning instead of aborting start-up.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::Value;

use fleet_core::config::{
    KEY_AGENT_COUNT, KEY_CITY, KEY_ENDPOINT, KEY_INTERVAL_SECS, KEY_MAX_PARALLEL,
    KEY_MAX_RADIUS_KM, KEY_REQUEST_TIMEOUT_SECS, KEY_SEED, KEY_SUMMARY_EVERY_TICKS,
};
use fleet_core::{ConfigError, SimConfig};

const DEFAULT_DRIVERS: &str = "random_users.json";
const DEFAULT_MAP:     &str = "map_data.json";

// ── Command line ──────────────────────────────────────────────────────────────

/// Replay synthetic drivers over a map against a location-ingestion endpoint.
#[derive(Parser, Debug, Default)]
#[command(name = "fleet-simulator", version, about)]
pub struct Args {
    /// JSON settings file
    #[arg(env = "FLEET_CONFIG")]
    pub settings: Option<PathBuf>,

    /// Registered-user JSON (default random_users.json)
    #[arg(long, env = "FLEET_DRIVERS")]
    pub drivers: Option<String>,

    /// Overpass node JSON (default map_data.json)
    #[arg(long, env = "FLEET_MAP")]
    pub map: Option<String>,

    /// Seconds per tick
    #[arg(long, env = "FLEET_INTERVAL_SECS")]
    pub interval_secs: Option<String>,

    /// Agents per tick and worker count
    #[arg(long, env = "FLEET_MAX_PARALLEL")]
    pub max_parallel: Option<String>,

    /// Drivers to simulate
    #[arg(long, env = "FLEET_AGENT_COUNT")]
    pub agent_count: Option<String>,

    /// First-pass hop search radius, km
    #[arg(long, env = "FLEET_MAX_RADIUS_KM")]
    pub max_radius_km: Option<String>,

    /// Per-request timeout, seconds
    #[arg(long, env = "FLEET_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<String>,

    /// Log a summary every N ticks
    #[arg(long, env = "FLEET_SUMMARY_EVERY_TICKS")]
    pub summary_every_ticks: Option<String>,

    /// Master RNG seed
    #[arg(long, env = "FLEET_SEED")]
    pub seed: Option<String>,

    /// City label on every report
    #[arg(long, env = "FLEET_CITY")]
    pub city: Option<String>,

    /// Location ingestion URL
    #[arg(long, env = "FLEET_ENDPOINT")]
    pub endpoint: Option<String>,
}

impl Args {
    /// Raw value given on the command line or in the environment.
    fn value(&self, key: &str) -> Option<&str> {
        let v = match key {
            KEY_INTERVAL_SECS        => &self.interval_secs,
            KEY_MAX_PARALLEL         => &self.max_parallel,
            KEY_AGENT_COUNT          => &self.agent_count,
            KEY_MAX_RADIUS_KM        => &self.max_radius_km,
            KEY_REQUEST_TIMEOUT_SECS => &self.request_timeout_secs,
            KEY_SUMMARY_EVERY_TICKS  => &self.summary_every_ticks,
            KEY_SEED                 => &self.seed,
            KEY_CITY                 => &self.city,
            KEY_ENDPOINT             => &self.endpoint,
            "drivers"                => &self.drivers,
            "map"                    => &self.map,
            _ => return None,
        };
        v.as_deref().filter(|s| !s.trim().is_empty())
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Everything `main` needs before the scheduler is built.
pub struct Settings {
    pub config:       SimConfig,
    /// Rejected values; each one fell back to its default.
    pub warnings:     Vec<ConfigError>,
    /// Set when the settings file could not be used.
    pub file_problem: Option<String>,
    pub drivers_path: PathBuf,
    pub map_path:     PathBuf,
}

impl Settings {
    /// Resolve `args`, reading the settings file it names (if any).
    pub fn load(args: &Args) -> Settings {
        let (file_values, file_problem) = match args.settings.as_deref() {
            Some(path) => match read_file(path) {
                Ok(values) => (values, None),
                Err(problem) => (HashMap::new(), Some(problem)),
            },
            None => (HashMap::new(), None),
        };

        let mut settings = Settings::layer(args, &file_values);
        settings.file_problem = file_problem;
        settings
    }

    /// Merge `args` over already-read file values.
    fn layer(args: &Args, file_values: &HashMap<String, String>) -> Settings {
        let lookup = |key: &str| {
            args.value(key)
                .map(str::to_owned)
                .or_else(|| file_values.get(key).cloned())
        };
        let (config, warnings) = SimConfig::resolve(&lookup);

        let path = |key: &str, default: &str| -> PathBuf {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
                .into()
        };

        Settings {
            config,
            warnings,
            file_problem: None,
            drivers_path: path("drivers", DEFAULT_DRIVERS),
            map_path:     path("map", DEFAULT_MAP),
        }
    }
}

fn read_file(path: &Path) -> Result<HashMap<String, String>, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    parse_file(&text).map_err(|e| format!("cannot parse {}: {e}", path.display()))
}

/// A JSON object of scalars as raw strings.  Nested values are ignored.
fn parse_file(text: &str) -> serde_json::Result<HashMap<String, String>> {
    let map: HashMap<String, Value> = serde_json::from_str(text)?;
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            Value::Number(n) => Some((k, n.to_string())),
            Value::Bool(b)   => Some((k, b.to_string())),
            _ => None,
        })
        .collect())
}
