//! Top-level simulation configuration.
//!
//! `SimConfig` is a plain value object, fully populated before the scheduler
//! starts.  Applications read raw string values from wherever they like
//! (config file, environment, flags) and hand a lookup function to
//! [`SimConfig::resolve`], which validates every key independently:
//!
//! - missing or blank value → default, silently;
//! - invalid value          → default, plus a [`ConfigError`] warning.
//!
//! Resolution never fails.

use std::str::FromStr;
use std::time::Duration;

use crate::ConfigError;

// ── Keys ──────────────────────────────────────────────────────────────────────

pub const KEY_INTERVAL_SECS:        &str = "interval_secs";
pub const KEY_MAX_PARALLEL:         &str = "max_parallel";
pub const KEY_AGENT_COUNT:          &str = "agent_count";
pub const KEY_MAX_RADIUS_KM:        &str = "max_radius_km";
pub const KEY_REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
pub const KEY_SUMMARY_EVERY_TICKS:  &str = "summary_every_ticks";
pub const KEY_SEED:                 &str = "seed";
pub const KEY_CITY:                 &str = "city";
pub const KEY_ENDPOINT:             &str = "endpoint";

// ── SimConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Target wall-clock length of one tick, in seconds.
    pub interval_secs: u64,

    /// Agents sampled per tick, and the upper bound on worker-pool size.
    pub max_parallel: usize,

    /// How many vehicle operators to draw from the identity feed.
    pub agent_count: usize,

    /// First-pass search radius of the next-hop selector, in kilometres.
    pub max_radius_km: f64,

    /// Per-request timeout for the ingestion client.
    pub request_timeout_secs: u64,

    /// Log a running summary every N ticks.
    pub summary_every_ticks: u64,

    /// Master RNG seed.  `None` draws one from entropy at build time.
    pub seed: Option<u64>,

    /// City label attached to every report.
    pub city: String,

    /// Location ingestion URL.
    pub endpoint: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            interval_secs:        5,
            max_parallel:         100,
            agent_count:          10,
            max_radius_km:        0.05,
            request_timeout_secs: 10,
            summary_every_ticks:  10,
            seed:                 None,
            city:                 "delhi".to_string(),
            endpoint:             "http://localhost:8080/api/location".to_string(),
        }
    }
}

impl SimConfig {
    /// Build a config from a key lookup, falling back to the default for any
    /// missing, blank, or invalid value.
    ///
    /// Returns the config together with one warning per rejected value.
    pub fn resolve<F>(lookup: F) -> (SimConfig, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = SimConfig::default();
        let mut warnings = Vec::new();
        let mut r = Resolver { lookup: &lookup, warnings: &mut warnings };

        let config = SimConfig {
            interval_secs:        r.positive(KEY_INTERVAL_SECS, d.interval_secs),
            max_parallel:         r.positive(KEY_MAX_PARALLEL, d.max_parallel),
            agent_count:          r.positive(KEY_AGENT_COUNT, d.agent_count),
            max_radius_km:        r.positive_f64(KEY_MAX_RADIUS_KM, d.max_radius_km),
            request_timeout_secs: r.positive(KEY_REQUEST_TIMEOUT_SECS, d.request_timeout_secs),
            summary_every_ticks:  r.positive(KEY_SUMMARY_EVERY_TICKS, d.summary_every_ticks),
            seed:                 r.optional(KEY_SEED),
            city:                 r.text(KEY_CITY, d.city),
            endpoint:             r.url(KEY_ENDPOINT, d.endpoint),
        };

        (config, warnings)
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ── Per-key validation ────────────────────────────────────────────────────────

struct Resolver<'a, F> {
    lookup:   &'a F,
    warnings: &'a mut Vec<ConfigError>,
}

impl<F: Fn(&str) -> Option<String>> Resolver<'_, F> {
    /// Trimmed, non-blank raw value.
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn reject<T: ToString>(&mut self, key: &'static str, value: String, reason: &'static str, default: &T) {
        self.warnings.push(ConfigError::InvalidConfiguration {
            key,
            value,
            reason,
            default: default.to_string(),
        });
    }

    fn positive<T>(&mut self, key: &'static str, default: T) -> T
    where
        T: FromStr + PartialOrd + Default + ToString,
    {
        let Some(raw) = self.raw(key) else { return default };
        match raw.parse::<T>() {
            Ok(v) if v > T::default() => v,
            Ok(_) => {
                self.reject(key, raw, "must be a positive integer", &default);
                default
            }
            Err(_) => {
                self.reject(key, raw, "not a number", &default);
                default
            }
        }
    }

    fn positive_f64(&mut self, key: &'static str, default: f64) -> f64 {
        let Some(raw) = self.raw(key) else { return default };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            Ok(_) => {
                self.reject(key, raw, "must be a positive number", &default);
                default
            }
            Err(_) => {
                self.reject(key, raw, "not a number", &default);
                default
            }
        }
    }

    fn optional(&mut self, key: &'static str) -> Option<u64> {
        let raw = self.raw(key)?;
        match raw.parse::<u64>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.reject(key, raw, "not an unsigned integer", &"<random>");
                None
            }
        }
    }

    fn text(&mut self, key: &'static str, default: String) -> String {
        self.raw(key).unwrap_or(default)
    }

    fn url(&mut self, key: &'static str, default: String) -> String {
        let Some(raw) = self.raw(key) else { return default };
        if raw.starts_with("http://") || raw.starts_with("https://") {
            raw
        } else {
            self.reject(key, raw, "must start with http:// or https://", &default);
            default
        }
    }
}
