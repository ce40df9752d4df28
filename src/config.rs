use std::env;
use std::path::PathBuf;

use crate::dataset::DEFAULT_MIN_MINUTES;

const DEFAULT_DATA_PATH: &str = "data/players_data_light-2024_2025.csv";
const DEFAULT_TOP_N: usize = 5;
const MAX_TOP_N: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    pub data_path: PathBuf,
    pub min_minutes: u32,
    pub top_n: usize,
    pub export_dir: PathBuf,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            min_minutes: DEFAULT_MIN_MINUTES,
            top_n: DEFAULT_TOP_N,
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl ScoutConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_path = non_empty("SCOUT_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let min_minutes = non_empty("SCOUT_MIN_MINUTES")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(defaults.min_minutes);
        let top_n = non_empty("SCOUT_TOP_N")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.top_n)
            .clamp(1, MAX_TOP_N);
        let export_dir = non_empty("SCOUT_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Self {
            data_path,
            min_minutes,
            top_n,
            export_dir,
        }
    }
}

/// `env_logger` setup shared by the binaries: `SCOUT_LOG` wins over `RUST_LOG`.
pub fn init_logging(default_level: &str) {
    let level = env::var("SCOUT_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default_level.to_string());
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ScoutConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ScoutConfig::default());
        assert_eq!(cfg.min_minutes, 450);
    }

    #[test]
    fn reads_and_clamps_values() {
        let cfg = ScoutConfig::from_lookup(lookup(&[
            ("SCOUT_DATA_PATH", "/tmp/players.csv"),
            ("SCOUT_MIN_MINUTES", "900"),
            ("SCOUT_TOP_N", "500"),
        ]));
        assert_eq!(cfg.data_path, PathBuf::from("/tmp/players.csv"));
        assert_eq!(cfg.min_minutes, 900);
        assert_eq!(cfg.top_n, 50);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let cfg = ScoutConfig::from_lookup(lookup(&[
            ("SCOUT_MIN_MINUTES", "lots"),
            ("SCOUT_TOP_N", "0"),
            ("SCOUT_DATA_PATH", "  "),
        ]));
        assert_eq!(cfg.min_minutes, 450);
        assert_eq!(cfg.top_n, 1);
        assert_eq!(cfg.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }
}
