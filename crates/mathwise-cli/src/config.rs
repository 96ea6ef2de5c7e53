//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$MATHWISE_CONFIG` environment variable
//! 2. `~/.config/mathwise/config.toml`
//! 3. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mathwise_solver::remote::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use mathwise_solver::SolverMode;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub remote: RemoteConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub mode: SolverMode,
    /// Show steps when the input asks for them ("step by step", "show work").
    pub steps_by_keyword: bool,
}

/// Remote simplification service, used in hybrid mode only.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output of `solve` and `analyze`.
    pub pretty: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(p) if p.exists() => load_config_from(&p),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("MATHWISE_CONFIG") {
        return Some(PathBuf::from(p));
    }

    dirs_home().map(|home| home.join(".config").join("mathwise").join("config.toml"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Show the active config path (for `mathwise config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.solver.mode, SolverMode::Local);
        assert!(!config.solver.steps_by_keyword);
        assert_eq!(config.remote.timeout_secs, 10);
        assert_eq!(config.remote.base_url, "https://newton.now.sh/api/v2");
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[solver]
mode = "hybrid"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.solver.mode, SolverMode::Hybrid);
        // Other fields should be defaults
        assert_eq!(config.remote.timeout_secs, 10);
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[solver]
mode = "local"
steps_by_keyword = true

[remote]
base_url = "http://localhost:3000/api/v2"
timeout_secs = 3

[output]
pretty = true
"#
        )
        .unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert!(config.solver.steps_by_keyword);
        assert_eq!(config.remote.base_url, "http://localhost:3000/api/v2");
        assert_eq!(config.remote.timeout_secs, 3);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_bad_mode_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[solver]\nmode = \"remote\"\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(&dir.path().join("absent.toml")).is_err());
    }
}
