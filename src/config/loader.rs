// src/config/loader.rs
//! Layered configuration loader: defaults, TOML files, environment overrides

use crate::config::PulseConfig;
use crate::error::RppgResult;
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix, e.g. `RPPG_GATE__MIN_BPM=50`
pub const ENV_PREFIX: &str = "RPPG";
const ENV_SEPARATOR: &str = "__";

/// Files probed by [`ConfigLoader::new`] when they exist
const DEFAULT_CONFIG_FILES: &[&str] = &["rppg.toml", "config/rppg.toml"];

/// Configuration loader
pub struct ConfigLoader {
    optional_paths: Vec<PathBuf>,
    required_paths: Vec<PathBuf>,
    env_overrides: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Loader probing the default file locations plus the process environment
    pub fn new() -> Self {
        Self {
            optional_paths: DEFAULT_CONFIG_FILES.iter().map(PathBuf::from).collect(),
            required_paths: Vec::new(),
            env_overrides: None,
        }
    }

    /// Loader without default file locations
    pub fn empty() -> Self {
        Self {
            optional_paths: Vec::new(),
            required_paths: Vec::new(),
            env_overrides: None,
        }
    }

    /// Add a file that must exist; later files override earlier ones
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.required_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Replace the process environment with an explicit variable map
    pub fn with_env_overrides(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    /// Load, merge and validate the configuration
    pub fn load(&self) -> RppgResult<PulseConfig> {
        let mut builder = Config::builder();

        for path in &self.optional_paths {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false));
        }
        for path in &self.required_paths {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(self.env_overrides.clone()),
        );

        let config: PulseConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Write `config` as a TOML template to `path`
    pub fn export<P: AsRef<Path>>(config: &PulseConfig, path: P) -> RppgResult<()> {
        let content = config.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = ConfigLoader::empty()
            .with_env_overrides(HashMap::new())
            .load()
            .unwrap();
        assert_eq!(config, PulseConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file("[signal]\nsample_rate_hz = 25.0\n\n[gate]\nmax_bpm = 170.0\n");
        let config = ConfigLoader::empty()
            .with_file(file.path())
            .with_env_overrides(HashMap::new())
            .load()
            .unwrap();
        assert_eq!(config.signal.sample_rate_hz, 25.0);
        assert_eq!(config.gate.max_bpm, 170.0);
        assert_eq!(config.gate.min_bpm, 45.0);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file("[gate]\nmin_bpm = 50.0\n");
        let mut vars = HashMap::new();
        vars.insert("RPPG_GATE__MIN_BPM".to_string(), "55".to_string());
        let config = ConfigLoader::empty()
            .with_file(file.path())
            .with_env_overrides(vars)
            .load()
            .unwrap();
        assert_eq!(config.gate.min_bpm, 55.0);
    }

    #[test]
    fn test_missing_required_file() {
        let result = ConfigLoader::empty()
            .with_file("/definitely/not/here/rppg.toml")
            .with_env_overrides(HashMap::new())
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = toml_file("[band]\nmin_hz = 4.0\nmax_hz = 0.7\n");
        let result = ConfigLoader::empty()
            .with_file(file.path())
            .with_env_overrides(HashMap::new())
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_export_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exported.toml");
        let mut config = PulseConfig::default();
        config.worker.process_interval_ms = 250;
        ConfigLoader::export(&config, &path).unwrap();

        let loaded = ConfigLoader::empty()
            .with_file(&path)
            .with_env_overrides(HashMap::new())
            .load()
            .unwrap();
        assert_eq!(loaded.worker.process_interval_ms, 250);
    }
}
