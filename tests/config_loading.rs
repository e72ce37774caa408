// tests/config_loading.rs
//! Layered configuration feeding a running pipeline

use rppg_core::config::{ConfigLoader, PulseConfig};
use rppg_core::error::PulseError;
use rppg_core::worker::PulseOrchestrator;
use std::collections::HashMap;
use std::io::Write;

fn write_toml(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create");
    file.write_all(content.as_bytes()).expect("write");
    path
}

#[test]
fn test_loaded_config_drives_orchestrator() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_toml(
        &dir,
        "rppg.toml",
        "[signal]\nsample_rate_hz = 20.0\nbuffer_seconds = 10.0\n\n[smoothing]\nwindow = 3\n",
    );

    let config = ConfigLoader::empty()
        .with_file(&path)
        .with_env_overrides(HashMap::new())
        .load()
        .expect("valid config");
    let orchestrator = PulseOrchestrator::new(config).expect("valid config");

    assert_eq!(orchestrator.sample_rate(), 20.0);
    assert_eq!(orchestrator.buffer_capacity(), 200);
    assert_eq!(orchestrator.config().smoothing.window, 3);
}

#[test]
fn test_later_files_win() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = write_toml(&dir, "base.toml", "[gate]\nmin_bpm = 40.0\nmax_bpm = 170.0\n");
    let site = write_toml(&dir, "site.toml", "[gate]\nmin_bpm = 50.0\n");

    let config = ConfigLoader::empty()
        .with_file(&base)
        .with_file(&site)
        .with_env_overrides(HashMap::new())
        .load()
        .expect("valid config");

    assert_eq!(config.gate.min_bpm, 50.0);
    assert_eq!(config.gate.max_bpm, 170.0);
}

#[test]
fn test_environment_reaches_nested_sections() {
    let mut vars = HashMap::new();
    vars.insert("RPPG_WORKER__PROCESS_INTERVAL_MS".to_string(), "250".to_string());
    vars.insert("RPPG_BAND__MAX_HZ".to_string(), "3.5".to_string());

    let config = ConfigLoader::empty()
        .with_env_overrides(vars)
        .load()
        .expect("valid config");

    assert_eq!(config.worker.process_interval_ms, 250);
    assert_eq!(config.band.max_hz, 3.5);
    assert_eq!(config.band.min_hz, PulseConfig::default().band.min_hz);
}

#[test]
fn test_band_above_nyquist_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_toml(&dir, "slow.toml", "[signal]\nsample_rate_hz = 6.0\n");

    let result = ConfigLoader::empty()
        .with_file(&path)
        .with_env_overrides(HashMap::new())
        .load();

    assert!(matches!(result, Err(PulseError::Configuration { .. })));
}

#[test]
fn test_template_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("template.toml");
    ConfigLoader::export(&PulseConfig::default(), &path).expect("export");

    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.contains("[signal]"));
    assert!(text.contains("process_interval_ms = 500"));

    let loaded = ConfigLoader::empty()
        .with_file(&path)
        .with_env_overrides(HashMap::new())
        .load()
        .expect("valid config");
    assert_eq!(loaded, PulseConfig::default());
}
