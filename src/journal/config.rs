use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Endpoint of the analysis backend; receives `POST {"journals": ...}`.
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/analyze".to_string(),
            request_timeout_secs: 45,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JournalConfig {
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialJournalConfig {
    analysis: Option<AnalysisConfig>,
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn validate(cfg: &JournalConfig) -> Result<()> {
    if cfg.analysis.endpoint.trim().is_empty() {
        return Err(anyhow!("invalid analysis endpoint: cannot be empty"));
    }
    if cfg.analysis.request_timeout_secs == 0 {
        return Err(anyhow!(
            "invalid analysis request timeout: must be >= 1 second"
        ));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("DAYBOOK_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".daybook").join("daybook.toml"))
}

fn apply_file_config(base: &mut JournalConfig, raw: &str, origin: &str) -> Result<()> {
    let parsed: PartialJournalConfig = toml::from_str(raw)
        .map_err(|err| anyhow!("failed to parse journal config {origin}: {err}"))?;
    if let Some(analysis) = parsed.analysis {
        base.analysis = analysis;
    }
    Ok(())
}

fn merge_file_config(base: &mut JournalConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    apply_file_config(base, &raw, &path.display().to_string())
}

/// Defaults, then the optional TOML file, then env overrides, then
/// validation. A `.env` file is honored before any env lookup.
pub fn load_config() -> Result<JournalConfig> {
    crate::env_loader::load_dotenv();

    let mut cfg = JournalConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.analysis.endpoint = env_or_string("DAYBOOK_ANALYSIS_ENDPOINT", &cfg.analysis.endpoint);
    cfg.analysis.request_timeout_secs = env_or_u64(
        "DAYBOOK_ANALYSIS_TIMEOUT_SECS",
        cfg.analysis.request_timeout_secs,
    );

    validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::{JournalConfig, apply_file_config, validate};

    #[test]
    fn partial_file_overrides_only_named_sections() {
        let mut cfg = JournalConfig::default();
        let raw = "[analysis]\nendpoint = \"http://10.0.0.2:9000/analyze\"\nrequest_timeout_secs = 10\n";

        apply_file_config(&mut cfg, raw, "test").expect("apply");

        assert_eq!(cfg.analysis.endpoint, "http://10.0.0.2:9000/analyze");
        assert_eq!(cfg.analysis.request_timeout_secs, 10);
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let mut cfg = JournalConfig::default();
        apply_file_config(&mut cfg, "", "test").expect("apply");
        assert_eq!(cfg.analysis.endpoint, "http://localhost:3000/analyze");
        assert_eq!(cfg.analysis.request_timeout_secs, 45);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = JournalConfig::default();
        cfg.analysis.endpoint = "  ".to_string();
        assert!(validate(&cfg).is_err());

        let mut cfg = JournalConfig::default();
        cfg.analysis.request_timeout_secs = 0;
        assert!(validate(&cfg).is_err());
    }
}
