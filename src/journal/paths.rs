use anyhow::Result;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JournalPaths {
    pub journal_home: PathBuf,
    pub data_file: PathBuf,
    pub lock_file: PathBuf,
    pub logs_dir: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<JournalPaths> {
    let home = required_home_dir()?;
    let journal_home = env_or_default_path("DAYBOOK_HOME", home.join(".daybook"));

    let data_file = env_or_default_path("DAYBOOK_DATA_FILE", journal_home.join("entries.json"));
    let lock_file = data_file.with_extension("lock");
    let logs_dir = env_or_default_path("DAYBOOK_LOGS_DIR", journal_home.join("logs"));

    Ok(JournalPaths {
        journal_home,
        data_file,
        lock_file,
        logs_dir,
    })
}

impl JournalPaths {
    /// Fixed layout under an explicit home directory, bypassing the
    /// environment. Tests and embedders with their own path policy use this.
    pub fn rooted(journal_home: &Path) -> Self {
        let data_file = journal_home.join("entries.json");
        let lock_file = data_file.with_extension("lock");
        Self {
            journal_home: journal_home.to_path_buf(),
            data_file,
            lock_file,
            logs_dir: journal_home.join("logs"),
        }
    }
}
