use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CAPACITY;

/// Resolver behavior knobs.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// When set, decompiled output and plain Java sources are run through
    /// the translator and returned as Kotlin. Source archives are exempt.
    pub translate_to_kotlin: bool,
    pub cache_capacity: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            translate_to_kotlin: false,
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

pub fn resolve_cfr_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = override_path {
        return Ok(p.to_path_buf());
    }

    if let Ok(p) = env::var("CFR_JAR") {
        return Ok(PathBuf::from(p));
    }

    let default_path = class_content_home()?.join("tools").join("cfr.jar");
    if default_path.exists() {
        return Ok(default_path);
    }

    install_cfr_if_missing(&default_path)?;
    Ok(default_path)
}

fn class_content_home() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::cache_dir)
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Failed to resolve data directory"))?;
    Ok(base.join("class-content"))
}

fn install_cfr_if_missing(target_path: &Path) -> Result<()> {
    if target_path.exists() {
        return Ok(());
    }

    let url = "https://github.com/leibnitz27/cfr/releases/download/0.152/cfr-0.152.jar";
    if let Some(parent) = target_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    eprintln!(
        "[class-content] CFR not found, downloading to {}",
        target_path.display()
    );
    let status = std::process::Command::new("curl")
        .args([
            "-L",
            "--fail",
            "--silent",
            "--show-error",
            "-o",
            target_path
                .to_str()
                .context("cfr.jar target path is not valid UTF-8")?,
            url,
        ])
        .status()
        .context(
            "Failed to execute curl (ensure curl is installed, or use --cfr to specify cfr.jar)",
        )?;

    if !status.success() {
        if cfg!(windows) {
            let ps_status = std::process::Command::new("powershell")
                .args([
                    "-NoProfile",
                    "-ExecutionPolicy",
                    "Bypass",
                    "-Command",
                    &format!(
                        "Invoke-WebRequest -Uri '{url}' -OutFile '{}'",
                        target_path.display()
                    ),
                ])
                .status();

            if let Ok(s) = ps_status
                && s.success()
            {
                return Ok(());
            }
        }

        anyhow::bail!("Failed to download CFR. You can use --cfr to specify local cfr.jar");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_path_wins_over_everything() {
        let resolved = resolve_cfr_path(Some(Path::new("/tmp/my-cfr.jar"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/my-cfr.jar"));
    }

    #[test]
    fn default_config_keeps_translation_off() {
        let config = ContentConfig::default();
        assert!(!config.translate_to_kotlin);
        assert_eq!(config.cache_capacity, DEFAULT_CAPACITY);
    }
}
