use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::ui::settings::UiSettings;

pub const BACKEND_URL_ENV: &str = "TTA_COACH_BACKEND_URL";

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tta_coach");
    path.push("ui_settings.json");
    path
}

/// Settings from the user's config dir; a missing or unreadable file gives
/// the defaults. The backend URL can be overridden from the environment.
pub fn load_settings() -> UiSettings {
    let path = settings_path();
    let mut settings = match load_settings_from(&path) {
        Ok(Some(settings)) => settings,
        Ok(None) => UiSettings::default(),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "using default settings");
            UiSettings::default()
        }
    };

    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        if !url.trim().is_empty() {
            info!(%url, env = BACKEND_URL_ENV, "backend URL overridden from environment");
            settings.backend_url = url;
        }
    }

    settings
}

pub fn save_settings(settings: &UiSettings) {
    if let Err(e) = save_settings_to(&settings_path(), settings) {
        warn!(error = %format!("{e:#}"), "settings not saved");
    }
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Option<UiSettings>> {
    if !path.exists() {
        return Ok(None);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let settings = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;

    Ok(Some(settings))
}

pub fn save_settings_to(path: &Path, settings: &UiSettings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_settings_from(&dir.path().join("ui_settings.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ui_settings.json");

        let settings = UiSettings {
            backend_url: "http://192.168.1.20:8000".into(),
            request_timeout_secs: 30,
            ..UiSettings::default()
        };
        save_settings_to(&path, &settings).unwrap();

        assert_eq!(load_settings_from(&path).unwrap(), Some(settings));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_settings_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
