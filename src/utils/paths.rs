use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".subscription_core";
const HOME_ENV: &str = "SUBSCRIPTION_CORE_HOME";
const STORE_FILE: &str = "subscriptions.json";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.subscription_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the subscription store file inside `base`.
pub fn store_file_in(base: &Path) -> PathBuf {
    base.join(STORE_FILE)
}

/// Path of the configuration file inside `base`.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Companion path used for atomic writes (`subscriptions.json` -> `subscriptions.json.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.tmp"),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a sibling temp file and renames it over `path`.
pub fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
