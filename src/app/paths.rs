// SPDX-License-Identifier: MPL-2.0
//! Application directory resolution.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** - parameter to the `_with_override()` functions (tests)
//! 2. **CLI arguments** (`--data-dir`, `--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variables** (`PHOTOFRAME_DATA_DIR`, `PHOTOFRAME_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs`, with [`APP_NAME`] appended
//!
//! ```ignore
//! paths::init_cli_overrides(flags.data_dir, flags.config_dir);
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory name under the platform config/data roots.
pub const APP_NAME: &str = "GoruFrame";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "PHOTOFRAME_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "PHOTOFRAME_CONFIG_DIR";

/// Subdirectory of the data directory holding diagnostics reports.
const DIAGNOSTICS_DIR: &str = "diagnostics";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the `--data-dir` / `--config-dir` arguments.
///
/// Only the first call has an effect; returns `false` for later calls.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) -> bool {
    let data_set = CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_ok();
    let config_set = CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_ok();
    data_set && config_set
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_var: &str,
    platform_dir: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }
    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }
    platform_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Directory for application state such as diagnostics reports.
///
/// Returns `None` if the platform has no data directory.
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir)
}

/// Directory holding `settings.toml`.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_CONFIG_DIR, ENV_CONFIG_DIR, dirs::config_dir)
}

/// Default folder offered when saving a diagnostics report.
pub fn get_diagnostics_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|mut path| {
        path.push(DIAGNOSTICS_DIR);
        path
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that touch process-wide env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn platform_config_dir_ends_with_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_CONFIG_DIR);

        if let Some(path) = get_app_config_dir() {
            assert!(path.ends_with(APP_NAME));
            assert!(path.is_absolute());
        }
    }

    #[test]
    fn override_path_takes_precedence() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "/env/config");

        let override_path = PathBuf::from("/custom/config");
        let result = get_app_config_dir_with_override(Some(override_path.clone()));
        assert_eq!(result, Some(override_path));

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn env_var_overrides_platform_data_dir() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DATA_DIR, "/test/data");

        assert_eq!(get_app_data_dir(), Some(PathBuf::from("/test/data")));
        assert_eq!(
            get_diagnostics_dir(),
            Some(PathBuf::from("/test/data").join(DIAGNOSTICS_DIR))
        );

        std::env::remove_var(ENV_DATA_DIR);
    }

    #[test]
    fn empty_env_var_is_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DATA_DIR, "");

        if let Some(path) = get_app_data_dir() {
            assert!(path.ends_with(APP_NAME));
        }

        std::env::remove_var(ENV_DATA_DIR);
    }
}
