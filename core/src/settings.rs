//! On-disk service configuration, stored with confy under the
//! `custom-enchants` application name.

use std::path::PathBuf;

use enchants_types::EnchantsConfig;

pub const APP_NAME: &str = "custom-enchants";
const CONFIG_NAME: &str = "config";

/// Load the persisted config, falling back to defaults when it is missing
/// or unreadable.
pub fn load_config() -> EnchantsConfig {
    match confy::load::<EnchantsConfig>(APP_NAME, CONFIG_NAME) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            EnchantsConfig::default()
        }
    }
}

pub fn save_config(config: &EnchantsConfig) -> Result<(), confy::ConfyError> {
    confy::store(APP_NAME, CONFIG_NAME, config)
}

/// Where [`load_config`] reads from
pub fn config_path() -> Option<PathBuf> {
    confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).ok()
}
