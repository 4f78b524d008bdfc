//! Loading enchantment definitions from TOML files
//!
//! Definitions are loaded from two locations on top of the built-in set:
//! - **Configured**: the `definitions_dir` from the service config
//! - **User**: `<config dir>/custom-enchants/definitions`
//!
//! Files are read in file-name order. Duplicate ids never replace an
//! existing definition, including the built-in ones.

use std::fs;
use std::path::{Path, PathBuf};

use super::EnchantmentRegistry;
use super::definition::DefinitionConfig;

/// Errors that can occur during definition loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
    #[error("Invalid definition '{id}' in {path:?}: {reason}")]
    Invalid {
        path: PathBuf,
        id: String,
        reason: &'static str,
    },
}

/// Load all TOML files from a directory into the registry.
///
/// Files that fail to read or parse are logged and skipped so one bad file
/// does not hide the rest. Returns the number of definitions registered.
pub fn load_definitions(registry: &mut EnchantmentRegistry, dir: &Path) -> Result<usize, ConfigError> {
    let entries = fs::read_dir(dir).map_err(|e| ConfigError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut registered = 0;
    for path in paths {
        match load_file(&path) {
            Ok(config) => {
                let total = config.enchantments.len();
                let duplicates = registry.register_config(config);
                if !duplicates.is_empty() {
                    tracing::warn!(
                        file = ?path.file_name(),
                        ?duplicates,
                        "Duplicate enchantment ids skipped"
                    );
                }
                registered += total - duplicates.len();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load definition file");
            }
        }
    }

    tracing::info!(dir = %dir.display(), registered, "Loaded enchantment definitions");
    Ok(registered)
}

/// Load and validate a single TOML definition file
pub fn load_file(path: &Path) -> Result<DefinitionConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: DefinitionConfig = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate(path, &config)?;
    Ok(config)
}

/// Save a definition config to a TOML file
pub fn save_file(path: &Path, config: &DefinitionConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate(path: &Path, config: &DefinitionConfig) -> Result<(), ConfigError> {
    for def in &config.enchantments {
        let reason = if def.id.trim().is_empty() {
            Some("id is empty")
        } else if def.id.chars().any(char::is_whitespace) {
            Some("id contains whitespace")
        } else if def.display_name.trim().is_empty() {
            Some("name is empty")
        } else if def.max_level == 0 {
            Some("max_level must be at least 1")
        } else if def.applicable_tags.is_empty() {
            Some("applies_to is empty")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                id: def.id.clone(),
                reason,
            });
        }
    }
    Ok(())
}

/// Get the default user definitions directory
pub fn default_custom_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("custom-enchants").join("definitions"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enchants_types::{ItemTag, TextColor};

    const FROST_TOML: &str = r#"
[[enchantment]]
id = "frost"
name = "Frost"
max_level = 2
applies_to = ["sword", "axe"]
color = "aqua"

[[enchantment]]
id = "Vitality"
name = "Vitality"
max_level = 1
applies_to = ["chestplate"]
"#;

    #[test]
    fn test_parse_definition_toml() {
        let config: DefinitionConfig = toml::from_str(FROST_TOML).unwrap();
        assert_eq!(config.enchantments.len(), 2);

        let frost = &config.enchantments[0];
        assert_eq!(frost.id, "frost");
        assert_eq!(frost.display_name, "Frost");
        assert_eq!(frost.applicable_tags, vec![ItemTag::Sword, ItemTag::Axe]);
        assert_eq!(frost.color, TextColor::Aqua);

        // Color defaults to gray
        assert_eq!(config.enchantments[1].color, TextColor::Gray);
    }

    #[test]
    fn test_load_definitions_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("frost.toml"), FROST_TOML).unwrap();
        fs::write(dir.path().join("broken.toml"), "[[enchantment]]\nid = ").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = EnchantmentRegistry::with_defaults();
        let registered = load_definitions(&mut registry, dir.path()).unwrap();

        assert_eq!(registered, 2);
        assert_eq!(registry.len(), 6);
        assert!(registry.lookup("vitality").is_some());
    }

    #[test]
    fn test_load_definitions_skips_builtin_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let toml = r#"
[[enchantment]]
id = "poison"
name = "Venom"
max_level = 5
applies_to = ["axe"]
"#;
        fs::write(dir.path().join("poison.toml"), toml).unwrap();

        let mut registry = EnchantmentRegistry::with_defaults();
        let registered = load_definitions(&mut registry, dir.path()).unwrap();

        assert_eq!(registered, 0);
        assert_eq!(registry.lookup("poison").unwrap().display_name, "Poison");
    }

    #[test]
    fn test_load_file_rejects_zero_max_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        let toml = r#"
[[enchantment]]
id = "broken"
name = "Broken"
max_level = 0
applies_to = ["sword"]
"#;
        fs::write(&path, toml).unwrap();

        match load_file(&path) {
            Err(ConfigError::Invalid { id, .. }) => assert_eq!(id, "broken"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_load_definitions_missing_dir() {
        let mut registry = EnchantmentRegistry::new();
        let result = load_definitions(&mut registry, Path::new("/nonexistent/enchants/dir"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let config: DefinitionConfig = toml::from_str(FROST_TOML).unwrap();

        save_file(&path, &config).unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.enchantments, config.enchantments);
    }
}
