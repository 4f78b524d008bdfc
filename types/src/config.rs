//! Persisted configuration for the enchantment service.
//!
//! Every field has a serde default so partial config files (and files written
//! by older versions) still load.

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnchantsConfig {
    /// Server ticks per real-time second
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,

    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    #[serde(default)]
    pub procs: ProcConfig,

    #[serde(default)]
    pub command: CommandConfig,

    /// Extra TOML definition files loaded after the defaults
    #[serde(default)]
    pub definitions_dir: Option<String>,
}

impl Default for EnchantsConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: default_ticks_per_second(),
            reconciler: ReconcilerConfig::default(),
            procs: ProcConfig::default(),
            command: CommandConfig::default(),
            definitions_dir: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reconciler
// ─────────────────────────────────────────────────────────────────────────────

/// Periodic held/worn effect reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Ticks between reconciliation passes
    #[serde(default = "default_interval_ticks")]
    pub interval_ticks: u32,

    /// Duration of each applied transient effect. Must outlast the interval
    /// so the effect does not flicker between passes.
    #[serde(default = "default_effect_duration_ticks")]
    pub effect_duration_ticks: u32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval_ticks: default_interval_ticks(),
            effect_duration_ticks: default_effect_duration_ticks(),
        }
    }
}

impl ReconcilerConfig {
    /// Effect duration actually used, bumped past the interval if misconfigured
    pub fn effective_duration_ticks(&self) -> u32 {
        self.effect_duration_ticks.max(self.interval_ticks.saturating_add(1))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Combat procs
// ─────────────────────────────────────────────────────────────────────────────

/// On-hit proc tuning. Chances are whole percents per enchantment level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcConfig {
    #[serde(default = "default_lifesteal_chance")]
    pub lifesteal_chance_per_level: u32,

    /// Fraction of final damage healed per level
    #[serde(default = "default_lifesteal_heal")]
    pub lifesteal_heal_per_level: f32,

    #[serde(default = "default_lifesteal_min_heal")]
    pub lifesteal_min_heal: f32,

    #[serde(default = "default_poison_chance")]
    pub poison_chance_per_level: u32,

    #[serde(default = "default_poison_seconds")]
    pub poison_seconds_per_level: u32,
}

impl Default for ProcConfig {
    fn default() -> Self {
        Self {
            lifesteal_chance_per_level: default_lifesteal_chance(),
            lifesteal_heal_per_level: default_lifesteal_heal(),
            lifesteal_min_heal: default_lifesteal_min_heal(),
            poison_chance_per_level: default_poison_chance(),
            poison_seconds_per_level: default_poison_seconds(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command
// ─────────────────────────────────────────────────────────────────────────────

/// Administrative command settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Player names allowed to run the enchant command. The console is
    /// always allowed.
    #[serde(default)]
    pub operators: Vec<String>,
}

impl CommandConfig {
    pub fn is_operator(&self, name: &str) -> bool {
        self.operators.iter().any(|op| op.eq_ignore_ascii_case(name))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn default_ticks_per_second() -> u32 {
    20
}

fn default_interval_ticks() -> u32 {
    20
}

fn default_effect_duration_ticks() -> u32 {
    40
}

fn default_lifesteal_chance() -> u32 {
    5
}

fn default_lifesteal_heal() -> f32 {
    0.1
}

fn default_lifesteal_min_heal() -> f32 {
    1.0
}

fn default_poison_chance() -> u32 {
    8
}

fn default_poison_seconds() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: EnchantsConfig = toml::from_str("").unwrap();
        assert_eq!(config, EnchantsConfig::default());
        assert_eq!(config.reconciler.interval_ticks, 20);
        assert_eq!(config.reconciler.effect_duration_ticks, 40);
        assert_eq!(config.procs.poison_chance_per_level, 8);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
definitions_dir = "/srv/enchants"

[reconciler]
interval_ticks = 10

[command]
operators = ["Steve"]
"#;
        let config: EnchantsConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.reconciler.interval_ticks, 10);
        assert_eq!(config.reconciler.effect_duration_ticks, 40);
        assert_eq!(config.definitions_dir.as_deref(), Some("/srv/enchants"));
        assert!(config.command.is_operator("steve"));
        assert!(!config.command.is_operator("alex"));
    }

    #[test]
    fn test_effective_duration_outlasts_interval() {
        let config = ReconcilerConfig {
            interval_ticks: 20,
            effect_duration_ticks: 10,
        };
        assert_eq!(config.effective_duration_ticks(), 21);
        assert_eq!(ReconcilerConfig::default().effective_duration_ticks(), 40);
    }
}
