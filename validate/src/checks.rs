//! Offline checks for definitions, lore lines and service config

use enchants_core::registry::EnchantmentRegistry;
use enchants_core::{EnchantmentStore, LoreCodec};
use enchants_types::EnchantsConfig;
use enchants_types::text::clean;
use serde::Serialize;

/// Pair of display names where one contains the other.
///
/// Re-applying the longer one removes nothing extra, but applying the
/// shorter one also deletes the longer one's lore line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    /// Id whose display name is contained in the other
    pub shorter: String,
    pub longer: String,
}

/// Find display-name containment between every pair of definitions
pub fn name_collisions(registry: &EnchantmentRegistry) -> Vec<NameCollision> {
    let mut defs: Vec<(&str, String)> = registry
        .list_all()
        .map(|(id, def)| (id, clean(&def.display_name)))
        .collect();
    defs.sort();

    let mut collisions = Vec::new();
    for (i, (id_a, name_a)) in defs.iter().enumerate() {
        for (id_b, name_b) in defs.iter().skip(i + 1) {
            let (shorter, longer) = if name_a.len() <= name_b.len() {
                (id_a, id_b)
            } else {
                (id_b, id_a)
            };
            if name_b.contains(name_a.as_str()) || name_a.contains(name_b.as_str()) {
                collisions.push(NameCollision {
                    shorter: shorter.to_string(),
                    longer: longer.to_string(),
                });
            }
        }
    }
    collisions
}

/// What one lore line decodes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    pub line: String,
    /// `(id, level)` pairs recognised on this line
    pub matches: Vec<(String, u32)>,
}

/// Decode every line on its own
pub fn decode_lines(registry: &EnchantmentRegistry, lines: &[String]) -> Vec<LineReport> {
    let codec = LoreCodec::new(registry);
    lines
        .iter()
        .map(|line| LineReport {
            line: line.clone(),
            matches: codec
                .read(std::slice::from_ref(line))
                .iter()
                .map(|(id, level)| (id.to_string(), level))
                .collect(),
        })
        .collect()
}

/// Problems with a service config that still parses
pub fn config_warnings(config: &EnchantsConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let reconciler = &config.reconciler;
    if reconciler.interval_ticks == 0 {
        warnings.push("reconciler.interval_ticks is 0; treated as 1".to_string());
    }
    if reconciler.effect_duration_ticks <= reconciler.interval_ticks {
        warnings.push(format!(
            "reconciler.effect_duration_ticks ({}) does not exceed interval_ticks ({}); effects would flicker, using {}",
            reconciler.effect_duration_ticks,
            reconciler.interval_ticks,
            reconciler.effective_duration_ticks()
        ));
    }
    if config.ticks_per_second == 0 {
        warnings.push("ticks_per_second is 0".to_string());
    }
    let procs = &config.procs;
    if procs.lifesteal_chance_per_level > 100 || procs.poison_chance_per_level > 100 {
        warnings.push("a proc chance per level exceeds 100%".to_string());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use enchants_types::{ItemTag, TextColor};

    #[test]
    fn test_defaults_have_no_collisions() {
        let registry = EnchantmentRegistry::with_defaults();
        assert!(name_collisions(&registry).is_empty());
    }

    #[test]
    fn test_speed_inside_speed_boost() {
        let mut registry = EnchantmentRegistry::with_defaults();
        registry.register("speed", "Speed", 2, &[ItemTag::Boots], TextColor::Aqua);

        assert_eq!(
            name_collisions(&registry),
            vec![NameCollision {
                shorter: "speed".to_string(),
                longer: "speedboost".to_string(),
            }]
        );
    }

    #[test]
    fn test_decode_lines() {
        let registry = EnchantmentRegistry::with_defaults();
        let lines = vec![
            "§r§eHaste III".to_string(),
            "Sharp and shiny".to_string(),
            "§r§cLifesteal X".to_string(),
        ];
        let reports = decode_lines(&registry, &lines);
        assert_eq!(reports[0].matches, vec![("haste".to_string(), 3)]);
        assert!(reports[1].matches.is_empty());
        // Decoding does not enforce max_level
        assert_eq!(reports[2].matches, vec![("lifesteal".to_string(), 10)]);
    }

    #[test]
    fn test_config_warnings() {
        assert!(config_warnings(&EnchantsConfig::default()).is_empty());

        let mut config = EnchantsConfig::default();
        config.reconciler.effect_duration_ticks = 20;
        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("using 21"));
    }
}
