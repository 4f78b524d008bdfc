//! Enchantment registry
//!
//! This module provides:
//! - **Definitions**: Metadata for each enchantment kind (name, max level,
//!   applicable item tags, lore color)
//! - **Registry**: The id-keyed set of definitions, populated once at startup
//! - **Config**: Loading extra definitions from TOML files
//!
//! The registry is written during startup only. After that it is shared
//! behind an `Arc` and read from the reconciler, the lore codec and the
//! combat procs without locking.

pub mod config;
mod definition;

pub use config::{ConfigError, load_definitions, load_file};
pub use definition::{DefinitionConfig, EnchantmentDefinition};

use enchants_types::text;
use enchants_types::{ItemTag, TextColor};
use hashbrown::HashMap;

/// Well-known enchantment ids registered by [`EnchantmentRegistry::register_defaults`]
pub mod ids {
    pub const POISON: &str = "poison";
    pub const LIFESTEAL: &str = "lifesteal";
    pub const HASTE: &str = "haste";
    pub const SPEED_BOOST: &str = "speedboost";
}

/// Registered enchantment definitions keyed by lowercase id
#[derive(Debug, Clone, Default)]
pub struct EnchantmentRegistry {
    definitions: HashMap<String, EnchantmentDefinition>,
}

impl EnchantmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the four built-in enchantments
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Register the built-in enchantments.
    ///
    /// `speedboost` is registered for all armor; restricting it to boots is
    /// the caller's job.
    pub fn register_defaults(&mut self) {
        self.register(ids::POISON, "Poison", 3, &[ItemTag::Sword], TextColor::DarkGreen);
        self.register(ids::LIFESTEAL, "Lifesteal", 3, &[ItemTag::Sword], TextColor::Red);
        self.register(
            ids::HASTE,
            "Haste",
            3,
            &[ItemTag::Pickaxe, ItemTag::Axe, ItemTag::Shovel],
            TextColor::Yellow,
        );
        self.register(ids::SPEED_BOOST, "Speed Boost", 2, &[ItemTag::Armor], TextColor::Aqua);
    }

    /// Register a new enchantment.
    ///
    /// Returns false and leaves the registry untouched if the id (compared
    /// lowercase) is already registered.
    pub fn register(
        &mut self,
        id: &str,
        display_name: &str,
        max_level: u32,
        applicable_tags: &[ItemTag],
        color: TextColor,
    ) -> bool {
        self.insert(EnchantmentDefinition::new(
            id,
            display_name,
            max_level,
            applicable_tags,
            color,
        ))
    }

    /// Register a prebuilt definition. Same duplicate rule as [`Self::register`].
    ///
    /// A display name that is blank once formatting is stripped is rejected:
    /// every lore line would contain it.
    pub fn insert(&mut self, mut definition: EnchantmentDefinition) -> bool {
        definition.id = definition.id.to_lowercase();
        if text::clean(&definition.display_name).trim().is_empty() {
            tracing::warn!(id = %definition.id, "Enchantment has a blank display name, ignoring");
            return false;
        }
        if self.definitions.contains_key(&definition.id) {
            tracing::warn!(id = %definition.id, "Enchantment already registered, ignoring");
            return false;
        }
        tracing::debug!(
            id = %definition.id,
            name = %definition.display_name,
            max_level = definition.max_level,
            "Registered enchantment"
        );
        self.definitions.insert(definition.id.clone(), definition);
        true
    }

    /// Register every definition in a parsed config file.
    /// Returns the ids that were skipped (duplicates or blank names).
    pub fn register_config(&mut self, config: DefinitionConfig) -> Vec<String> {
        let mut duplicates = Vec::new();
        for def in config.enchantments {
            let id = def.id.to_lowercase();
            if !self.insert(def) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    /// Get a definition by id (case-insensitive)
    pub fn lookup(&self, id: &str) -> Option<&EnchantmentDefinition> {
        self.definitions.get(id.to_lowercase().as_str())
    }

    /// All registered definitions, in no particular order
    pub fn list_all(&self) -> impl Iterator<Item = (&str, &EnchantmentDefinition)> {
        self.definitions.iter().map(|(id, def)| (id.as_str(), def))
    }

    /// Registered ids sorted alphabetically, for display
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// True iff the item's tags intersect the definition's applicable tags
    pub fn is_applicable(&self, definition: &EnchantmentDefinition, item_tags: &[ItemTag]) -> bool {
        definition.applies_to(item_tags)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
