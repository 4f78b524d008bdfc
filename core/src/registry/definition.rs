//! Enchantment definition types
//!
//! Definitions are the registered metadata for one enchantment kind. They
//! are built in code by the default bootstrap or loaded from TOML files.

use enchants_types::{ItemTag, TextColor};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Enchantment Definitions
// ═══════════════════════════════════════════════════════════════════════════

/// Definition of a custom enchantment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnchantmentDefinition {
    /// Unique lowercase identifier (e.g., "speedboost")
    pub id: String,

    /// Display name written into lore (e.g., "Speed Boost")
    #[serde(rename = "name")]
    pub display_name: String,

    /// Highest level that may be applied
    pub max_level: u32,

    /// Item capability tags this enchantment can be applied to
    #[serde(rename = "applies_to")]
    pub applicable_tags: Vec<ItemTag>,

    /// Lore line color
    #[serde(default)]
    pub color: TextColor,
}

impl EnchantmentDefinition {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        max_level: u32,
        applicable_tags: impl Into<Vec<ItemTag>>,
        color: TextColor,
    ) -> Self {
        Self {
            id: id.into().to_lowercase(),
            display_name: display_name.into(),
            max_level,
            applicable_tags: applicable_tags.into(),
            color,
        }
    }

    /// Check if a level is within `1..=max_level`
    pub fn accepts_level(&self, level: u32) -> bool {
        (1..=self.max_level).contains(&level)
    }

    /// Check if an item with the given tags can carry this enchantment
    pub fn applies_to(&self, item_tags: &[ItemTag]) -> bool {
        self.applicable_tags.iter().any(|tag| item_tags.contains(tag))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Config File Structure
// ═══════════════════════════════════════════════════════════════════════════

/// Root structure for enchantment definition files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionConfig {
    /// Enchantment definitions in this file
    #[serde(default, rename = "enchantment")]
    pub enchantments: Vec<EnchantmentDefinition>,
}
