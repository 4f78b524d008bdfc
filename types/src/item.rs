use serde::{Deserialize, Serialize};

/// Capability tag attached to an item type.
///
/// Enchantment definitions list the tags they apply to; an item is eligible
/// when its own tag set shares at least one tag with the definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemTag {
    Sword,
    Pickaxe,
    Axe,
    Shovel,
    Armor,
    Helmet,
    Chestplate,
    Leggings,
    Boots,
}

impl ItemTag {
    pub const ALL: [ItemTag; 9] = [
        Self::Sword,
        Self::Pickaxe,
        Self::Axe,
        Self::Shovel,
        Self::Armor,
        Self::Helmet,
        Self::Chestplate,
        Self::Leggings,
        Self::Boots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sword => "sword",
            Self::Pickaxe => "pickaxe",
            Self::Axe => "axe",
            Self::Shovel => "shovel",
            Self::Armor => "armor",
            Self::Helmet => "helmet",
            Self::Chestplate => "chestplate",
            Self::Leggings => "leggings",
            Self::Boots => "boots",
        }
    }
}

impl std::fmt::Display for ItemTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
