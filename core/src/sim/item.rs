use std::fmt;
use std::str::FromStr;

use enchants_types::ItemTag;

use crate::host::{ItemLoreMut, ItemView};

/// Item types known to the simulated server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Air,
    Stick,
    WoodenSword,
    IronSword,
    DiamondSword,
    IronPickaxe,
    DiamondPickaxe,
    IronAxe,
    IronShovel,
    IronHelmet,
    IronChestplate,
    IronLeggings,
    LeatherBoots,
    ChainmailBoots,
    IronBoots,
    GoldenBoots,
    DiamondBoots,
    NetheriteBoots,
}

impl ItemKind {
    pub const ALL: [ItemKind; 18] = [
        Self::Air,
        Self::Stick,
        Self::WoodenSword,
        Self::IronSword,
        Self::DiamondSword,
        Self::IronPickaxe,
        Self::DiamondPickaxe,
        Self::IronAxe,
        Self::IronShovel,
        Self::IronHelmet,
        Self::IronChestplate,
        Self::IronLeggings,
        Self::LeatherBoots,
        Self::ChainmailBoots,
        Self::IronBoots,
        Self::GoldenBoots,
        Self::DiamondBoots,
        Self::NetheriteBoots,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Stick => "stick",
            Self::WoodenSword => "wooden_sword",
            Self::IronSword => "iron_sword",
            Self::DiamondSword => "diamond_sword",
            Self::IronPickaxe => "iron_pickaxe",
            Self::DiamondPickaxe => "diamond_pickaxe",
            Self::IronAxe => "iron_axe",
            Self::IronShovel => "iron_shovel",
            Self::IronHelmet => "iron_helmet",
            Self::IronChestplate => "iron_chestplate",
            Self::IronLeggings => "iron_leggings",
            Self::LeatherBoots => "leather_boots",
            Self::ChainmailBoots => "chainmail_boots",
            Self::IronBoots => "iron_boots",
            Self::GoldenBoots => "golden_boots",
            Self::DiamondBoots => "diamond_boots",
            Self::NetheriteBoots => "netherite_boots",
        }
    }

    /// Capability tags of this item type
    pub fn tags(&self) -> &'static [ItemTag] {
        match self {
            Self::Air | Self::Stick => &[],
            Self::WoodenSword | Self::IronSword | Self::DiamondSword => &[ItemTag::Sword],
            Self::IronPickaxe | Self::DiamondPickaxe => &[ItemTag::Pickaxe],
            Self::IronAxe => &[ItemTag::Axe],
            Self::IronShovel => &[ItemTag::Shovel],
            Self::IronHelmet => &[ItemTag::Armor, ItemTag::Helmet],
            Self::IronChestplate => &[ItemTag::Armor, ItemTag::Chestplate],
            Self::IronLeggings => &[ItemTag::Armor, ItemTag::Leggings],
            Self::LeatherBoots
            | Self::ChainmailBoots
            | Self::IronBoots
            | Self::GoldenBoots
            | Self::DiamondBoots
            | Self::NetheriteBoots => &[ItemTag::Armor, ItemTag::Boots],
        }
    }

    /// Vanilla boot variants. Any other item is never treated as boots.
    pub fn is_vanilla_boots(&self) -> bool {
        matches!(
            self,
            Self::LeatherBoots
                | Self::ChainmailBoots
                | Self::IronBoots
                | Self::GoldenBoots
                | Self::DiamondBoots
                | Self::NetheriteBoots
        )
    }

    pub fn is_armor(&self) -> bool {
        self.tags().contains(&ItemTag::Armor)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item type '{0}'")]
pub struct UnknownItemKind(pub String);

impl FromStr for ItemKind {
    type Err = UnknownItemKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnknownItemKind(s.to_string()))
    }
}

/// An item stack in the simulated world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimItem {
    pub kind: ItemKind,
    pub lore: Vec<String>,
}

impl SimItem {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            lore: Vec::new(),
        }
    }

    pub fn with_lore(kind: ItemKind, lore: Vec<String>) -> Self {
        Self { kind, lore }
    }
}

impl ItemView for SimItem {
    fn lore(&self) -> &[String] {
        &self.lore
    }

    fn tags(&self) -> &[ItemTag] {
        self.kind.tags()
    }

    fn is_null(&self) -> bool {
        self.kind == ItemKind::Air
    }

    fn is_boots(&self) -> bool {
        self.kind.is_vanilla_boots()
    }
}

impl ItemLoreMut for SimItem {
    fn set_lore(&mut self, lore: Vec<String>) {
        self.lore = lore;
    }
}
