//! Host game interfaces
//!
//! The core never talks to a game engine directly. Items, players and their
//! status effects are reached through these traits, implemented by the
//! embedding server (and by [`crate::sim`] for the CLI and tests).

use enchants_types::ItemTag;

/// Status effect kinds the core can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    Haste,
    Speed,
    Poison,
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Haste => "haste",
            Self::Speed => "speed",
            Self::Poison => "poison",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed application of a status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectInstance {
    pub kind: EffectKind,
    /// Zero-based intensity (enchantment level - 1)
    pub amplifier: u32,
    pub duration_ticks: u32,
    /// Show particles / HUD icon
    pub visible: bool,
}

impl EffectInstance {
    pub fn new(kind: EffectKind, amplifier: u32, duration_ticks: u32, visible: bool) -> Self {
        Self {
            kind,
            amplifier,
            duration_ticks,
            visible,
        }
    }
}

/// Read access to an inventory item
pub trait ItemView {
    /// Ordered lore lines
    fn lore(&self) -> &[String];

    /// Capability tags of the item's type
    fn tags(&self) -> &[ItemTag];

    /// Empty slot / air
    fn is_null(&self) -> bool {
        false
    }

    /// Host identity check for boots. Defaults to the `boots` tag.
    fn is_boots(&self) -> bool {
        self.tags().contains(&ItemTag::Boots)
    }
}

/// Write access to an item's lore
pub trait ItemLoreMut: ItemView {
    /// Replace the lore wholesale
    fn set_lore(&mut self, lore: Vec<String>);
}

/// Read access to an online player's equipment
pub trait PlayerView {
    type Item: ItemView;

    /// Unique player name, used as the reconciler's key
    fn name(&self) -> &str;

    /// Item in the primary hand
    fn held_item(&self) -> Option<&Self::Item>;

    /// Worn armor pieces
    fn armor(&self) -> impl Iterator<Item = &Self::Item>;
}

/// Mutable status effect set of a living entity
pub trait EffectHost {
    /// Add or refresh an effect
    fn add_effect(&mut self, effect: EffectInstance);

    /// Remove an effect kind regardless of its source
    fn remove_effect(&mut self, kind: EffectKind);

    fn has_effect(&self, kind: EffectKind) -> bool;
}

/// Health of a living entity
pub trait Living: EffectHost {
    fn health(&self) -> f32;

    fn max_health(&self) -> f32;

    fn set_health(&mut self, health: f32);
}

/// Mutable access to the item in a player's primary hand
pub trait HeldItemMut: PlayerView {
    fn held_item_mut(&mut self) -> Option<&mut Self::Item>;
}

/// The online player list of the embedding server
pub trait GameServer {
    type Player: PlayerView<Item: ItemLoreMut> + HeldItemMut + Living;

    fn online_players_mut(&mut self) -> impl Iterator<Item = &mut Self::Player>;

    /// Exact, case-insensitive lookup
    fn player_mut(&mut self, name: &str) -> Option<&mut Self::Player>;

    /// Resolve a possibly abbreviated player name to the full name
    fn resolve_player(&self, prefix: &str) -> Option<String>;

    fn send_message(&mut self, name: &str, message: &str);
}
