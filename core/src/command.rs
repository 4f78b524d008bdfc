//! The `customenchant` administrative command
//!
//! `customenchant <enchantId> <level> [targetPlayer]` applies an enchantment
//! to the item in the target's hand (the sender's own hand when no target is
//! given). Every rejection is a [`CommandError`] whose message is shown to
//! the sender; nothing is modified unless the whole command succeeds.

use enchants_types::CommandConfig;
use enchants_types::formatting::to_roman;

use crate::host::{HeldItemMut, ItemLoreMut, ItemView};
use crate::lore::EnchantmentStore;
use crate::registry::EnchantmentRegistry;

pub const COMMAND_NAME: &str = "customenchant";
pub const USAGE: &str = "/customenchant <enchantId> <level> [targetPlayer]";
pub const PERMISSION: &str = "customenchants.command.use";

/// Who issued the command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    Console,
    Player(String),
}

impl CommandSender {
    pub fn player_name(&self) -> Option<&str> {
        match self {
            Self::Console => None,
            Self::Player(name) => Some(name),
        }
    }

    /// Console always holds the permission; players must be operators
    pub fn has_permission(&self, config: &CommandConfig) -> bool {
        match self {
            Self::Console => true,
            Self::Player(name) => config.is_operator(name),
        }
    }
}

/// Rejections, displayed verbatim to the sender
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("You don't have permission to use this command.")]
    NoPermission,
    #[error("Usage: {USAGE}")]
    Usage,
    #[error("Level must be a number.")]
    LevelNotNumeric,
    #[error("Player '{0}' not found.")]
    PlayerNotFound(String),
    #[error("This command can only be used by players or requires a target player.")]
    NoTarget,
    #[error("You must hold an item in your hand.")]
    EmptyHand,
    #[error("Unknown enchantment: {id}. Available: {available}")]
    UnknownEnchantment { id: String, available: String },
    #[error("Invalid level for {name}. Max level is {max_level}.")]
    InvalidLevel { name: String, max_level: u32 },
    #[error("Enchantment '{name}' cannot be applied to this item type.")]
    NotApplicable { name: String },
    #[error("Failed to apply enchantment.")]
    ApplyFailed,
}

/// Parsed command arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnchantArgs {
    /// Lowercased enchantment id
    pub enchantment_id: String,
    /// Requested level, not yet range-checked
    pub level: i64,
    pub target: Option<String>,
}

impl EnchantArgs {
    /// Parse `<enchantId> <level> [targetPlayer]`. Extra arguments are ignored.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, CommandError> {
        let [id, level, rest @ ..] = args else {
            return Err(CommandError::Usage);
        };
        let level = parse_level(level.as_ref()).ok_or(CommandError::LevelNotNumeric)?;
        Ok(Self {
            enchantment_id: id.as_ref().to_lowercase(),
            level,
            target: rest.first().map(|s| s.as_ref().to_string()),
        })
    }
}

/// Integer levels, or decimal ones truncated toward zero
fn parse_level(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// A successful application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnchantApplied {
    pub target: String,
    pub enchantment_id: String,
    pub display_name: String,
    pub level: u32,
    /// Item lore after the change
    pub lore: Vec<String>,
}

impl EnchantApplied {
    /// Message for the sender
    pub fn sender_message(&self) -> String {
        format!(
            "Applied {} {} to {}'s item.",
            self.display_name,
            to_roman(i64::from(self.level)),
            self.target
        )
    }

    /// Message for the target, when it is not the sender
    pub fn target_message(&self) -> String {
        format!("Your item received {} {}!", self.display_name, to_roman(i64::from(self.level)))
    }
}

/// Validate and apply an enchantment to the item in `player`'s hand.
///
/// Checks run in order: non-empty hand, known id, level range,
/// applicability. The item is only touched after all of them pass.
pub fn enchant_held_item<P>(
    registry: &EnchantmentRegistry,
    store: &impl EnchantmentStore,
    player: &mut P,
    enchantment_id: &str,
    level: i64,
) -> Result<EnchantApplied, CommandError>
where
    P: HeldItemMut,
    P::Item: ItemLoreMut,
{
    let target = player.name().to_string();
    let item = player
        .held_item_mut()
        .filter(|item| !item.is_null())
        .ok_or(CommandError::EmptyHand)?;

    let def = registry.lookup(enchantment_id).ok_or_else(|| {
        let ids = registry.sorted_ids();
        CommandError::UnknownEnchantment {
            id: enchantment_id.to_string(),
            available: if ids.is_empty() { "None".to_string() } else { ids.join(", ") },
        }
    })?;

    let level = u32::try_from(level)
        .ok()
        .filter(|level| def.accepts_level(*level))
        .ok_or_else(|| CommandError::InvalidLevel {
            name: def.display_name.clone(),
            max_level: def.max_level,
        })?;

    if !registry.is_applicable(def, item.tags()) {
        return Err(CommandError::NotApplicable {
            name: def.display_name.clone(),
        });
    }

    let lore = store
        .write(item.lore(), &def.id, level)
        .ok_or(CommandError::ApplyFailed)?;
    item.set_lore(lore.clone());

    Ok(EnchantApplied {
        target,
        enchantment_id: def.id.clone(),
        display_name: def.display_name.clone(),
        level,
        lore,
    })
}
