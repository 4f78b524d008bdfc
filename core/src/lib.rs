//! Custom item enchantments stored in lore text, with a periodic reconciler
//! turning equipped enchanted items into player effects.

pub mod command;
pub mod effects;
pub mod host;
pub mod logging;
pub mod lore;
pub mod registry;
pub mod service;
pub mod settings;
pub mod sim;

pub use command::{CommandError, CommandSender, EnchantApplied};
pub use effects::{EffectReconciler, ProcOutcome, TickReport};
pub use host::{EffectHost, EffectInstance, EffectKind, GameServer, ItemView, PlayerView};
pub use lore::{AppliedEnchantments, EnchantmentStore, LoreCodec};
pub use registry::{EnchantmentDefinition, EnchantmentRegistry};
pub use service::EnchantService;

pub use enchants_types as types;
