//! Enchantment-driven status effects
//!
//! This module provides:
//! - **Reconciler**: periodic pass turning held/worn enchanted items into
//!   transient player effects, adding and removing them as equipment changes
//! - **Procs**: on-hit lifesteal and poison rolls for the attacker's weapon
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Item lore (the only storage)                  │
//! │        "§r§eHaste II" on the pickaxe in the main hand         │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                     LoreCodec::extract_all
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │              EffectReconciler (every interval)                │
//! │   desired {Haste: amp 1}  vs  active holders {Haste: Alex}    │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                  EffectHost add / remove
//! ```

pub mod procs;
pub mod reconciler;


pub use procs::{CombatProcs, PercentRoll, ProcOutcome};
pub use reconciler::{EffectBinding, EffectOp, EffectReconciler, EquipSlot, TickReport};
