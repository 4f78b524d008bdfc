//! Held/worn enchantment effect reconciliation
//!
//! Once per reconciliation interval the reconciler looks at every online
//! player's equipment, works out which transient effects their enchanted
//! items should grant, and brings the player's effect set in line:
//!
//! - qualifying → (re)apply the effect with a duration slightly longer than
//!   the interval, so it never visibly lapses between passes;
//! - no longer qualifying, but applied by us last time → remove it;
//! - otherwise → nothing.
//!
//! The only state kept between passes is which players currently hold an
//! effect we applied. It exists to know when a removal is owed, never to
//! cache effect parameters.

use std::collections::BTreeMap;
use std::sync::Arc;

use enchants_types::ReconcilerConfig;
use hashbrown::{HashMap, HashSet};

use crate::host::{EffectHost, EffectInstance, EffectKind, ItemView, PlayerView};
use crate::lore::{EnchantmentStore, LoreCodec};
use crate::registry::{EnchantmentRegistry, ids};

/// Where an enchanted item must be for its effect to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipSlot {
    /// Primary hand; the item must also pass the applicability check
    MainHand,
    /// Any worn armor piece passing the host's boots check.
    /// The highest level across pieces wins.
    Boots,
}

/// Maps an enchantment to the effect it grants while equipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectBinding {
    pub enchantment_id: String,
    pub effect: EffectKind,
    pub slot: EquipSlot,
}

impl EffectBinding {
    pub fn new(enchantment_id: &str, effect: EffectKind, slot: EquipSlot) -> Self {
        Self {
            enchantment_id: enchantment_id.to_lowercase(),
            effect,
            slot,
        }
    }

    /// haste in hand → Haste, speedboost on boots → Speed
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(ids::HASTE, EffectKind::Haste, EquipSlot::MainHand),
            Self::new(ids::SPEED_BOOST, EffectKind::Speed, EquipSlot::Boots),
        ]
    }
}

/// Effect operation issued to a player during a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOp {
    Add { player: String, effect: EffectInstance },
    Remove { player: String, kind: EffectKind },
}

/// Summary of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Pass number, starting at 1
    pub pass: u64,
    /// Players inspected
    pub players: usize,
    /// Operations in the order they were issued
    pub ops: Vec<EffectOp>,
}

impl TickReport {
    pub fn adds(&self) -> impl Iterator<Item = (&str, &EffectInstance)> {
        self.ops.iter().filter_map(|op| match op {
            EffectOp::Add { player, effect } => Some((player.as_str(), effect)),
            EffectOp::Remove { .. } => None,
        })
    }

    pub fn removals(&self) -> impl Iterator<Item = (&str, EffectKind)> {
        self.ops.iter().filter_map(|op| match op {
            EffectOp::Remove { player, kind } => Some((player.as_str(), *kind)),
            EffectOp::Add { .. } => None,
        })
    }
}

/// Translates equipped enchanted items into player effects, pass by pass
#[derive(Debug)]
pub struct EffectReconciler {
    registry: Arc<EnchantmentRegistry>,

    bindings: Vec<EffectBinding>,

    config: ReconcilerConfig,

    /// Effect kind -> players currently holding an effect we applied
    active: HashMap<EffectKind, HashSet<String>>,

    passes: u64,
}

impl EffectReconciler {
    /// Create a reconciler with the default haste / speed boost bindings
    pub fn new(registry: Arc<EnchantmentRegistry>, config: ReconcilerConfig) -> Self {
        Self::with_bindings(registry, config, EffectBinding::defaults())
    }

    pub fn with_bindings(
        registry: Arc<EnchantmentRegistry>,
        config: ReconcilerConfig,
        bindings: Vec<EffectBinding>,
    ) -> Self {
        Self {
            registry,
            bindings,
            config,
            active: HashMap::new(),
            passes: 0,
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn bindings(&self) -> &[EffectBinding] {
        &self.bindings
    }

    /// Run one pass over the given online players
    pub fn tick<'p, P>(&mut self, players: impl IntoIterator<Item = &'p mut P>) -> TickReport
    where
        P: PlayerView + EffectHost + 'p,
    {
        self.passes += 1;
        let duration = self.config.effective_duration_ticks();
        let codec = LoreCodec::new(&self.registry);
        let mut report = TickReport {
            pass: self.passes,
            ..TickReport::default()
        };

        for player in players {
            report.players += 1;
            let name = player.name().to_string();
            let desired = desired_effects(&self.registry, &codec, &self.bindings, &*player);

            for (kind, amplifier) in desired {
                let holders = self.active.entry(kind).or_default();
                match amplifier {
                    Some(amplifier) => {
                        let effect = EffectInstance::new(kind, amplifier, duration, false);
                        player.add_effect(effect);
                        if holders.insert(name.clone()) {
                            tracing::debug!(player = %name, effect = %kind, amplifier, "Enchantment effect started");
                        }
                        report.ops.push(EffectOp::Add {
                            player: name.clone(),
                            effect,
                        });
                    }
                    None => {
                        if !holders.remove(name.as_str()) {
                            continue;
                        }
                        // Only clear what we believe we applied and is still there
                        if player.has_effect(kind) {
                            player.remove_effect(kind);
                            report.ops.push(EffectOp::Remove {
                                player: name.clone(),
                                kind,
                            });
                        }
                        tracing::debug!(player = %name, effect = %kind, "Enchantment effect ended");
                    }
                }
            }
        }

        tracing::trace!(
            pass = report.pass,
            players = report.players,
            ops = report.ops.len(),
            "Reconciliation pass complete"
        );
        report
    }

    /// Drop all state for a player who disconnected.
    /// Returns true if the player had any tracked effects.
    pub fn forget_player(&mut self, name: &str) -> bool {
        let mut removed = false;
        for holders in self.active.values_mut() {
            removed |= holders.remove(name);
        }
        self.active.retain(|_, holders| !holders.is_empty());
        if removed {
            tracing::debug!(player = %name, "Cleared reconciler state for departed player");
        }
        removed
    }

    /// Whether the reconciler believes it applied `kind` to `name`
    pub fn is_active(&self, name: &str, kind: EffectKind) -> bool {
        self.active.get(&kind).is_some_and(|holders| holders.contains(name))
    }

    /// Players currently holding a reconciler-managed `kind`
    pub fn active_holders(&self, kind: EffectKind) -> impl Iterator<Item = &str> {
        self.active
            .get(&kind)
            .into_iter()
            .flat_map(|holders| holders.iter().map(String::as_str))
    }

    /// Number of distinct players with any tracked effect
    pub fn tracked_players(&self) -> usize {
        let players: HashSet<&str> = self
            .active
            .values()
            .flat_map(|holders| holders.iter().map(String::as_str))
            .collect();
        players.len()
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }
}

/// Desired amplifier per bound effect kind (None = should not have it).
/// Several bindings on one kind combine by taking the highest amplifier.
fn desired_effects<P: PlayerView>(
    registry: &EnchantmentRegistry,
    store: &impl EnchantmentStore,
    bindings: &[EffectBinding],
    player: &P,
) -> BTreeMap<EffectKind, Option<u32>> {
    let mut desired: BTreeMap<EffectKind, Option<u32>> = BTreeMap::new();
    for binding in bindings {
        let level = match binding.slot {
            EquipSlot::MainHand => held_level(registry, store, binding, player),
            EquipSlot::Boots => boots_level(store, binding, player),
        };
        let amplifier = level.map(|level| level - 1);
        let entry = desired.entry(binding.effect).or_insert(None);
        *entry = (*entry).max(amplifier);
    }
    desired
}

fn held_level<P: PlayerView>(
    registry: &EnchantmentRegistry,
    store: &impl EnchantmentStore,
    binding: &EffectBinding,
    player: &P,
) -> Option<u32> {
    let item = player.held_item().filter(|item| !item.is_null())?;
    let level = store.read(item.lore()).get(&binding.enchantment_id)?;
    let def = registry.lookup(&binding.enchantment_id)?;
    registry.is_applicable(def, item.tags()).then_some(level)
}

fn boots_level<P: PlayerView>(
    store: &impl EnchantmentStore,
    binding: &EffectBinding,
    player: &P,
) -> Option<u32> {
    player
        .armor()
        .filter(|item| !item.is_null() && item.is_boots())
        .filter_map(|item| store.read(item.lore()).get(&binding.enchantment_id))
        .max()
}
