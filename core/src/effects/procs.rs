//! On-hit combat procs
//!
//! When a player damages a living entity, enchantments on the attacker's
//! held item get an independent chance to fire:
//! - **Lifesteal**: heal the attacker by a fraction of the damage dealt
//! - **Poison**: poison the victim for a few seconds per level
//!
//! Chances are whole percents scaled linearly by level and rolled as a
//! uniform integer in `1..=100`.

use enchants_types::ProcConfig;
use rand::Rng;

use crate::host::{EffectHost, EffectInstance, EffectKind, ItemView, Living};
use crate::lore::EnchantmentStore;
use crate::registry::ids;

/// Source of percent rolls in `1..=100`
pub trait PercentRoll {
    fn roll_percent(&mut self) -> u32;
}

impl<R: Rng> PercentRoll for R {
    fn roll_percent(&mut self) -> u32 {
        self.gen_range(1..=100)
    }
}

/// What fired during one hit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcOutcome {
    /// Health restored to the attacker
    pub healed: Option<f32>,
    /// Poison applied to the victim
    pub poisoned: Option<EffectInstance>,
}

impl ProcOutcome {
    pub fn is_empty(&self) -> bool {
        self.healed.is_none() && self.poisoned.is_none()
    }
}

/// Resolves on-hit procs for an attacker's held item
#[derive(Debug, Clone, Copy)]
pub struct CombatProcs<'a, S> {
    store: &'a S,
    config: &'a ProcConfig,
    ticks_per_second: u32,
}

impl<'a, S: EnchantmentStore> CombatProcs<'a, S> {
    pub fn new(store: &'a S, config: &'a ProcConfig, ticks_per_second: u32) -> Self {
        Self {
            store,
            config,
            ticks_per_second,
        }
    }

    /// Roll all procs for one damage event.
    ///
    /// `victim` is `None` when the damaged entity is not living; poison then
    /// never fires. Nothing fires when `final_damage` is not positive.
    pub fn on_hit<I, A, V>(
        &self,
        weapon: Option<&I>,
        attacker: &mut A,
        victim: Option<&mut V>,
        final_damage: f32,
        rng: &mut impl PercentRoll,
    ) -> ProcOutcome
    where
        I: ItemView,
        A: Living,
        V: EffectHost,
    {
        let mut outcome = ProcOutcome::default();
        let Some(weapon) = weapon.filter(|item| !item.is_null()) else {
            return outcome;
        };
        let applied = self.store.read(weapon.lore());

        if let Some(level) = applied.get(ids::LIFESTEAL) {
            let chance = self.config.lifesteal_chance_per_level.saturating_mul(level);
            if rng.roll_percent() <= chance && final_damage > 0.0 {
                let heal = (final_damage * self.config.lifesteal_heal_per_level * level as f32)
                    .max(self.config.lifesteal_min_heal);
                let before = attacker.health();
                let after = (before + heal).min(attacker.max_health());
                attacker.set_health(after);
                outcome.healed = Some(after - before);
                tracing::debug!(level, heal = after - before, "Lifesteal proc");
            }
        }

        if let (Some(level), Some(victim)) = (applied.get(ids::POISON), victim) {
            let chance = self.config.poison_chance_per_level.saturating_mul(level);
            if rng.roll_percent() <= chance && final_damage > 0.0 {
                // Lore is not capped at max_level, so levels can be arbitrarily large
                let duration = self
                    .config
                    .poison_seconds_per_level
                    .saturating_mul(self.ticks_per_second)
                    .saturating_mul(level);
                let effect = EffectInstance::new(EffectKind::Poison, level - 1, duration, true);
                victim.add_effect(effect);
                outcome.poisoned = Some(effect);
                tracing::debug!(level, duration, "Poison proc");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lore::LoreCodec;
    use crate::registry::EnchantmentRegistry;
    use crate::sim::{ItemKind, SimItem, SimPlayer};

    /// Returns queued rolls in order, then 100
    struct FixedRolls(Vec<u32>);

    impl PercentRoll for FixedRolls {
        fn roll_percent(&mut self) -> u32 {
            if self.0.is_empty() { 100 } else { self.0.remove(0) }
        }
    }

    fn weapon(registry: &EnchantmentRegistry, enchants: &[(&str, u32)]) -> SimItem {
        let codec = LoreCodec::new(registry);
        let mut item = SimItem::new(ItemKind::DiamondSword);
        for (id, level) in enchants {
            item.lore = codec.apply_to_lore(&item.lore, id, *level).unwrap();
        }
        item
    }

    #[test]
    fn test_lifesteal_heals_attacker() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let sword = weapon(&registry, &[("lifesteal", 2)]);
        let mut attacker = SimPlayer::new("Alex");
        attacker.health = 10.0;
        let mut victim = SimPlayer::new("Steve");

        // 2 * 5% = 10%, roll of 10 fires
        let outcome = procs.on_hit(Some(&sword), &mut attacker, Some(&mut victim), 20.0, &mut FixedRolls(vec![10]));

        // 20 damage * 0.1 * 2 = 4
        assert_eq!(outcome.healed, Some(4.0));
        assert_eq!(attacker.health, 14.0);
        assert!(outcome.poisoned.is_none());
    }

    #[test]
    fn test_lifesteal_roll_above_chance_misses() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let sword = weapon(&registry, &[("lifesteal", 2)]);
        let mut attacker = SimPlayer::new("Alex");
        attacker.health = 10.0;
        let mut victim = SimPlayer::new("Steve");

        let outcome = procs.on_hit(Some(&sword), &mut attacker, Some(&mut victim), 20.0, &mut FixedRolls(vec![11]));
        assert!(outcome.is_empty());
        assert_eq!(attacker.health, 10.0);
    }

    #[test]
    fn test_lifesteal_minimum_heal_and_cap() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let sword = weapon(&registry, &[("lifesteal", 1)]);
        let mut attacker = SimPlayer::new("Alex");
        attacker.health = 19.5;
        let mut victim = SimPlayer::new("Steve");

        // 2 damage * 0.1 = 0.2, raised to 1, capped at 20
        let outcome = procs.on_hit(Some(&sword), &mut attacker, Some(&mut victim), 2.0, &mut FixedRolls(vec![1]));
        assert_eq!(outcome.healed, Some(0.5));
        assert_eq!(attacker.health, 20.0);
    }

    #[test]
    fn test_poison_applies_to_victim() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let sword = weapon(&registry, &[("poison", 3)]);
        let mut attacker = SimPlayer::new("Alex");
        let mut victim = SimPlayer::new("Steve");

        // 3 * 8% = 24%
        let outcome = procs.on_hit(Some(&sword), &mut attacker, Some(&mut victim), 5.0, &mut FixedRolls(vec![24]));

        let poison = outcome.poisoned.unwrap();
        assert_eq!(poison.kind, EffectKind::Poison);
        assert_eq!(poison.amplifier, 2);
        assert_eq!(poison.duration_ticks, 300);
        assert!(poison.visible);
        assert!(victim.has_effect(EffectKind::Poison));
        assert!(!attacker.has_effect(EffectKind::Poison));
    }

    #[test]
    fn test_procs_roll_independently() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let sword = weapon(&registry, &[("lifesteal", 1), ("poison", 1)]);
        let mut attacker = SimPlayer::new("Alex");
        attacker.health = 10.0;
        let mut victim = SimPlayer::new("Steve");

        // Lifesteal misses (6 > 5), poison hits (8 <= 8)
        let outcome = procs.on_hit(Some(&sword), &mut attacker, Some(&mut victim), 4.0, &mut FixedRolls(vec![6, 8]));
        assert!(outcome.healed.is_none());
        assert!(outcome.poisoned.is_some());
    }

    #[test]
    fn test_no_procs_without_damage() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let sword = weapon(&registry, &[("lifesteal", 3), ("poison", 3)]);
        let mut attacker = SimPlayer::new("Alex");
        attacker.health = 10.0;
        let mut victim = SimPlayer::new("Steve");

        let outcome = procs.on_hit(Some(&sword), &mut attacker, Some(&mut victim), 0.0, &mut FixedRolls(vec![1, 1]));
        assert!(outcome.is_empty());
        assert!(!victim.has_effect(EffectKind::Poison));
    }

    #[test]
    fn test_poison_needs_living_victim() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let sword = weapon(&registry, &[("poison", 3)]);
        let mut attacker = SimPlayer::new("Alex");

        let outcome = procs.on_hit(Some(&sword), &mut attacker, None::<&mut SimPlayer>, 5.0, &mut FixedRolls(vec![1]));
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_empty_hand_never_procs() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        let mut attacker = SimPlayer::new("Alex");
        let mut victim = SimPlayer::new("Steve");
        let outcome = procs.on_hit(None::<&SimItem>, &mut attacker, Some(&mut victim), 5.0, &mut FixedRolls(vec![1, 1]));
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_oversized_lore_levels_saturate() {
        let registry = EnchantmentRegistry::with_defaults();
        let codec = LoreCodec::new(&registry);
        let config = ProcConfig::default();
        let procs = CombatProcs::new(&codec, &config, 20);

        // Lore is trusted past max_level: 43_000_000 and 1_000_000_000
        let lore = vec![
            format!("§r§2Poison {}", "M".repeat(43_000)),
            format!("§r§cLifesteal {}", "M".repeat(1_000_000)),
        ];
        let sword = SimItem::with_lore(ItemKind::DiamondSword, lore);
        let mut attacker = SimPlayer::new("Alex");
        attacker.health = 10.0;
        let mut victim = SimPlayer::new("Steve");

        let outcome = procs.on_hit(Some(&sword), &mut attacker, Some(&mut victim), 4.0, &mut FixedRolls(vec![100, 100]));

        assert_eq!(attacker.health, 20.0);
        assert_eq!(outcome.healed, Some(10.0));
        let poison = outcome.poisoned.unwrap();
        assert_eq!(poison.amplifier, 42_999_999);
        assert_eq!(poison.duration_ticks, u32::MAX);
    }

    #[test]
    fn test_rng_rolls_in_range() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let roll = rng.roll_percent();
            assert!((1..=100).contains(&roll));
        }
    }
}
