//! Shared REPL state: the simulated server and the enchantment service
//! running on it.

use enchants_core::command::CommandSender;
use enchants_core::LoreCodec;
use enchants_core::host::Living;
use enchants_core::sim::{ItemKind, SimItem, SimPlayer, SimServer};
use enchants_core::{EnchantService, ProcOutcome, TickReport};
use enchants_types::EnchantsConfig;
use enchants_types::text::to_ansi;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;

pub struct SimState {
    pub server: SimServer,
    pub service: EnchantService,
    pub rng: StdRng,
    pub ticker_task: Option<JoinHandle<()>>,
}

impl SimState {
    pub fn new(config: EnchantsConfig) -> Self {
        Self::with_service(EnchantService::start(config))
    }

    pub fn with_service(service: EnchantService) -> Self {
        Self {
            server: SimServer::new(),
            service,
            rng: StdRng::from_entropy(),
            ticker_task: None,
        }
    }

    /// Advance the simulated clock by one tick
    pub fn tick_once(&mut self) -> Option<TickReport> {
        self.server.advance_tick();
        let report = self.service.on_server_tick(&mut self.server)?;
        for op in &report.ops {
            tracing::debug!(pass = report.pass, ?op, "Effect update");
        }
        Some(report)
    }

    pub fn join(&mut self, name: &str) -> Result<String, String> {
        if !self.server.join(name) {
            return Err(format!("{name} is already online"));
        }
        Ok(format!("{name} joined"))
    }

    pub fn quit(&mut self, name: &str) -> Result<String, String> {
        let player = self.server.quit(name).ok_or_else(|| not_online(name))?;
        self.service.on_player_quit(&player.name);
        Ok(format!("{} left", player.name))
    }

    /// Put a new item in the player's hand, replacing whatever was there
    pub fn give(&mut self, name: &str, item: &str, lore: &[String]) -> Result<String, String> {
        let kind = item.parse::<ItemKind>().map_err(|e| e.to_string())?;
        let player = self.player_mut(name)?;
        player.held = Some(SimItem::with_lore(kind, lore.to_vec()));
        Ok(format!("{} now holds {kind}", player.name))
    }

    /// Wear an armor piece. Only the item in hand can be moved to armor.
    pub fn wear(&mut self, name: &str) -> Result<String, String> {
        let player = self.player_mut(name)?;
        let item = player
            .held
            .take()
            .ok_or_else(|| format!("{} is not holding anything", player.name))?;
        if !item.kind.is_armor() {
            let kind = item.kind;
            player.held = Some(item);
            return Err(format!("{kind} is not armor"));
        }
        let kind = item.kind;
        player.armor.push(item);
        Ok(format!("{} now wears {kind}", player.name))
    }

    pub fn strip(&mut self, name: &str) -> Result<String, String> {
        let player = self.player_mut(name)?;
        let count = player.armor.len();
        player.armor.clear();
        Ok(format!("Removed {count} armor piece(s) from {}", player.name))
    }

    pub fn unequip(&mut self, name: &str) -> Result<String, String> {
        let player = self.player_mut(name)?;
        match player.held.take() {
            Some(item) => Ok(format!("{} put away {}", player.name, item.kind)),
            None => Ok(format!("{} was not holding anything", player.name)),
        }
    }

    /// Run `customenchant`, as the console or as the named player
    pub fn enchant(&mut self, sender: Option<&str>, args: &[String]) -> Result<String, String> {
        let sender = match sender {
            Some(name) => CommandSender::Player(self.player_mut(name)?.name.clone()),
            None => CommandSender::Console,
        };
        self.service
            .handle_command(&mut self.server, &sender, args)
            .map(|applied| applied.sender_message())
            .map_err(|e| e.to_string())
    }

    /// `attacker` hits `victim` (or a non-living target) for `damage`
    pub fn hit(&mut self, attacker: &str, victim: Option<&str>, damage: f32) -> Result<String, String> {
        let outcome = match victim {
            Some(victim) => {
                let (attacker, victim) = self
                    .server
                    .pair_mut(attacker, victim)
                    .ok_or_else(|| "Attacker and victim must be two different online players".to_string())?;
                victim.set_health(victim.health() - damage);
                self.service
                    .on_damage(attacker, Some(victim), damage, &mut self.rng)
            }
            None => {
                let attacker = self
                    .server
                    .player_mut(attacker)
                    .ok_or_else(|| not_online(attacker))?;
                self.service
                    .on_damage(attacker, None::<&mut SimPlayer>, damage, &mut self.rng)
            }
        };
        Ok(describe_outcome(&outcome))
    }

    /// Multi-line description of a player's equipment and effects
    pub fn inspect(&self, name: &str) -> Result<String, String> {
        let player = self.server.player(name).ok_or_else(|| not_online(name))?;
        let codec = self.service.codec();
        let mut out = format!(
            "{} ({:.1}/{:.1} health)\n",
            player.name, player.health, player.max_health
        );

        match &player.held {
            Some(item) => describe_item(&mut out, &codec, "hand", item),
            None => out.push_str("  hand: empty\n"),
        }
        for item in &player.armor {
            describe_item(&mut out, &codec, "armor", item);
        }

        if player.effects.is_empty() {
            out.push_str("  effects: none\n");
        }
        for effect in player.effects.values() {
            out.push_str(&format!(
                "  effect: {} amplifier {} ({} ticks left{})\n",
                effect.kind,
                effect.amplifier,
                effect.duration_ticks,
                if effect.visible { ", visible" } else { "" }
            ));
        }
        for message in &player.inbox {
            out.push_str(&format!("  message: {message}\n"));
        }
        Ok(out)
    }

    fn player_mut(&mut self, name: &str) -> Result<&mut SimPlayer, String> {
        self.server.player_mut(name).ok_or_else(|| not_online(name))
    }
}

fn not_online(name: &str) -> String {
    format!("{name} is not online")
}

fn describe_item(out: &mut String, codec: &LoreCodec<'_>, slot: &str, item: &SimItem) {
    out.push_str(&format!("  {slot}: {}\n", item.kind));
    for line in &item.lore {
        out.push_str(&format!("    | {}\n", to_ansi(line)));
    }
    for (id, level) in codec.extract_all(&item.lore).iter() {
        out.push_str(&format!("    + {id} {level}\n"));
    }
}

fn describe_outcome(outcome: &ProcOutcome) -> String {
    if outcome.is_empty() {
        return "No procs".to_string();
    }
    let mut parts = Vec::new();
    if let Some(healed) = outcome.healed {
        parts.push(format!("lifesteal healed {healed:.1}"));
    }
    if let Some(poison) = outcome.poisoned {
        parts.push(format!(
            "poison amplifier {} for {} ticks",
            poison.amplifier, poison.duration_ticks
        ));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use enchants_core::host::EffectHost;
    use enchants_core::{EffectKind, EnchantmentRegistry};

    fn state() -> SimState {
        let service = EnchantService::with_registry(EnchantsConfig::default(), EnchantmentRegistry::with_defaults());
        let mut state = SimState::with_service(service);
        state.rng = StdRng::seed_from_u64(7);
        state
    }

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_enchant_then_tick_applies_haste() {
        let mut state = state();
        state.join("Alex").unwrap();
        state.give("Alex", "iron_pickaxe", &[]).unwrap();
        let msg = state.enchant(None, &args(&["haste", "2", "Alex"])).unwrap();
        assert_eq!(msg, "Applied Haste II to Alex's item.");

        let reports: Vec<_> = (0..20).filter_map(|_| state.tick_once()).collect();
        assert_eq!(reports.len(), 1);

        let alex = state.server.player("Alex").unwrap();
        let haste = alex.effect(EffectKind::Haste).unwrap();
        assert_eq!(haste.amplifier, 1);
        assert!(!haste.visible);
    }

    #[test]
    fn test_wear_boots_and_strip() {
        let mut state = state();
        state.join("Alex").unwrap();
        state.give("Alex", "iron_boots", &[]).unwrap();
        state.enchant(None, &args(&["speedboost", "1", "Alex"])).unwrap();
        state.wear("Alex").unwrap();
        assert!(state.server.player("Alex").unwrap().held.is_none());

        for _ in 0..20 {
            state.tick_once();
        }
        assert!(state.server.player("Alex").unwrap().has_effect(EffectKind::Speed));

        state.strip("Alex").unwrap();
        let report = (0..20).filter_map(|_| state.tick_once()).last().unwrap();
        assert_eq!(report.removals().count(), 1);
        assert!(!state.server.player("Alex").unwrap().has_effect(EffectKind::Speed));
    }

    #[test]
    fn test_wear_rejects_non_armor() {
        let mut state = state();
        state.join("Alex").unwrap();
        state.give("Alex", "stick", &[]).unwrap();
        assert_eq!(state.wear("Alex"), Err("stick is not armor".to_string()));
        assert!(state.server.player("Alex").unwrap().held.is_some());
    }

    #[test]
    fn test_quit_forgets_player() {
        let mut state = state();
        state.join("Alex").unwrap();
        state.give("Alex", "iron_axe", &[]).unwrap();
        state.enchant(None, &args(&["haste", "1", "Alex"])).unwrap();
        for _ in 0..20 {
            state.tick_once();
        }
        assert_eq!(state.service.reconciler().tracked_players(), 1);

        state.quit("Alex").unwrap();
        assert_eq!(state.service.reconciler().tracked_players(), 0);
        assert!(state.quit("Alex").is_err());
    }

    #[test]
    fn test_hit_requires_two_players() {
        let mut state = state();
        state.join("Alex").unwrap();
        assert!(state.hit("Alex", Some("Alex"), 4.0).is_err());
        assert_eq!(state.hit("Alex", None, 4.0), Ok("No procs".to_string()));
    }

    #[test]
    fn test_inspect_lists_decoded_enchantments() {
        let mut state = state();
        state.join("Alex").unwrap();
        state
            .give("Alex", "diamond_sword", &["Family heirloom".to_string()])
            .unwrap();
        state.enchant(None, &args(&["poison", "3", "Alex"])).unwrap();

        let out = state.inspect("Alex").unwrap();
        assert!(out.contains("hand: diamond_sword"));
        assert!(out.contains("+ poison 3"));
        assert!(out.contains("message: Your item received Poison III!"));
    }
}
