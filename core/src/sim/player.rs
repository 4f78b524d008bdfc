use std::collections::BTreeMap;

use crate::host::{EffectHost, EffectInstance, EffectKind, HeldItemMut, Living, PlayerView};

use super::item::SimItem;

pub const DEFAULT_MAX_HEALTH: f32 = 20.0;

/// An online player in the simulated world
#[derive(Debug, Clone)]
pub struct SimPlayer {
    pub name: String,
    pub health: f32,
    pub max_health: f32,
    /// Primary hand
    pub held: Option<SimItem>,
    /// Worn armor pieces
    pub armor: Vec<SimItem>,
    /// Active effects with remaining duration
    pub effects: BTreeMap<EffectKind, EffectInstance>,
    /// Chat messages received, oldest first
    pub inbox: Vec<String>,
}

impl SimPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: DEFAULT_MAX_HEALTH,
            max_health: DEFAULT_MAX_HEALTH,
            held: None,
            armor: Vec::new(),
            effects: BTreeMap::new(),
            inbox: Vec::new(),
        }
    }

    pub fn effect(&self, kind: EffectKind) -> Option<&EffectInstance> {
        self.effects.get(&kind)
    }

    pub fn send_message(&mut self, message: impl Into<String>) {
        self.inbox.push(message.into());
    }

    /// Count down effect durations, dropping expired ones
    pub fn advance(&mut self, ticks: u32) {
        self.effects.retain(|_, effect| {
            effect.duration_ticks = effect.duration_ticks.saturating_sub(ticks);
            effect.duration_ticks > 0
        });
    }
}

impl PlayerView for SimPlayer {
    type Item = SimItem;

    fn name(&self) -> &str {
        &self.name
    }

    fn held_item(&self) -> Option<&SimItem> {
        self.held.as_ref()
    }

    fn armor(&self) -> impl Iterator<Item = &SimItem> {
        self.armor.iter()
    }
}

impl HeldItemMut for SimPlayer {
    fn held_item_mut(&mut self) -> Option<&mut SimItem> {
        self.held.as_mut()
    }
}

impl EffectHost for SimPlayer {
    fn add_effect(&mut self, effect: EffectInstance) {
        self.effects.insert(effect.kind, effect);
    }

    fn remove_effect(&mut self, kind: EffectKind) {
        self.effects.remove(&kind);
    }

    fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.contains_key(&kind)
    }
}

impl Living for SimPlayer {
    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_expire() {
        let mut player = SimPlayer::new("Alex");
        player.add_effect(EffectInstance::new(EffectKind::Haste, 0, 40, false));
        player.add_effect(EffectInstance::new(EffectKind::Speed, 1, 10, false));

        player.advance(20);
        assert!(player.has_effect(EffectKind::Haste));
        assert!(!player.has_effect(EffectKind::Speed));
        assert_eq!(player.effect(EffectKind::Haste).map(|e| e.duration_ticks), Some(20));

        player.advance(20);
        assert!(player.effects.is_empty());
    }

    #[test]
    fn test_add_effect_refreshes() {
        let mut player = SimPlayer::new("Alex");
        player.add_effect(EffectInstance::new(EffectKind::Haste, 0, 5, false));
        player.add_effect(EffectInstance::new(EffectKind::Haste, 2, 40, false));
        assert_eq!(player.effects.len(), 1);
        assert_eq!(player.effect(EffectKind::Haste).unwrap().amplifier, 2);
    }
}
