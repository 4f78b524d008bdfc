use crate::host::GameServer;

use super::player::SimPlayer;

/// In-memory stand-in for the game server: online players and a tick clock
#[derive(Debug, Clone, Default)]
pub struct SimServer {
    players: Vec<SimPlayer>,
    current_tick: u64,
}

impl SimServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring a player online. Returns false if the name is already taken.
    pub fn join(&mut self, name: &str) -> bool {
        if self.player(name).is_some() {
            return false;
        }
        self.players.push(SimPlayer::new(name));
        true
    }

    /// Take a player offline, returning their final state
    pub fn quit(&mut self, name: &str) -> Option<SimPlayer> {
        let idx = self.players.iter().position(|p| p.name.eq_ignore_ascii_case(name))?;
        Some(self.players.remove(idx))
    }

    /// Exact, case-insensitive lookup
    pub fn player(&self, name: &str) -> Option<&SimPlayer> {
        self.players.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut SimPlayer> {
        self.players.iter_mut().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a possibly abbreviated name.
    ///
    /// An exact match wins; otherwise the shortest name starting with the
    /// prefix (case-insensitive).
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&SimPlayer> {
        if let Some(exact) = self.player(prefix) {
            return Some(exact);
        }
        let prefix = prefix.to_lowercase();
        self.players
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&prefix))
            .min_by_key(|p| p.name.len())
    }

    pub fn online(&self) -> impl Iterator<Item = &SimPlayer> {
        self.players.iter()
    }

    pub fn online_count(&self) -> usize {
        self.players.len()
    }

    /// Two distinct players at once, e.g. attacker and victim
    pub fn pair_mut(&mut self, a: &str, b: &str) -> Option<(&mut SimPlayer, &mut SimPlayer)> {
        let ia = self.players.iter().position(|p| p.name.eq_ignore_ascii_case(a))?;
        let ib = self.players.iter().position(|p| p.name.eq_ignore_ascii_case(b))?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.players.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.players.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// Advance the clock one tick, counting down every player's effects
    pub fn advance_tick(&mut self) -> u64 {
        self.current_tick += 1;
        for player in &mut self.players {
            player.advance(1);
        }
        self.current_tick
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }
}

impl GameServer for SimServer {
    type Player = SimPlayer;

    fn online_players_mut(&mut self) -> impl Iterator<Item = &mut SimPlayer> {
        self.players.iter_mut()
    }

    fn player_mut(&mut self, name: &str) -> Option<&mut SimPlayer> {
        SimServer::player_mut(self, name)
    }

    fn resolve_player(&self, prefix: &str) -> Option<String> {
        self.find_by_prefix(prefix).map(|p| p.name.clone())
    }

    fn send_message(&mut self, name: &str, message: &str) {
        if let Some(player) = SimServer::player_mut(self, name) {
            player.send_message(message);
        }
    }
}
