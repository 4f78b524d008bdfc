//! Service lifecycle
//!
//! [`EnchantService`] owns everything the enchantment system needs at
//! runtime: configuration, the shared registry and the effect reconciler.
//! The host creates one with [`EnchantService::start`], forwards server
//! events to it (ticks, quits, damage, commands) and calls
//! [`EnchantService::shutdown`] when it is done.

use std::path::Path;
use std::sync::Arc;

use enchants_types::EnchantsConfig;

use crate::command::{self, CommandError, CommandSender, EnchantApplied, EnchantArgs};
use crate::effects::{CombatProcs, EffectReconciler, PercentRoll, ProcOutcome, TickReport};
use crate::host::{EffectHost, GameServer, Living, PlayerView};
use crate::lore::LoreCodec;
use crate::registry::{self, EnchantmentRegistry};

#[derive(Debug)]
pub struct EnchantService {
    config: EnchantsConfig,
    registry: Arc<EnchantmentRegistry>,
    reconciler: EffectReconciler,
    /// Server ticks observed since start
    ticks: u64,
    running: bool,
}

impl EnchantService {
    /// Build the registry (built-ins, then the configured definitions dir,
    /// then the user definitions dir) and start the service.
    pub fn start(config: EnchantsConfig) -> Self {
        let mut registry = EnchantmentRegistry::with_defaults();

        if let Some(dir) = config.definitions_dir.as_deref() {
            load_dir(&mut registry, Path::new(dir));
        }
        if let Some(dir) = registry::config::default_custom_dir().filter(|d| d.is_dir()) {
            load_dir(&mut registry, &dir);
        }

        Self::with_registry(config, registry)
    }

    /// Start with a registry built by the caller
    pub fn with_registry(config: EnchantsConfig, registry: EnchantmentRegistry) -> Self {
        let registry = Arc::new(registry);
        let reconciler = EffectReconciler::new(Arc::clone(&registry), config.reconciler);
        tracing::info!(
            enchantments = registry.len(),
            interval_ticks = config.reconciler.interval_ticks,
            "Custom enchantments enabled"
        );
        Self {
            config,
            registry,
            reconciler,
            ticks: 0,
            running: true,
        }
    }

    pub fn config(&self) -> &EnchantsConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<EnchantmentRegistry> {
        &self.registry
    }

    pub fn codec(&self) -> LoreCodec<'_> {
        LoreCodec::new(&self.registry)
    }

    pub fn reconciler(&self) -> &EffectReconciler {
        &self.reconciler
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed one server tick. Runs a reconciliation pass every
    /// `interval_ticks` ticks and returns its report.
    pub fn on_server_tick<S: GameServer>(&mut self, server: &mut S) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        self.ticks += 1;
        let interval = u64::from(self.config.reconciler.interval_ticks.max(1));
        (self.ticks % interval == 0).then(|| self.reconcile(server))
    }

    /// Run a reconciliation pass over every online player now
    pub fn reconcile<S: GameServer>(&mut self, server: &mut S) -> TickReport {
        self.reconciler.tick(server.online_players_mut())
    }

    pub fn on_player_quit(&mut self, name: &str) {
        self.reconciler.forget_player(name);
    }

    /// Roll on-hit procs for `attacker`'s held item.
    ///
    /// `victim` is `None` when the damaged entity is not living.
    pub fn on_damage<A, V>(
        &self,
        attacker: &mut A,
        victim: Option<&mut V>,
        final_damage: f32,
        rng: &mut impl PercentRoll,
    ) -> ProcOutcome
    where
        A: PlayerView + Living,
        A::Item: Clone,
        V: EffectHost,
    {
        if !self.running {
            return ProcOutcome::default();
        }
        let weapon = attacker.held_item().cloned();
        let codec = self.codec();
        let procs = CombatProcs::new(&codec, &self.config.procs, self.config.ticks_per_second);
        procs.on_hit(weapon.as_ref(), attacker, victim, final_damage, rng)
    }

    /// Run `customenchant` with the given arguments.
    ///
    /// Player senders get the result (or rejection) as a chat message; the
    /// target is told separately when it is someone else.
    pub fn handle_command<S, A>(
        &self,
        server: &mut S,
        sender: &CommandSender,
        args: &[A],
    ) -> Result<EnchantApplied, CommandError>
    where
        S: GameServer,
        A: AsRef<str>,
    {
        let result = self.execute_command(server, sender, args);
        match (&result, sender.player_name()) {
            (Ok(applied), sender_name) => {
                if let Some(name) = sender_name {
                    server.send_message(name, &applied.sender_message());
                }
                if sender_name.is_none_or(|name| !name.eq_ignore_ascii_case(&applied.target)) {
                    server.send_message(&applied.target, &applied.target_message());
                }
                tracing::info!(
                    target_player = %applied.target,
                    enchantment = %applied.enchantment_id,
                    level = applied.level,
                    "Enchantment applied"
                );
            }
            (Err(err), Some(name)) => server.send_message(name, &err.to_string()),
            (Err(err), None) => tracing::debug!(error = %err, "Command rejected"),
        }
        result
    }

    fn execute_command<S, A>(
        &self,
        server: &mut S,
        sender: &CommandSender,
        args: &[A],
    ) -> Result<EnchantApplied, CommandError>
    where
        S: GameServer,
        A: AsRef<str>,
    {
        if !sender.has_permission(&self.config.command) {
            return Err(CommandError::NoPermission);
        }
        let args = EnchantArgs::parse(args)?;

        let target = match (&args.target, sender.player_name()) {
            (Some(prefix), _) => server
                .resolve_player(prefix)
                .ok_or_else(|| CommandError::PlayerNotFound(prefix.clone()))?,
            (None, Some(name)) => name.to_string(),
            (None, None) => return Err(CommandError::NoTarget),
        };
        let player = server
            .player_mut(&target)
            .ok_or_else(|| CommandError::PlayerNotFound(target.clone()))?;

        command::enchant_held_item(
            &self.registry,
            &self.codec(),
            player,
            &args.enchantment_id,
            args.level,
        )
    }

    /// Stop reacting to events. Tracked effect state is kept so a report
    /// can still be read afterwards.
    pub fn shutdown(&mut self) {
        if self.running {
            self.running = false;
            tracing::info!(passes = self.reconciler.passes(), "Custom enchantments disabled");
        }
    }
}

fn load_dir(registry: &mut EnchantmentRegistry, dir: &Path) {
    if let Err(e) = registry::load_definitions(registry, dir) {
        tracing::warn!(error = %e, "Failed to load enchantment definitions");
    }
}
