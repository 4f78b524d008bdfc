use crate::state::SimState;
use crate::ticker;
use enchants_core::settings;
use enchants_types::text::to_ansi;
use std::sync::Arc;
use tokio::sync::RwLock;

fn report(result: Result<String, String>) {
    match result {
        Ok(msg) => println!("{msg}"),
        Err(err) => println!("Error: {err}"),
    }
}

pub async fn join(name: &str, state: Arc<RwLock<SimState>>) {
    report(state.write().await.join(name));
}

pub async fn quit(name: &str, state: Arc<RwLock<SimState>>) {
    report(state.write().await.quit(name));
}

pub async fn give(player: &str, item: &str, lore: &[String], state: Arc<RwLock<SimState>>) {
    report(state.write().await.give(player, item, lore));
}

pub async fn wear(player: &str, state: Arc<RwLock<SimState>>) {
    report(state.write().await.wear(player));
}

pub async fn strip(player: &str, state: Arc<RwLock<SimState>>) {
    report(state.write().await.strip(player));
}

pub async fn unequip(player: &str, state: Arc<RwLock<SimState>>) {
    report(state.write().await.unequip(player));
}

pub async fn enchant(sender: Option<&str>, args: &[String], state: Arc<RwLock<SimState>>) {
    report(state.write().await.enchant(sender, args));
}

pub async fn hit(attacker: &str, victim: Option<&str>, damage: f32, state: Arc<RwLock<SimState>>) {
    report(state.write().await.hit(attacker, victim, damage));
}

/// Advance the clock manually, printing every reconciliation pass
pub async fn tick(count: u32, state: Arc<RwLock<SimState>>) {
    let mut s = state.write().await;
    for _ in 0..count {
        let Some(report) = s.tick_once() else {
            continue;
        };
        println!("Pass {} over {} player(s)", report.pass, report.players);
        for (player, effect) in report.adds() {
            println!("  + {player}: {} amplifier {}", effect.kind, effect.amplifier);
        }
        for (player, kind) in report.removals() {
            println!("  - {player}: {kind}");
        }
    }
    println!("Now at tick {}", s.server.current_tick());
}

pub async fn inspect(player: &str, state: Arc<RwLock<SimState>>) {
    match state.read().await.inspect(player) {
        Ok(out) => print!("{out}"),
        Err(err) => println!("Error: {err}"),
    }
}

pub async fn list(state: Arc<RwLock<SimState>>) {
    let s = state.read().await;
    let registry = s.service.registry();
    for id in registry.sorted_ids() {
        let Some(def) = registry.lookup(id) else {
            continue;
        };
        let tags: Vec<&str> = def.applicable_tags.iter().map(|t| t.as_str()).collect();
        println!(
            "{:<12} {} (max {}) [{}]",
            id,
            to_ansi(&format!("{}{}", def.color.marker(), def.display_name)),
            def.max_level,
            tags.join(", ")
        );
    }
    println!("Online: {}", s.server.online().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", "));
}

pub async fn show_settings(state: Arc<RwLock<SimState>>) {
    let s = state.read().await;
    let config = s.service.config();
    if let Some(path) = settings::config_path() {
        println!("Config file: {}", path.display());
    }
    println!("Ticks per second: {}", config.ticks_per_second);
    println!(
        "Reconcile every {} ticks, effect duration {} ticks",
        config.reconciler.interval_ticks,
        config.reconciler.effective_duration_ticks()
    );
    println!("Operators: {}", config.command.operators.join(", "));
    println!(
        "Background ticker: {}",
        if s.ticker_task.is_some() { "running" } else { "stopped" }
    );
}

pub async fn start_ticker(state: Arc<RwLock<SimState>>) {
    let ticks_per_second = {
        let s = state.read().await;
        if s.ticker_task.is_some() {
            println!("Ticker already running");
            return;
        }
        s.service.config().ticks_per_second
    };
    let handle = ticker::spawn_ticker(Arc::clone(&state), ticks_per_second);
    state.write().await.ticker_task = Some(handle);
    println!("Ticker started at {ticks_per_second} ticks/s");
}

pub async fn stop_ticker(state: Arc<RwLock<SimState>>) {
    match state.write().await.ticker_task.take() {
        Some(handle) => {
            handle.abort();
            println!("Ticker stopped");
        }
        None => println!("Ticker not running"),
    }
}

pub async fn exit(state: Arc<RwLock<SimState>>) {
    let mut s = state.write().await;
    if let Some(handle) = s.ticker_task.take() {
        handle.abort();
    }
    s.service.shutdown();
}
