use clap::{Parser, Subcommand};
use enchants_cli::commands;
use enchants_cli::readline;
use enchants_cli::state::SimState;
use enchants_core::{logging, settings};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init_logging(tracing::Level::INFO);

    let config = settings::load_config();
    let state = Arc::new(RwLock::new(SimState::new(config)));

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Custom enchantments on a simulated server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring a player online
    Join { name: String },
    /// Take a player offline
    Quit { name: String },
    /// Put a new item in a player's hand
    Give {
        player: String,
        item: String,
        /// Extra lore lines
        #[arg(short, long)]
        lore: Vec<String>,
    },
    /// Move the held item to the armor slots
    Wear { player: String },
    /// Remove all worn armor
    Strip { player: String },
    /// Empty a player's hand
    Unequip { player: String },
    /// customenchant <enchantId> <level> [targetPlayer]
    #[command(visible_alias = "customenchant")]
    Enchant {
        /// Run as this player instead of the console
        #[arg(long = "as")]
        sender: Option<String>,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// An attacker hits a victim, rolling combat procs
    Hit {
        attacker: String,
        victim: Option<String>,
        #[arg(short, long, default_value_t = 4.0)]
        damage: f32,
    },
    /// Advance the clock manually
    Tick {
        #[arg(default_value_t = 20)]
        count: u32,
    },
    /// Start or stop the real-time background ticker
    Ticker {
        #[arg(long)]
        stop: bool,
    },
    Inspect { player: String },
    List,
    Config,
    Exit,
}

async fn respond(line: &str, state: Arc<RwLock<SimState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "enchants".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Join { name }) => commands::join(name, Arc::clone(&state)).await,
        Some(Commands::Quit { name }) => commands::quit(name, Arc::clone(&state)).await,
        Some(Commands::Give { player, item, lore }) => {
            commands::give(player, item, lore, Arc::clone(&state)).await
        }
        Some(Commands::Wear { player }) => commands::wear(player, Arc::clone(&state)).await,
        Some(Commands::Strip { player }) => commands::strip(player, Arc::clone(&state)).await,
        Some(Commands::Unequip { player }) => commands::unequip(player, Arc::clone(&state)).await,
        Some(Commands::Enchant { sender, args }) => {
            commands::enchant(sender.as_deref(), args, Arc::clone(&state)).await
        }
        Some(Commands::Hit {
            attacker,
            victim,
            damage,
        }) => commands::hit(attacker, victim.as_deref(), *damage, Arc::clone(&state)).await,
        Some(Commands::Tick { count }) => commands::tick(*count, Arc::clone(&state)).await,
        Some(Commands::Ticker { stop }) => {
            if *stop {
                commands::stop_ticker(Arc::clone(&state)).await
            } else {
                commands::start_ticker(Arc::clone(&state)).await
            }
        }
        Some(Commands::Inspect { player }) => commands::inspect(player, Arc::clone(&state)).await,
        Some(Commands::List) => commands::list(Arc::clone(&state)).await,
        Some(Commands::Config) => commands::show_settings(Arc::clone(&state)).await,
        Some(Commands::Exit) => {
            commands::exit(state).await;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
