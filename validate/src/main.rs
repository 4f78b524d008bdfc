//! Offline validator for enchantment definition files, lore lines and
//! service config files.
//!
//! ```text
//! enchants-validate definitions ./defs
//! enchants-validate lore "§r§eHaste II" "Speed Boost I" --definitions ./defs
//! enchants-validate config ~/.config/custom-enchants/config.toml
//! ```

mod checks;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use enchants_core::logging;
use enchants_core::registry::{self, EnchantmentRegistry};
use enchants_types::EnchantsConfig;
use enchants_types::formatting::to_roman;
use enchants_types::text::{clean, to_ansi};
use serde::Serialize;

use checks::{LineReport, NameCollision};

#[derive(Parser)]
#[command(version, about = "Validate custom enchantment definitions and lore")]
struct Cli {
    /// Print the report as TOML instead of text
    #[arg(long, global = true)]
    toml: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check definition files or directories of them
    Definitions {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Decode lore lines against the built-in (and optional extra) definitions
    Lore {
        #[arg(required = true)]
        lines: Vec<String>,
        #[arg(short, long)]
        definitions: Option<PathBuf>,
    },
    /// Check a service config file
    Config { path: PathBuf },
}

#[derive(Debug, Default, Serialize)]
struct DefinitionsReport {
    files: Vec<FileReport>,
    collisions: Vec<NameCollision>,
}

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    registered: Vec<String>,
    duplicates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoreReport {
    lines: Vec<LineReport>,
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    warnings: Vec<String>,
    config: EnchantsConfig,
}

fn main() -> ExitCode {
    logging::init_logging(tracing::Level::WARN);

    let cli = Cli::parse();
    let color = atty::is(atty::Stream::Stdout);

    let ok = match cli.command {
        Command::Definitions { paths } => run_definitions(&paths, cli.toml),
        Command::Lore { lines, definitions } => run_lore(&lines, definitions.as_deref(), cli.toml, color),
        Command::Config { path } => run_config(&path, cli.toml),
    };

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

// ─────────────────────────────────────────────────────────────────────────────
// Definitions
// ─────────────────────────────────────────────────────────────────────────────

fn run_definitions(paths: &[PathBuf], as_toml: bool) -> bool {
    let mut registry = EnchantmentRegistry::with_defaults();
    let mut report = DefinitionsReport::default();

    for file in expand_paths(paths) {
        let entry = match registry::load_file(&file) {
            Ok(config) => {
                let ids: Vec<String> = config.enchantments.iter().map(|d| d.id.to_lowercase()).collect();
                let duplicates = registry.register_config(config);
                FileReport {
                    path: file.display().to_string(),
                    registered: ids.into_iter().filter(|id| !duplicates.contains(id)).collect(),
                    duplicates,
                    error: None,
                }
            }
            Err(e) => FileReport {
                path: file.display().to_string(),
                registered: Vec::new(),
                duplicates: Vec::new(),
                error: Some(e.to_string()),
            },
        };
        report.files.push(entry);
    }
    report.collisions = checks::name_collisions(&registry);

    let ok = report
        .files
        .iter()
        .all(|f| f.error.is_none() && f.duplicates.is_empty());

    if as_toml {
        print_toml(&report);
        return ok;
    }

    for file in &report.files {
        match &file.error {
            Some(error) => println!("✗ {error}"),
            None => println!("✓ {} ({} registered)", file.path, file.registered.len()),
        }
        for id in &file.duplicates {
            println!("  ✗ duplicate id '{id}' skipped");
        }
    }
    for c in &report.collisions {
        println!(
            "⚠ '{}' is contained in '{}': applying {} also removes {} lines",
            c.shorter, c.longer, c.shorter, c.longer
        );
    }
    println!("{} enchantments total", registry.len());
    ok
}

/// Directories expand to their `*.toml` files in name order
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        match std::fs::read_dir(path) {
            Ok(entries) => {
                let mut found: Vec<PathBuf> = entries
                    .flatten()
                    .map(|e| e.path())
                    .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
                    .collect();
                found.sort();
                files.extend(found);
            }
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to read directory"),
        }
    }
    files
}

// ─────────────────────────────────────────────────────────────────────────────
// Lore
// ─────────────────────────────────────────────────────────────────────────────

fn run_lore(lines: &[String], definitions: Option<&Path>, as_toml: bool, color: bool) -> bool {
    let mut registry = EnchantmentRegistry::with_defaults();
    if let Some(dir) = definitions {
        if let Err(e) = registry::load_definitions(&mut registry, dir) {
            tracing::error!(error = %e, "Failed to load definitions");
            return false;
        }
    }

    let report = LoreReport {
        lines: checks::decode_lines(&registry, lines),
    };
    if as_toml {
        print_toml(&report);
        return true;
    }

    for line in &report.lines {
        let shown = if color { to_ansi(&line.line) } else { clean(&line.line) };
        println!("{shown}");
        if line.matches.is_empty() {
            println!("  (no enchantment)");
        }
        for (id, level) in &line.matches {
            let max = registry.lookup(id).map(|d| d.max_level).unwrap_or(0);
            let marker = if *level > max { "  ⚠ above max level" } else { "" };
            println!("  {id} {} ({level}){marker}", to_roman(i64::from(*level)));
        }
    }
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

fn run_config(path: &Path, as_toml: bool) -> bool {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read config");
            return false;
        }
    };
    let config: EnchantsConfig = match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            println!("✗ {}: {e}", path.display());
            return false;
        }
    };

    let report = ConfigReport {
        warnings: checks::config_warnings(&config),
        config,
    };
    if as_toml {
        print_toml(&report);
    } else {
        println!("✓ {}", path.display());
        for warning in &report.warnings {
            println!("  ⚠ {warning}");
        }
    }
    report.warnings.is_empty()
}

fn print_toml<T: Serialize>(value: &T) {
    match toml::to_string_pretty(value) {
        Ok(text) => print!("{text}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize report"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_paths_sorts_toml_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.toml"), "").unwrap();
        fs::write(dir.path().join("a.toml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let single = dir.path().join("single.cfg");

        let files = expand_paths(&[dir.path().to_path_buf(), single.clone()]);
        assert_eq!(
            files,
            vec![dir.path().join("a.toml"), dir.path().join("b.toml"), single]
        );
    }

    #[test]
    fn test_run_definitions_flags_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("dupe.toml"),
            r#"
[[enchantment]]
id = "haste"
name = "Quick Hands"
max_level = 1
applies_to = ["pickaxe"]
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("frost.toml"),
            r#"
[[enchantment]]
id = "frost"
name = "Frost"
max_level = 2
applies_to = ["sword"]
"#,
        )
        .unwrap();

        assert!(!run_definitions(&[dir.path().to_path_buf()], true));
        fs::remove_file(dir.path().join("dupe.toml")).unwrap();
        assert!(run_definitions(&[dir.path().to_path_buf()], true));
    }

    #[test]
    fn test_run_config_warns_on_short_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[reconciler]\ninterval_ticks = 20\neffect_duration_ticks = 10\n").unwrap();
        assert!(!run_config(&path, false));

        fs::write(&path, "ticks_per_second = 20\n").unwrap();
        assert!(run_config(&path, false));
    }
}
