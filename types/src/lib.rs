//! Shared types for custom enchantments: configuration, item capability
//! tags, text formatting markers and level numerals.

pub mod config;
pub mod formatting;
pub mod item;
pub mod text;

pub use config::{CommandConfig, EnchantsConfig, ProcConfig, ReconcilerConfig};
pub use item::ItemTag;
pub use text::TextColor;
