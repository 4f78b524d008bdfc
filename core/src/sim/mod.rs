//! In-memory host
//!
//! A small simulated server implementing the [`crate::host`] traits. The CLI
//! drives it interactively and the tests use it as their host.

mod item;
mod player;
mod server;

pub use item::{ItemKind, SimItem, UnknownItemKind};
pub use player::{DEFAULT_MAX_HEALTH, SimPlayer};
pub use server::SimServer;
