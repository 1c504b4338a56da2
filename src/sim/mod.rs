//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-count timers only (one tick = one frame at 60 Hz)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! The rendering layer reads a [`Snapshot`] and drains [`GameEvent`]s; it
//! never mutates simulation state directly.

pub mod combat;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use combat::{attack_hit_point, resolve_attack};
pub use snapshot::{EnemyView, Snapshot};
pub use state::{
    Enemy, GameEvent, GamePhase, GameState, Machine, MeatDrop, Player, Progression,
};
pub use tick::{TickInput, spawn_wave, tick};
pub use upgrades::{UpgradeKind, UpgradeShop};
