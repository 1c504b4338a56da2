//! Read-only view of the simulation for the rendering layer
//!
//! The renderer is a pure consumer: it gets positions, health fractions and
//! counters, never a mutable handle into the live state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};

/// One enemy as the renderer sees it
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub health_frac: f32,
    /// True while the hit flash counter is up
    pub flashing: bool,
}

/// Per-frame snapshot of everything the presentation layer draws
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player_pos: Vec2,
    pub player_angle: f32,
    pub player_health_frac: f32,
    /// True while the swing animation counter is up
    pub player_attacking: bool,
    pub enemies: Vec<EnemyView>,
    pub drop_positions: Vec<Vec2>,
    pub machine_pos: Vec2,
    pub machine_stored: u32,
    /// Progress toward the machine's next conversion, 0..1
    pub machine_progress: f32,
    pub money: u64,
    pub meat: u32,
    pub meat_cap: u32,
    pub stage: u32,
}

impl Snapshot {
    /// Capture the current frame's view
    pub fn capture(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            player_pos: state.player.pos,
            player_angle: state.player.angle,
            player_health_frac: state.player.health_frac(),
            player_attacking: state.player.attacking > 0,
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    radius: e.radius,
                    health_frac: e.health_frac(),
                    flashing: e.flash > 0,
                })
                .collect(),
            drop_positions: state.drops.iter().map(|d| d.pos).collect(),
            machine_pos: state.machine.pos,
            machine_stored: state.machine.stored,
            machine_progress: state.machine.progress_frac(state.tuning.machine_speed),
            money: state.progression.money,
            meat: state.progression.meat,
            meat_cap: state.tuning.meat_cap,
            stage: state.progression.stage,
        }
    }
}
