//! Arctic Apex - a top-down arctic survival arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, drops, progression)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input capture and menu wiring live outside this crate: they
//! feed a [`sim::TickInput`] in and read a [`sim::Snapshot`] plus drained
//! [`sim::GameEvent`]s back out.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate the frame-count timers below are tuned for
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PLAYER_HP: f32 = 200.0;
    pub const PLAYER_SPEED: f32 = 5.5;
    pub const PLAYER_DAMAGE: f32 = 35.0;
    /// Ticks between attacks
    pub const ATTACK_COOLDOWN_TICKS: u32 = 20;
    /// Ticks the attack animation counter stays up after a swing
    pub const ATTACK_ACTIVE_TICKS: u32 = 10;
    /// Distance from player center to the swing's hit point
    pub const ATTACK_REACH: f32 = 50.0;
    /// Radius of the swing's point-radius hit test
    pub const ATTACK_HIT_RADIUS: f32 = 70.0;
    /// Velocity retained per tick (multiplicative drag)
    pub const PLAYER_DRAG: f32 = 0.82;
    /// Fraction of speed added to velocity per input tick
    pub const ACCEL_FACTOR: f32 = 0.25;
    /// Below this speed the facing angle holds steady
    pub const FACING_DEADZONE: f32 = 0.2;

    /// Enemy defaults (scaled by tier, see `Enemy::spawn`)
    pub const ENEMY_BASE_RADIUS: f32 = 22.0;
    pub const ENEMY_BASE_HP: f32 = 60.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_BASE_DAMAGE: f32 = 5.0;
    /// Extra reach beyond the enemy body for contact attacks
    pub const ENEMY_CONTACT_SLACK: f32 = 10.0;
    /// Ticks between contact attacks (1 second)
    pub const ENEMY_ATTACK_COOLDOWN_TICKS: u32 = 60;
    /// Ticks the hit flash counter stays up after taking damage
    pub const ENEMY_FLASH_TICKS: u32 = 5;
    /// Offset from the player at which wave enemies appear
    pub const ENEMY_SPAWN_OFFSET: f32 = 500.0;

    /// Meat drop defaults
    pub const DROP_LIFETIME_TICKS: u32 = 600;
    pub const DROP_PICKUP_RADIUS: f32 = 30.0;
    pub const DROP_MAGNET_RADIUS: f32 = 150.0;
    /// Fraction of the remaining distance closed per magnetized tick
    pub const DROP_MAGNET_EASE: f32 = 0.15;
    /// Drops spawned per enemy kill
    pub const DROPS_PER_KILL: u32 = 4;

    /// Machine defaults
    pub const MACHINE_INTERACT_RADIUS: f32 = 100.0;
    /// Ticks per meat-to-money conversion
    pub const MACHINE_SPEED_TICKS: u32 = 50;
    /// Money per converted meat
    pub const MACHINE_VALUE: u64 = 15;
    pub const MEAT_CAP: u32 = 12;

    /// Progression defaults
    pub const MAX_STAGES: u32 = 5;
    pub const KILLS_FOR_FIRST_STAGE: u32 = 5;
    /// Kill quota increase per cleared stage
    pub const KILLS_PER_STAGE_STEP: u32 = 2;
    /// Enemies per wave = WAVE_BASE_COUNT + stage
    pub const WAVE_BASE_COUNT: u32 = 2;
}

/// Unit vector pointing along `angle`
#[inline]
pub fn angle_to_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Exponential ease toward a target: closes `factor` of the gap per call
#[inline]
pub fn ease_toward(pos: Vec2, target: Vec2, factor: f32) -> Vec2 {
    pos + (target - pos) * factor
}
