//! Combat resolution: the attack swing's point-radius sweep
//!
//! A swing projects a hit point out along the player's facing and damages
//! every enemy whose center falls inside the hit radius. One sweep per
//! successful attack, all qualifying targets at once, so a well-aimed swing
//! cleaves through a pack.

use glam::Vec2;

use super::state::Enemy;
use crate::angle_to_dir;
use crate::consts::{ATTACK_HIT_RADIUS, ATTACK_REACH};

/// Where a swing from `pos` facing `angle` lands
#[inline]
pub fn attack_hit_point(pos: Vec2, angle: f32) -> Vec2 {
    pos + angle_to_dir(angle) * ATTACK_REACH
}

/// A single enemy struck by a sweep
#[derive(Debug, Clone, Copy)]
pub struct HitReport {
    pub id: u32,
    pub pos: Vec2,
    /// True only if this damage killed the enemy
    pub died: bool,
}

/// Damage every live enemy within the hit radius of the swing's hit point
///
/// Each enemy is visited once, so a single sweep can never damage the same
/// target twice. Lethal hits flip the enemy's alive flag here; the caller
/// removes the bodies and spawns drops.
pub fn resolve_attack(
    pos: Vec2,
    angle: f32,
    damage: f32,
    enemies: &mut [Enemy],
) -> Vec<HitReport> {
    let hit_point = attack_hit_point(pos, angle);
    let mut hits = Vec::new();

    for enemy in enemies.iter_mut() {
        if !enemy.alive {
            continue;
        }
        if enemy.pos.distance(hit_point) < ATTACK_HIT_RADIUS {
            let died = enemy.take_damage(damage);
            hits.push(HitReport {
                id: enemy.id,
                pos: enemy.pos,
                died,
            });
        }
    }

    hits
}
