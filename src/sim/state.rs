//! Game state and core simulation types
//!
//! Everything needed to replay a run deterministically lives here. The
//! rendering layer never touches these types directly; it goes through
//! `Snapshot` and the drained event queue.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::upgrades::{UpgradeKind, UpgradeShop};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player health reached zero
    GameOver,
    /// All stages cleared
    Won,
}

impl GamePhase {
    /// Terminal phases never tick again
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// Simulation events for the presentation layer, drained once per frame
///
/// Replaces the original's direct DOM callbacks: the simulation emits,
/// the UI decides what a kill or a stage clear looks like.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An attack swing connected with an enemy
    EnemyHit { id: u32, damage: f32, pos: Vec2 },
    /// An enemy died (drops already spawned at `pos`)
    EnemyKilled { id: u32, pos: Vec2 },
    /// An enemy's contact attack landed
    PlayerHit { damage: f32 },
    /// The player collected a meat drop
    MeatPickedUp { held: u32 },
    /// Held meat was transferred into the machine
    MeatDeposited { amount: u32 },
    /// The machine converted one meat into money
    MeatConverted { value: u64 },
    /// A stage's kill quota was reached
    StageComplete { stage: u32 },
    /// A fresh enemy wave appeared
    WaveSpawned { stage: u32, count: u32 },
    /// An upgrade was bought
    UpgradePurchased { kind: UpgradeKind, cost: u64 },
    /// Player health crossed to zero (fired once)
    GameOver,
    /// Final stage cleared (fired once)
    Won,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians, follows the velocity heading
    pub angle: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    /// Ticks until the next attack is allowed
    pub cooldown: u32,
    /// Ticks remaining on the swing animation counter
    pub attacking: u32,
}

impl Player {
    pub fn new(max_hp: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            angle: 0.0,
            hp: max_hp,
            max_hp,
            radius: PLAYER_RADIUS,
            cooldown: 0,
            attacking: 0,
        }
    }

    /// Accelerate along `input`, integrate, and apply drag
    ///
    /// Inputs longer than unit are normalized (keyboard diagonals); shorter
    /// ones pass through so an analog stick can move at partial throttle.
    pub fn apply_movement(&mut self, input: Vec2, speed: f32, drag: f32) {
        let input = if input.length_squared() > 1.0 {
            input.normalize()
        } else {
            input
        };

        self.vel += input * speed * ACCEL_FACTOR;
        self.pos += self.vel;
        self.vel *= drag;

        if self.vel.length() > FACING_DEADZONE {
            self.angle = self.vel.y.atan2(self.vel.x);
        }
    }

    /// Count down attack timers (floored at zero)
    pub fn tick_timers(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        self.attacking = self.attacking.saturating_sub(1);
    }

    /// Start a swing if the cooldown allows it; mid-cooldown requests are
    /// dropped, not queued
    pub fn try_attack(&mut self, requested: bool, cooldown_ticks: u32) -> bool {
        if requested && self.cooldown == 0 {
            self.cooldown = cooldown_ticks;
            self.attacking = ATTACK_ACTIVE_TICKS;
            true
        } else {
            false
        }
    }

    /// Apply damage, clamping health into [0, max_hp]
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).clamp(0.0, self.max_hp);
    }

    pub fn health_frac(&self) -> f32 {
        if self.max_hp > 0.0 { self.hp / self.max_hp } else { 0.0 }
    }
}

/// A bear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub radius: f32,
    pub speed: f32,
    /// Contact damage per attack
    pub damage: f32,
    /// Ticks until the next contact attack
    pub attack_timer: u32,
    /// Stage tier this enemy spawned at (drives the stat scale)
    pub tier: u32,
    /// Hit flash counter for the renderer
    pub flash: u32,
    /// Cleared exactly once on death; guards double-removal
    pub alive: bool,
}

impl Enemy {
    /// Spawn a tier-scaled enemy diagonally offset from `origin`
    pub fn spawn(id: u32, tier: u32, origin: Vec2, rng: &mut Pcg32) -> Self {
        let offset = if rng.random_bool(0.5) {
            ENEMY_SPAWN_OFFSET
        } else {
            -ENEMY_SPAWN_OFFSET
        };
        let scale = 1.0 + tier as f32 * 0.2;
        let hp = ENEMY_BASE_HP * scale;
        Self {
            id,
            pos: origin + Vec2::splat(offset),
            hp,
            max_hp: hp,
            radius: ENEMY_BASE_RADIUS * scale,
            speed: ENEMY_BASE_SPEED + tier as f32 * 0.2,
            damage: ENEMY_BASE_DAMAGE + tier as f32 * 2.0,
            attack_timer: 0,
            tier,
            flash: 0,
            alive: true,
        }
    }

    /// Contact range: body radius plus a little slack
    pub fn contact_range(&self) -> f32 {
        self.radius + ENEMY_CONTACT_SLACK
    }

    /// Straight-line pursuit toward `target`, honoring the optional aggro
    /// radius and hunt boundary
    pub fn seek(&mut self, target: Vec2, aggro_radius: Option<f32>, hunt_boundary_x: Option<f32>) {
        let delta = target - self.pos;
        let dist = delta.length();

        if let Some(aggro) = aggro_radius
            && dist > aggro
        {
            return;
        }
        if dist <= self.contact_range() {
            return;
        }

        let dir = delta / dist;
        let new_x = self.pos.x + dir.x * self.speed;
        // X movement is discarded rather than clamped when it would cross
        // into the safe region; the enemy still closes on the y axis.
        if hunt_boundary_x.is_none_or(|b| new_x >= b) {
            self.pos.x = new_x;
        }
        self.pos.y += dir.y * self.speed;
    }

    /// Attack if in contact range with a ready timer; returns damage dealt
    pub fn try_contact_attack(&mut self, target: Vec2) -> Option<f32> {
        let dist = (target - self.pos).length();
        if dist <= self.contact_range() && self.attack_timer == 0 {
            self.attack_timer = ENEMY_ATTACK_COOLDOWN_TICKS;
            Some(self.damage)
        } else {
            None
        }
    }

    /// Count down the attack and flash timers (run every tick, any state)
    pub fn tick_timers(&mut self) {
        self.attack_timer = self.attack_timer.saturating_sub(1);
        self.flash = self.flash.saturating_sub(1);
    }

    /// Apply damage; returns true only on the tick this enemy dies
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = (self.hp - amount).clamp(0.0, self.max_hp);
        self.flash = ENEMY_FLASH_TICKS;
        if self.hp <= 0.0 {
            self.alive = false;
            true
        } else {
            false
        }
    }

    pub fn health_frac(&self) -> f32 {
        if self.max_hp > 0.0 { self.hp / self.max_hp } else { 0.0 }
    }
}

/// A meat pickup left behind by a dead enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeatDrop {
    pub id: u32,
    pub pos: Vec2,
    /// Ticks until the drop despawns
    pub life: u32,
}

impl MeatDrop {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            life: DROP_LIFETIME_TICKS,
        }
    }
}

/// The meat grinder: stores deposited meat and converts it to money
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub pos: Vec2,
    /// Meat waiting to be converted
    pub stored: u32,
    /// Ticks accumulated toward the next conversion
    pub timer: u32,
}

impl Machine {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            stored: 0,
            timer: 0,
        }
    }

    /// Transfer meat into storage (all-or-nothing, done by the tick)
    pub fn deposit(&mut self, amount: u32) {
        self.stored += amount;
    }

    /// Advance the processing timer; returns true when exactly one unit
    /// converted this tick
    pub fn step(&mut self, speed_ticks: u32) -> bool {
        if self.stored == 0 {
            return false;
        }
        self.timer += 1;
        if self.timer >= speed_ticks {
            self.timer = 0;
            self.stored -= 1;
            true
        } else {
            false
        }
    }

    /// Progress toward the next conversion, for the renderer
    pub fn progress_frac(&self, speed_ticks: u32) -> f32 {
        if self.stored == 0 || speed_ticks == 0 {
            0.0
        } else {
            self.timer as f32 / speed_ticks as f32
        }
    }
}

/// What a recorded kill did to the stage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// Quota not yet reached
    Continue,
    /// Quota reached, advanced to this stage
    StageCleared(u32),
    /// Final stage cleared
    Won,
}

/// Stage, kill and economy counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    /// Current stage (1-based)
    pub stage: u32,
    pub max_stages: u32,
    /// Kills recorded toward the current stage
    pub kills: u32,
    /// Kills required to clear the current stage
    pub kills_required: u32,
    pub money: u64,
    /// Meat the player is carrying (capped by the tuning's meat cap)
    pub meat: u32,
}

impl Progression {
    pub fn new(max_stages: u32) -> Self {
        Self {
            stage: 1,
            max_stages,
            kills: 0,
            kills_required: KILLS_FOR_FIRST_STAGE,
            money: 0,
            meat: 0,
        }
    }

    /// Record one kill and advance the stage when the quota is met
    pub fn on_kill(&mut self) -> KillOutcome {
        self.kills += 1;
        if self.kills < self.kills_required {
            return KillOutcome::Continue;
        }
        self.stage += 1;
        self.kills = 0;
        self.kills_required += KILLS_PER_STAGE_STEP;
        if self.stage > self.max_stages {
            KillOutcome::Won
        } else {
            KillOutcome::StageCleared(self.stage)
        }
    }

    /// Enemies in the next wave for `stage`
    pub fn wave_size(&self) -> u32 {
        WAVE_BASE_COUNT + self.stage
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Balance values, mutated by upgrades over the run
    pub tuning: Tuning,
    pub player: Player,
    pub machine: Machine,
    /// Active enemies (stable order, spawn order by id)
    pub enemies: Vec<Enemy>,
    /// Active meat drops (spawn order by id)
    pub drops: Vec<MeatDrop>,
    pub progression: Progression,
    pub shop: UpgradeShop,
    /// Events emitted this tick, drained by the presentation layer
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a run with default tuning and the first wave spawned
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::new(tuning.player_hp),
            machine: Machine::new(Vec2::ZERO),
            enemies: Vec::new(),
            drops: Vec::new(),
            progression: Progression::new(tuning.max_stages),
            shop: UpgradeShop::default(),
            tuning,
            events: Vec::new(),
            next_id: 1,
        };
        super::tick::spawn_wave(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// RNG stream for this tick's spawns, derived from the run seed so
    /// replays with the same inputs stay identical
    pub fn spawn_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(
            self.seed
                ^ self.time_ticks.wrapping_mul(0x9E37_79B9_7F4A_7C15)
                ^ (u64::from(self.progression.stage) << 32),
        )
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the accumulated events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[cfg(test)]
    pub(crate) fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(7);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_player_health_clamped() {
        let mut player = Player::new(200.0);
        player.take_damage(9999.0);
        assert_eq!(player.hp, 0.0);
        player.take_damage(-9999.0); // healing past max also clamps
        assert_eq!(player.hp, 200.0);
    }

    #[test]
    fn test_enemy_dies_exactly_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::spawn(1, 1, Vec2::ZERO, &mut rng);
        assert!(!enemy.take_damage(enemy.max_hp - 1.0));
        assert!(enemy.take_damage(10.0));
        assert!(!enemy.take_damage(10.0)); // already dead, no second death
        assert_eq!(enemy.hp, 0.0);
    }

    #[test]
    fn test_enemy_tier_scaling() {
        let mut rng = Pcg32::seed_from_u64(1);
        let enemy = Enemy::spawn(1, 3, Vec2::ZERO, &mut rng);
        assert_eq!(enemy.max_hp, 60.0 * 1.6);
        assert_eq!(enemy.speed, 1.0 + 0.6);
        assert_eq!(enemy.damage, 5.0 + 6.0);
    }

    #[test]
    fn test_hunt_boundary_discards_x_movement() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::spawn(1, 1, Vec2::ZERO, &mut rng);
        enemy.pos = Vec2::new(100.0, 100.0);
        // Target on the far side of the boundary: x stays, y still closes
        enemy.seek(Vec2::new(-500.0, 0.0), None, Some(100.0));
        assert_eq!(enemy.pos.x, 100.0);
        assert!(enemy.pos.y < 100.0);
    }

    #[test]
    fn test_aggro_radius_gates_pursuit() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = Enemy::spawn(1, 1, Vec2::ZERO, &mut rng);
        enemy.pos = Vec2::new(400.0, 0.0);
        enemy.seek(Vec2::ZERO, Some(300.0), None);
        assert_eq!(enemy.pos, Vec2::new(400.0, 0.0));
        enemy.seek(Vec2::ZERO, Some(500.0), None);
        assert!(enemy.pos.x < 400.0);
    }

    #[test]
    fn test_machine_converts_one_unit_per_threshold() {
        let mut machine = Machine::new(Vec2::ZERO);
        machine.deposit(5);
        let mut conversions = 0;
        for _ in 0..50 {
            if machine.step(50) {
                conversions += 1;
            }
        }
        assert_eq!(conversions, 1);
        assert_eq!(machine.stored, 4);
        assert_eq!(machine.timer, 0);
    }

    #[test]
    fn test_machine_idle_without_meat() {
        let mut machine = Machine::new(Vec2::ZERO);
        for _ in 0..200 {
            assert!(!machine.step(50));
        }
        assert_eq!(machine.timer, 0);
    }

    #[test]
    fn test_progression_stage_advance() {
        let mut prog = Progression::new(5);
        for _ in 0..4 {
            assert_eq!(prog.on_kill(), KillOutcome::Continue);
        }
        assert_eq!(prog.on_kill(), KillOutcome::StageCleared(2));
        assert_eq!(prog.kills, 0);
        assert_eq!(prog.kills_required, 7);
    }

    #[test]
    fn test_progression_win_on_final_stage() {
        let mut prog = Progression::new(1);
        for _ in 0..4 {
            prog.on_kill();
        }
        assert_eq!(prog.on_kill(), KillOutcome::Won);
    }
}
