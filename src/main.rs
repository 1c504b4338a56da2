//! Arctic Apex headless driver
//!
//! Runs a scripted bot through a full simulation run and logs the outcome.
//! Useful for balance checks and soak-testing the sim without a renderer.
//!
//! Usage: arctic-apex [SEED] [--ticks N] [--tuning FILE]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use arctic_apex::Tuning;
use arctic_apex::consts::ATTACK_HIT_RADIUS;
use arctic_apex::sim::{GameEvent, GameState, Snapshot, TickInput, UpgradeKind, tick};

struct Args {
    seed: u64,
    max_ticks: u64,
    tuning: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        seed: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
        max_ticks: 60 * 60 * 10, // ten minutes of play
        tuning: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                if let Some(n) = iter.next().and_then(|v| v.parse().ok()) {
                    args.max_ticks = n;
                }
            }
            "--tuning" => args.tuning = iter.next().map(PathBuf::from),
            other => {
                if let Ok(seed) = other.parse() {
                    args.seed = seed;
                }
            }
        }
    }
    args
}

/// Pick the bot's input for this tick: fight the nearest bear, bank meat
/// at the grinder when full, and buy damage when the money is there
fn bot_input(state: &GameState) -> TickInput {
    let player = state.player.pos;

    let carrying_full = state.progression.meat >= state.tuning.meat_cap;
    let target = if carrying_full {
        Some(state.machine.pos)
    } else {
        state
            .enemies
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance(player)
                    .partial_cmp(&b.pos.distance(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.pos)
    };

    let Some(target) = target else {
        return TickInput::default();
    };

    let delta = target - player;
    let dist = delta.length();
    let move_dir = if dist > 1.0 { delta / dist } else { Vec2::ZERO };
    // Swing whenever a bear could be inside the sweep
    let attack = !carrying_full && dist < ATTACK_HIT_RADIUS;

    TickInput { move_dir, attack }
}

fn main() {
    env_logger::init();

    let args = parse_args();
    let tuning = match &args.tuning {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };

    log::info!("Arctic Apex headless run, seed {}", args.seed);
    let mut state = GameState::with_tuning(args.seed, tuning);

    for _ in 0..args.max_ticks {
        let input = bot_input(&state);
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::StageComplete { stage } => {
                    log::info!("Stage {} reached at tick {}", stage, state.time_ticks);
                }
                GameEvent::GameOver => log::warn!("Bot died at tick {}", state.time_ticks),
                GameEvent::Won => log::info!("Bot won at tick {}", state.time_ticks),
                _ => {}
            }
        }

        // Bank winnings into damage so later stages stay beatable
        while state.purchase_upgrade(UpgradeKind::Damage) {}

        if state.phase.is_terminal() {
            break;
        }
    }

    let snap = Snapshot::capture(&state);
    println!(
        "{}",
        serde_json::to_string_pretty(&snap).expect("snapshot serializes")
    );
    log::info!(
        "Finished: phase {:?}, stage {}, {} money, {} ticks",
        snap.phase,
        snap.stage,
        snap.money,
        state.time_ticks
    );
}
