//! The upgrade shop: money earned at the grinder buys permanent stat boosts
//!
//! Each upgrade's price grows by half after every purchase, so specializing
//! gets expensive fast. Insufficient funds refuses the purchase; it is not
//! an error.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};

/// Purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// +15 swing damage
    Damage,
    /// +50 max health, healed on purchase
    Vitality,
    /// +0.5 movement speed
    Speed,
    /// +5 meat carrying capacity
    Capacity,
    /// +10 money per converted meat
    Grinder,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Damage,
        UpgradeKind::Vitality,
        UpgradeKind::Speed,
        UpgradeKind::Capacity,
        UpgradeKind::Grinder,
    ];

    fn index(self) -> usize {
        match self {
            UpgradeKind::Damage => 0,
            UpgradeKind::Vitality => 1,
            UpgradeKind::Speed => 2,
            UpgradeKind::Capacity => 3,
            UpgradeKind::Grinder => 4,
        }
    }

    fn base_cost(self) -> u64 {
        match self {
            UpgradeKind::Damage => 100,
            UpgradeKind::Vitality => 100,
            UpgradeKind::Speed => 150,
            UpgradeKind::Capacity => 200,
            UpgradeKind::Grinder => 300,
        }
    }
}

/// Current price of each upgrade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeShop {
    costs: [u64; 5],
}

impl Default for UpgradeShop {
    fn default() -> Self {
        let mut costs = [0; 5];
        for kind in UpgradeKind::ALL {
            costs[kind.index()] = kind.base_cost();
        }
        Self { costs }
    }
}

impl UpgradeShop {
    pub fn cost(&self, kind: UpgradeKind) -> u64 {
        self.costs[kind.index()]
    }

    /// Raise the price after a purchase (x1.5, floored)
    fn bump(&mut self, kind: UpgradeKind) {
        let cost = &mut self.costs[kind.index()];
        *cost = *cost * 3 / 2;
    }
}

impl GameState {
    /// Buy an upgrade if the money is there; returns whether it went through
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        let cost = self.shop.cost(kind);
        if self.progression.money < cost {
            return false;
        }
        self.progression.money -= cost;
        self.shop.bump(kind);

        match kind {
            UpgradeKind::Damage => self.tuning.player_damage += 15.0,
            UpgradeKind::Vitality => {
                self.tuning.player_hp += 50.0;
                self.player.max_hp += 50.0;
                self.player.hp = (self.player.hp + 50.0).min(self.player.max_hp);
            }
            UpgradeKind::Speed => self.tuning.player_speed += 0.5,
            UpgradeKind::Capacity => self.tuning.meat_cap += 5,
            UpgradeKind::Grinder => self.tuning.machine_value += 10,
        }

        self.push_event(GameEvent::UpgradePurchased { kind, cost });
        log::info!("Upgrade purchased: {:?} for {}g", kind, cost);
        true
    }
}
