//! Live game state definitions.
//!
//! Everything here is constructed from the content catalog at new-game start
//! and mutated only through the engine's dispatch entry point. The two rate
//! fields on the ledger are cached derived values, recomputed after every
//! mutation that could change them, never trusted as a source of truth.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{
    BoostKind, Catalog, EvolutionStage, Tier, UnitDef, UnlockCondition, UpgradeDef, UpgradeKind,
    MAX_LEVEL,
};

/// The single currency of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceLedger {
    /// Spendable balance. Debits are rejected rather than clamped, so this
    /// never goes negative.
    pub energy: f64,
    /// Lifetime cumulative earned. Monotonically non-decreasing.
    pub total_energy: f64,
    /// Count of discrete user actions.
    pub click_count: u64,
    /// Cached derived rate: energy per discrete action.
    pub energy_per_click: f64,
    /// Cached derived rate: energy per second of passive production.
    pub energy_per_second: f64,
}

impl ResourceLedger {
    fn new() -> Self {
        Self {
            energy: 0.0,
            total_energy: 0.0,
            click_count: 0,
            energy_per_click: 1.0,
            energy_per_second: 0.0,
        }
    }
}

/// A single ownable, stackable production unit.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductionUnit {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub base_cost: f64,
    pub base_production: f64,
    /// Cosmetic identity tiers keyed by owned count. Do not affect production.
    pub evolutions: Vec<EvolutionStage>,
    /// Owned quantity. Only ever increases; capped at [`MAX_LEVEL`].
    pub count: u32,
    pub unlocked: bool,
    /// Mirrors `count`, capped at [`MAX_LEVEL`].
    pub level: u32,
    /// EV budget: grows by 1 per unit purchased, spent on skill nodes.
    pub experience_value: u32,
    pub unlocked_skills: BTreeSet<String>,
    /// One-way flag granting a flat production multiplier.
    pub is_shiny: bool,
}

impl ProductionUnit {
    pub fn from_def(def: &UnitDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            tier: def.tier,
            base_cost: def.base_cost,
            base_production: def.base_production,
            evolutions: def.evolutions.clone(),
            count: 0,
            unlocked: false,
            level: 0,
            experience_value: 0,
            unlocked_skills: BTreeSet::new(),
            is_shiny: false,
        }
    }

    /// How many more copies may be purchased before the level ceiling.
    pub fn headroom(&self) -> u32 {
        MAX_LEVEL.saturating_sub(self.level)
    }

    /// Display identity for the current count: the highest evolution stage
    /// whose threshold has been reached, or the base name.
    pub fn current_name(&self) -> &str {
        self.evolutions
            .iter()
            .rev()
            .find(|stage| self.count >= stage.threshold)
            .map(|stage| stage.name.as_str())
            .unwrap_or(&self.name)
    }

    /// Whether the given evolution stage has been reached.
    pub fn has_evolved_to(&self, stage: usize) -> bool {
        self.evolutions
            .get(stage)
            .is_some_and(|s| self.count >= s.threshold)
    }
}

/// A one-time upgrade in its live (purchasable) form.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub kind: UpgradeKind,
    pub value: f64,
    pub condition: Option<UnlockCondition>,
    /// One-way flag.
    pub purchased: bool,
}

impl Upgrade {
    pub fn from_def(def: &UpgradeDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            cost: def.cost,
            kind: def.kind.clone(),
            value: def.value,
            condition: def.condition.clone(),
            purchased: false,
        }
    }
}

/// A running instance of a timed boost. At most one per kind exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveBoost {
    pub boost_id: String,
    pub kind: BoostKind,
    pub value: f64,
    /// Expiry on the sim clock, in seconds.
    pub expires_at: f64,
}

/// Full state of one game. Created from the catalog, advanced exclusively by
/// the engine, discarded wholesale on reset.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub ledger: ResourceLedger,
    /// Sim clock in seconds, advanced only by time-advancing actions. Boost
    /// expiries and cooldowns are absolute values on this clock.
    pub time: f64,
    pub units: Vec<ProductionUnit>,
    pub upgrades: Vec<Upgrade>,
    pub active_boosts: Vec<ActiveBoost>,
    /// Per-boost-id earliest next activation time. Survives boost expiry.
    pub cooldowns: BTreeMap<String, f64>,
}

impl GameState {
    /// Fresh state with every entity at its catalog default.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            ledger: ResourceLedger::new(),
            time: 0.0,
            units: catalog.units.iter().map(ProductionUnit::from_def).collect(),
            upgrades: catalog.upgrades.iter().map(Upgrade::from_def).collect(),
            active_boosts: Vec::new(),
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn unit(&self, id: &str) -> Option<&ProductionUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: &str) -> Option<&mut ProductionUnit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn upgrade_mut(&mut self, id: &str) -> Option<&mut Upgrade> {
        self.upgrades.iter_mut().find(|u| u.id == id)
    }

    /// The unexpired active boost of the given kind, if any.
    pub fn active_boost_of(&self, kind: BoostKind) -> Option<&ActiveBoost> {
        self.active_boosts
            .iter()
            .find(|b| b.kind == kind && b.expires_at > self.time)
    }

    /// Whether an upgrade's unlock condition currently holds. Upgrades
    /// without a condition are always available.
    pub fn condition_met(&self, upgrade: &Upgrade) -> bool {
        match &upgrade.condition {
            None => true,
            Some(UnlockCondition::TotalEnergy(threshold)) => {
                self.ledger.total_energy >= *threshold
            }
            Some(UnlockCondition::UnitCount { unit, count }) => {
                self.unit(unit).is_some_and(|u| u.count >= *count)
            }
            Some(UnlockCondition::UnitEvolved { unit, stage }) => {
                self.unit(unit).is_some_and(|u| u.has_evolved_to(*stage))
            }
        }
    }

    /// Seconds until the given boost may be activated again. Zero when off
    /// cooldown (or never activated).
    pub fn remaining_cooldown(&self, boost_id: &str) -> f64 {
        self.cooldowns
            .get(boost_id)
            .map(|available_at| (available_at - self.time).max(0.0))
            .unwrap_or(0.0)
    }
}
