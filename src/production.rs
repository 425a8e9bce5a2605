//! Production engine: derives the two ledger rates from the full state.
//!
//! Production is strictly linear in each unit's count; all non-linearity
//! lives in the cost curve. Every transition that could change an input of
//! these formulas ends by calling [`recompute_rates`] instead of patching
//! the cached values inline.

use crate::catalog::{self, BoostKind, SkillKind, UpgradeKind};
use crate::state::{GameState, ProductionUnit, Upgrade};

/// Energy granted per discrete user action: base 1, plus every purchased
/// flat click bonus, times every purchased click multiplier, times the
/// active click-multiplier boost (1 if none).
pub fn derive_click_rate(state: &GameState) -> f64 {
    let mut rate = 1.0;
    for upgrade in state.upgrades.iter().filter(|u| u.purchased) {
        if let UpgradeKind::ClickBonus = upgrade.kind {
            rate += upgrade.value;
        }
    }
    for upgrade in state.upgrades.iter().filter(|u| u.purchased) {
        if let UpgradeKind::ClickMultiplier = upgrade.kind {
            rate *= upgrade.value;
        }
    }
    if let Some(boost) = state.active_boost_of(BoostKind::ClickMultiplier) {
        rate *= boost.value;
    }
    rate
}

/// Passive energy per second across all owned units, with global upgrade
/// terms and the active production boost applied on top.
pub fn derive_production_rate(state: &GameState) -> f64 {
    let mut total: f64 = state
        .units
        .iter()
        .filter(|u| u.count > 0)
        .map(|u| unit_production(u, &state.upgrades))
        .sum();

    let mut percent = 0.0;
    for upgrade in state.upgrades.iter().filter(|u| u.purchased) {
        match upgrade.kind {
            UpgradeKind::GlobalPercent => percent += upgrade.value,
            UpgradeKind::GlobalMultiplier => total *= upgrade.value,
            _ => {}
        }
    }
    total *= 1.0 + percent / 100.0;

    if let Some(boost) = state.active_boost_of(BoostKind::ProductionMultiplier) {
        total *= boost.value;
    }
    total
}

/// One unit's contribution: flat bonuses widen the per-copy base before
/// count scaling, multipliers apply after.
fn unit_production(unit: &ProductionUnit, upgrades: &[Upgrade]) -> f64 {
    let mut base = unit.base_production;
    let mut multiplier = 1.0;
    for upgrade in upgrades.iter().filter(|u| u.purchased) {
        match &upgrade.kind {
            UpgradeKind::UnitBonus { target } if *target == unit.id => base += upgrade.value,
            UpgradeKind::UnitMultiplier { target } if *target == unit.id => {
                multiplier *= upgrade.value;
            }
            _ => {}
        }
    }

    let mut skill_flat = 0.0;
    let mut skill_multiplier = 1.0;
    for node in catalog::build_skill_tree(&unit.id) {
        if !unit.unlocked_skills.contains(&node.id) {
            continue;
        }
        match node.kind {
            SkillKind::FlatBonus => skill_flat += node.value,
            SkillKind::Multiplier => skill_multiplier *= node.value,
        }
    }

    let shiny = if unit.is_shiny {
        catalog::SHINY_PRODUCTION_MULTIPLIER
    } else {
        1.0
    };

    (base + skill_flat) * unit.count as f64 * multiplier * shiny * skill_multiplier
}

/// Refresh both cached ledger rates from the structural state.
pub fn recompute_rates(state: &mut GameState) {
    state.ledger.energy_per_click = derive_click_rate(state);
    state.ledger.energy_per_second = derive_production_rate(state);
}
