//! Transition function: the single authoritative state-mutation entry point.
//!
//! `dispatch` consumes one action against the previous state and leaves the
//! next state behind; numeric work is delegated to the scaling, production
//! and skill modules. Every rejected action (unaffordable, on cooldown,
//! already purchased, at cap, prerequisite missing) is a silent no-op that
//! touches nothing: preconditions are checkable in advance through the query
//! functions, so rejection is normal game flow rather than an error.

use crate::catalog::{BoostDef, BoostKind, Catalog, UNLOCK_THRESHOLD_RATIO};
use crate::production::recompute_rates;
use crate::scaling;
use crate::skills;
use crate::state::{ActiveBoost, GameState};

/// Everything that can happen to a game. Produced by user intents and by
/// the tick driver; applied in dispatch order, one at a time.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Buy up to `quantity` copies of a unit (truncated at the level ceiling).
    PurchaseUnit { id: String, quantity: u32 },
    /// Buy a one-time upgrade.
    PurchaseUpgrade { id: String },
    /// One discrete user action (a click).
    RegisterAction,
    /// Advance the simulation by `delta` elapsed seconds.
    AdvanceTime { delta: f64 },
    /// Credit a raw amount to both balances (instant boosts, offline grant).
    GrantResource { amount: f64 },
    /// Activate a catalog boost by id.
    ActivateBoost { id: String },
    /// Sweep active boosts whose expiry has passed.
    ExpireBoosts,
    /// Unlock a skill node on a unit's tree.
    UnlockSkill { unit_id: String, skill_id: String },
    /// Pay the one-time shiny toll for a unit.
    MakeShiny { unit_id: String },
}

/// Apply one action. The state is owned exclusively by the caller and only
/// ever mutated here, so each call is atomic with respect to any other.
pub fn dispatch(state: &mut GameState, catalog: &Catalog, action: Action) {
    match action {
        Action::PurchaseUnit { id, quantity } => purchase_unit(state, &id, quantity),
        Action::PurchaseUpgrade { id } => purchase_upgrade(state, &id),
        Action::RegisterAction => register_action(state),
        Action::AdvanceTime { delta } => advance_time(state, delta),
        Action::GrantResource { amount } => grant_resource(state, amount),
        Action::ActivateBoost { id } => activate_boost(state, catalog, &id),
        Action::ExpireBoosts => expire_boosts(state),
        Action::UnlockSkill { unit_id, skill_id } => unlock_skill(state, &unit_id, &skill_id),
        Action::MakeShiny { unit_id } => make_shiny(state, &unit_id),
    }
}

/// Credit earned energy to both the spendable and the lifetime balance.
fn credit(state: &mut GameState, amount: f64) {
    state.ledger.energy += amount;
    state.ledger.total_energy += amount;
}

fn purchase_unit(state: &mut GameState, id: &str, quantity: u32) {
    let throughput = state.ledger.energy_per_second;
    let Some(unit) = state.unit_mut(id) else {
        return;
    };
    let quantity = quantity.min(unit.headroom());
    if quantity == 0 {
        return;
    }
    let cost = scaling::bulk_unit_cost(
        unit.base_cost,
        unit.tier.cost_coefficient(),
        unit.count,
        throughput,
        quantity,
    );
    if state.ledger.energy < cost {
        return;
    }

    let unit = state.unit_mut(id).expect("looked up above");
    unit.count += quantity;
    unit.level += quantity;
    unit.experience_value += quantity;
    state.ledger.energy -= cost;
    recompute_rates(state);
    auto_unlock(state);
}

fn purchase_upgrade(state: &mut GameState, id: &str) {
    let Some(upgrade) = state.upgrade(id) else {
        return;
    };
    if upgrade.purchased || state.ledger.energy < upgrade.cost {
        return;
    }
    if !state.condition_met(upgrade) {
        return;
    }
    let cost = upgrade.cost;
    state.upgrade_mut(id).expect("looked up above").purchased = true;
    state.ledger.energy -= cost;
    recompute_rates(state);
}

fn register_action(state: &mut GameState) {
    let gain = state.ledger.energy_per_click;
    credit(state, gain);
    state.ledger.click_count += 1;
    auto_unlock(state);
}

fn advance_time(state: &mut GameState, delta: f64) {
    // Zero, negative and non-finite deltas are no-ops; fractional deltas
    // accumulate exactly (f64 all the way, no integer truncation).
    if !delta.is_finite() || delta <= 0.0 {
        return;
    }
    let started_at = state.time;
    state.time += delta;

    let mut gain = state.ledger.energy_per_second * delta;
    if let Some(auto) = state
        .active_boosts
        .iter()
        .find(|b| b.kind == BoostKind::AutoClick && b.expires_at > started_at)
    {
        // Only the portion of the step the boost actually covers.
        let overlap = (auto.expires_at - started_at).min(delta);
        gain += state.ledger.energy_per_click * auto.value * overlap;
    }
    if gain > 0.0 {
        credit(state, gain);
    }
    auto_unlock(state);
}

fn grant_resource(state: &mut GameState, amount: f64) {
    if !amount.is_finite() || amount <= 0.0 {
        return;
    }
    credit(state, amount);
    auto_unlock(state);
}

fn activate_boost(state: &mut GameState, catalog: &Catalog, id: &str) {
    let Some(def) = catalog.boost(id) else {
        return;
    };
    let now = state.time;
    if state
        .cooldowns
        .get(id)
        .is_some_and(|available_at| *available_at > now)
    {
        return;
    }
    let instant = matches!(def.kind, BoostKind::InstantGrant);
    if !instant && state.active_boost_of(def.kind).is_some() {
        return;
    }
    let cost = scaling::boost_cost(
        def.base_cost,
        def.cost_scale_factor,
        state.ledger.energy_per_second,
    );
    if state.ledger.energy < cost {
        return;
    }

    state.ledger.energy -= cost;
    state.cooldowns.insert(id.to_string(), now + def.cooldown_secs);

    if instant {
        let amount = state.ledger.total_energy * def.value;
        grant_resource(state, amount);
        return;
    }

    start_timed_boost(state, def, now);
    recompute_rates(state);
}

/// Replace any same-kind instance (only an expired, unswept one can still be
/// present here) and start a fresh one.
fn start_timed_boost(state: &mut GameState, def: &BoostDef, now: f64) {
    state.active_boosts.retain(|b| b.kind != def.kind);
    state.active_boosts.push(ActiveBoost {
        boost_id: def.id.clone(),
        kind: def.kind,
        value: def.value,
        expires_at: now + def.duration_secs,
    });
}

fn expire_boosts(state: &mut GameState) {
    let before = state.active_boosts.len();
    state.active_boosts.retain(|b| b.expires_at > state.time);
    // Idempotent: nothing expired, nothing recomputed downstream.
    if state.active_boosts.len() != before {
        recompute_rates(state);
    }
}

fn unlock_skill(state: &mut GameState, unit_id: &str, skill_id: &str) {
    let Some(unit) = state.unit_mut(unit_id) else {
        return;
    };
    if skills::unlock(unit, skill_id) {
        recompute_rates(state);
    }
}

fn make_shiny(state: &mut GameState, unit_id: &str) {
    let Some(unit) = state.unit(unit_id) else {
        return;
    };
    if unit.is_shiny || unit.count == 0 {
        return;
    }
    let cost = scaling::shiny_cost(unit.base_cost);
    if state.ledger.energy < cost {
        return;
    }
    state.unit_mut(unit_id).expect("looked up above").is_shiny = true;
    state.ledger.energy -= cost;
    recompute_rates(state);
}

/// Reveal every locked unit whose half base cost has been reached by
/// lifetime energy. Runs after any action that can change `total_energy`;
/// flags are written only when a unit actually flips, so an uneventful scan
/// leaves the state bit-identical.
pub(crate) fn auto_unlock(state: &mut GameState) {
    let total = state.ledger.total_energy;
    for unit in &mut state.units {
        if !unit.unlocked && unit.base_cost * UNLOCK_THRESHOLD_RATIO <= total {
            unit.unlocked = true;
        }
    }
}
