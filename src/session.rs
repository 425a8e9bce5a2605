//! Session layer: the surface a frontend drives.
//!
//! Owns the catalog, the live state and the frame clock; turns draw-frame
//! timestamps into engine dispatches, sweeps expired boosts on a fixed
//! cadence, and raises the autosave flag for the host to consume. All the
//! read-side queries a UI needs (prices, cooldowns, skill gating) live here
//! so the frontend never computes economy numbers itself.

use crate::catalog::{Catalog, SkillNodeDef};
use crate::engine::{dispatch, Action};
use crate::save::{self, SaveError};
use crate::scaling;
use crate::skills;
use crate::state::GameState;
use crate::storage::AUTOSAVE_INTERVAL_SECS;
use crate::time::TickClock;

/// Seconds between expired-boost sweeps.
const EXPIRE_SWEEP_SECS: f64 = 1.0;

pub struct GameSession {
    catalog: Catalog,
    state: GameState,
    clock: TickClock,
    expire_accumulator: f64,
    autosave_accumulator: f64,
    autosave_due: bool,
}

impl GameSession {
    /// Fresh session over the standard catalog.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::standard())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        let state = GameState::new(&catalog);
        Self {
            catalog,
            state,
            clock: TickClock::new(),
            expire_accumulator: 0.0,
            autosave_accumulator: 0.0,
            autosave_due: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Apply one user intent immediately.
    pub fn dispatch(&mut self, action: Action) {
        dispatch(&mut self.state, &self.catalog, action);
    }

    /// Drive one draw frame. Advances the game by whatever time the clock
    /// releases, sweeps expired boosts about once a second, and marks an
    /// autosave due every [`AUTOSAVE_INTERVAL_SECS`] of play.
    pub fn frame(&mut self, now_ms: f64) {
        let Some(delta) = self.clock.update(now_ms) else {
            return;
        };
        dispatch(&mut self.state, &self.catalog, Action::AdvanceTime { delta });

        self.expire_accumulator += delta;
        if self.expire_accumulator >= EXPIRE_SWEEP_SECS {
            self.expire_accumulator = 0.0;
            dispatch(&mut self.state, &self.catalog, Action::ExpireBoosts);
        }

        self.autosave_accumulator += delta;
        if self.autosave_accumulator >= AUTOSAVE_INTERVAL_SECS {
            self.autosave_accumulator = 0.0;
            self.autosave_due = true;
        }
    }

    /// Whether an autosave is due; reading clears the flag.
    pub fn take_autosave_due(&mut self) -> bool {
        std::mem::take(&mut self.autosave_due)
    }

    /// Discard all progress and start over on the same catalog.
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.catalog);
        self.expire_accumulator = 0.0;
        self.autosave_accumulator = 0.0;
        self.autosave_due = false;
    }

    // ---- read-side queries ----

    /// Price of the next copy of a unit.
    pub fn unit_cost_of(&self, unit_id: &str) -> Option<f64> {
        let unit = self.state.unit(unit_id)?;
        Some(scaling::unit_cost(
            unit.base_cost,
            unit.tier.cost_coefficient(),
            unit.count,
            self.state.ledger.energy_per_second,
        ))
    }

    /// Total price of the next `quantity` copies.
    pub fn bulk_cost_of(&self, unit_id: &str, quantity: u32) -> Option<f64> {
        let unit = self.state.unit(unit_id)?;
        Some(scaling::bulk_unit_cost(
            unit.base_cost,
            unit.tier.cost_coefficient(),
            unit.count,
            self.state.ledger.energy_per_second,
            quantity.min(unit.headroom()),
        ))
    }

    /// How many copies the current balance buys.
    pub fn max_affordable_of(&self, unit_id: &str) -> Option<u32> {
        let unit = self.state.unit(unit_id)?;
        Some(scaling::max_affordable(
            unit.base_cost,
            unit.tier.cost_coefficient(),
            unit.count,
            self.state.ledger.energy_per_second,
            self.state.ledger.energy,
        ))
    }

    /// Current activation price of a boost.
    pub fn boost_cost_of(&self, boost_id: &str) -> Option<f64> {
        let def = self.catalog.boost(boost_id)?;
        Some(scaling::boost_cost(
            def.base_cost,
            def.cost_scale_factor,
            self.state.ledger.energy_per_second,
        ))
    }

    /// One-time shiny toll for a unit.
    pub fn shiny_cost_of(&self, unit_id: &str) -> Option<f64> {
        Some(scaling::shiny_cost(self.state.unit(unit_id)?.base_cost))
    }

    /// Seconds until a boost may be activated again.
    pub fn remaining_cooldown(&self, boost_id: &str) -> f64 {
        self.state.remaining_cooldown(boost_id)
    }

    /// A unit's skill tree with unspent EV, for tree rendering.
    pub fn skill_tree_of(&self, unit_id: &str) -> Option<(Vec<SkillNodeDef>, u32)> {
        let unit = self.state.unit(unit_id)?;
        Some((crate::catalog::build_skill_tree(unit_id), skills::remaining_ev(unit)))
    }

    /// Whether a skill node could be unlocked right now.
    pub fn can_unlock_skill(&self, unit_id: &str, skill_id: &str) -> bool {
        let Some(unit) = self.state.unit(unit_id) else {
            return false;
        };
        crate::catalog::build_skill_tree(unit_id)
            .iter()
            .find(|n| n.id == skill_id)
            .is_some_and(|node| skills::can_unlock(unit, node))
    }

    // ---- persistence ----

    /// Serialize the current game for the host to store.
    pub fn save_json(&self, now_ms: f64) -> Result<String, SaveError> {
        save::serialize(&self.state, now_ms)
    }

    /// Replace the session's game with a restored save. Returns offline
    /// earnings. On failure the running game is untouched.
    pub fn load_save_json(&mut self, json: &str, now_ms: f64) -> Result<f64, SaveError> {
        let (state, earned) = save::restore(&self.catalog, json, now_ms)?;
        self.state = state;
        Ok(earned)
    }

    /// Portable export string for save transfer between devices.
    pub fn export(&self, now_ms: f64) -> Result<String, SaveError> {
        save::export(&self.state, now_ms)
    }

    /// Import a string produced by [`GameSession::export`]. On failure the
    /// running game is untouched.
    pub fn import(&mut self, encoded: &str, now_ms: f64) -> Result<f64, SaveError> {
        let (state, earned) = save::import(&self.catalog, encoded, now_ms)?;
        self.state = state;
        Ok(earned)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
