//! Save format, reconciliation against the current catalog, and offline
//! catch-up.
//!
//! ## Versioning policy
//!
//! - `SAVE_VERSION`: current save format version. Increment when adding
//!   fields.
//! - `MIN_COMPATIBLE_VERSION`: oldest version that can still be loaded.
//!   Leave it alone for additive changes (missing fields fill in with
//!   defaults); increment only for breaking changes to existing fields.
//!
//! Saves store units by string id, never by position, so a reordered or
//! extended catalog still restores cleanly: saved entities missing from the
//! catalog are dropped, catalog entities missing from the save start at
//! their defaults.

use std::string::FromUtf8Error;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, MAX_LEVEL};
use crate::engine;
use crate::production::recompute_rates;
use crate::state::{ActiveBoost, GameState};

/// Save format version. Increment when adding fields.
pub const SAVE_VERSION: u32 = 1;

/// Oldest save version that can still be loaded. Saves at or above this load
/// with missing fields defaulted.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Load failures. Each variant maps to one stage of the decode pipeline;
/// callers generally treat any of them as "start a new game".
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("save is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("save is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("save version {found} is older than the oldest supported ({min})")]
    IncompatibleVersion { found: u32, min: u32 },
}

/// Serialized envelope: version, wall-clock save timestamp, game payload.
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    /// Wall clock at save time (Unix millis). Drives offline catch-up.
    pub saved_at_ms: f64,
    pub game: GameSave,
}

/// The durable portion of a game. Cached rates are saved for display before
/// the first recompute but are always rederived on restore.
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameSave {
    pub energy: f64,
    pub total_energy: f64,
    pub click_count: u64,
    pub energy_per_click: f64,
    pub energy_per_second: f64,
    /// Sim clock in seconds.
    pub time: f64,
    pub units: Vec<UnitSave>,
    pub purchased_upgrades: Vec<String>,
    pub active_boosts: Vec<ActiveBoost>,
    pub cooldowns: std::collections::BTreeMap<String, f64>,
}

/// One unit's durable state, keyed by catalog id.
#[derive(Serialize, Deserialize)]
pub struct UnitSave {
    pub id: String,
    pub count: u32,
    pub unlocked: bool,
    pub is_shiny: bool,
    /// Absent in pre-progression saves; derived from `count` on restore.
    pub level: Option<u32>,
    /// Absent in pre-progression saves; derived from `count` on restore.
    pub experience_value: Option<u32>,
    pub unlocked_skills: Vec<String>,
}

/// Capture the durable state of a game.
pub fn extract_save(state: &GameState, saved_at_ms: f64) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        saved_at_ms,
        game: GameSave {
            energy: state.ledger.energy,
            total_energy: state.ledger.total_energy,
            click_count: state.ledger.click_count,
            energy_per_click: state.ledger.energy_per_click,
            energy_per_second: state.ledger.energy_per_second,
            time: state.time,
            units: state
                .units
                .iter()
                .map(|u| UnitSave {
                    id: u.id.clone(),
                    count: u.count,
                    unlocked: u.unlocked,
                    is_shiny: u.is_shiny,
                    level: Some(u.level),
                    experience_value: Some(u.experience_value),
                    unlocked_skills: u.unlocked_skills.iter().cloned().collect(),
                })
                .collect(),
            purchased_upgrades: state
                .upgrades
                .iter()
                .filter(|u| u.purchased)
                .map(|u| u.id.clone())
                .collect(),
            active_boosts: state.active_boosts.clone(),
            cooldowns: state.cooldowns.clone(),
        },
    }
}

/// Serialize a game to the JSON save envelope.
pub fn serialize(state: &GameState, saved_at_ms: f64) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(state, saved_at_ms))?)
}

/// Parse a JSON save envelope and check version compatibility.
pub fn deserialize(json: &str) -> Result<SaveData, SaveError> {
    let save: SaveData = serde_json::from_str(json)?;
    if save.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            found: save.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    Ok(save)
}

/// Merge a save payload into a fresh state built from the current catalog.
///
/// Catalog is authoritative for what exists; the save is authoritative for
/// progress on what still exists. Rates are recomputed unconditionally so a
/// rebalanced catalog takes effect on load.
pub fn reconcile(catalog: &Catalog, save: &GameSave) -> GameState {
    let mut state = GameState::new(catalog);
    state.ledger.energy = save.energy.max(0.0);
    state.ledger.total_energy = save.total_energy.max(0.0);
    state.ledger.click_count = save.click_count;
    state.time = save.time.max(0.0);

    for saved in &save.units {
        let Some(unit) = state.unit_mut(&saved.id) else {
            continue; // unit no longer in the catalog
        };
        unit.count = saved.count.min(MAX_LEVEL);
        unit.unlocked = saved.unlocked;
        unit.is_shiny = saved.is_shiny;
        unit.level = saved.level.unwrap_or(saved.count).min(MAX_LEVEL);
        unit.experience_value = saved.experience_value.unwrap_or(saved.count).min(MAX_LEVEL);
        let tree = crate::catalog::build_skill_tree(&unit.id);
        unit.unlocked_skills = saved
            .unlocked_skills
            .iter()
            .filter(|id| tree.iter().any(|n| &n.id == *id))
            .cloned()
            .collect();
    }

    for id in &save.purchased_upgrades {
        if let Some(upgrade) = state.upgrade_mut(id) {
            upgrade.purchased = true;
        }
    }

    state.active_boosts = save
        .active_boosts
        .iter()
        .filter(|b| catalog.boost(&b.boost_id).is_some())
        .cloned()
        .collect();
    state.cooldowns = save
        .cooldowns
        .iter()
        .filter(|(id, _)| catalog.boost(id).is_some())
        .map(|(id, at)| (id.clone(), *at))
        .collect();

    recompute_rates(&mut state);
    state
}

/// Grant the energy the game would have produced while closed.
///
/// The sim clock advances by the wall-clock gap first, then expired boosts
/// are swept and rates recomputed, and only then is the grant computed: a
/// boost that was live at save time never pays out past its own expiry.
/// Offline time credits passive production only, never clicks.
pub fn offline_catch_up(state: &mut GameState, saved_at_ms: f64, now_ms: f64) -> f64 {
    let elapsed = (now_ms - saved_at_ms) / 1000.0;
    if !elapsed.is_finite() || elapsed <= 0.0 {
        return 0.0;
    }
    state.time += elapsed;
    state.active_boosts.retain(|b| b.expires_at > state.time);
    recompute_rates(state);

    let earned = state.ledger.energy_per_second * elapsed;
    if earned > 0.0 {
        state.ledger.energy += earned;
        state.ledger.total_energy += earned;
    }
    engine::auto_unlock(state);
    earned
}

/// Full restore pipeline: parse, reconcile, catch up. Returns the restored
/// state and the offline earnings (for a "while you were away" report).
pub fn restore(catalog: &Catalog, json: &str, now_ms: f64) -> Result<(GameState, f64), SaveError> {
    let save = deserialize(json)?;
    let mut state = reconcile(catalog, &save.game);
    let earned = offline_catch_up(&mut state, save.saved_at_ms, now_ms);
    Ok((state, earned))
}

/// Encode a game as a portable export string (base64 over the JSON save).
pub fn export(state: &GameState, saved_at_ms: f64) -> Result<String, SaveError> {
    Ok(BASE64.encode(serialize(state, saved_at_ms)?))
}

/// Decode an export string produced by [`export`] and restore it.
pub fn import(catalog: &Catalog, encoded: &str, now_ms: f64) -> Result<(GameState, f64), SaveError> {
    let bytes = BASE64.decode(encoded.trim())?;
    let json = String::from_utf8(bytes)?;
    restore(catalog, &json, now_ms)
}
