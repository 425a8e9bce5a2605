//! Browser persistence glue: localStorage reads and writes, WASM only.
//!
//! Failures never propagate into the game. A save that cannot be written is
//! logged and skipped; a save that cannot be read is logged, removed, and
//! treated as a new game. The format itself lives in [`crate::save`].

#[cfg(target_arch = "wasm32")]
use crate::catalog::Catalog;
#[cfg(target_arch = "wasm32")]
use crate::state::GameState;

/// localStorage key.
pub const STORAGE_KEY: &str = "poke_clicker_save";

/// Seconds of play between automatic saves.
pub const AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Write the current game to localStorage, stamped with the wall clock.
#[cfg(target_arch = "wasm32")]
pub fn persist(state: &GameState) {
    let now_ms = js_sys::Date::now();
    let json = match crate::save::serialize(state, now_ms) {
        Ok(j) => j,
        Err(e) => {
            web_sys::console::warn_1(&format!("poke-clicker: failed to serialize save: {e}").into());
            return;
        }
    };
    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            web_sys::console::warn_1(
                &format!("poke-clicker: failed to write localStorage: {e:?}").into(),
            );
        }
    }
}

/// Load and restore a saved game, including offline catch-up. Returns the
/// restored state and the offline earnings, or `None` when there is no
/// usable save (in which case any corrupt entry has been removed).
#[cfg(target_arch = "wasm32")]
pub fn restore(catalog: &Catalog) -> Option<(GameState, f64)> {
    let storage = get_storage()?;
    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return None,
    };
    match crate::save::restore(catalog, &json, js_sys::Date::now()) {
        Ok(restored) => Some(restored),
        Err(e) => {
            web_sys::console::warn_1(
                &format!("poke-clicker: discarding unreadable save: {e}").into(),
            );
            let _ = storage.remove_item(STORAGE_KEY);
            None
        }
    }
}

/// Delete any saved game.
#[cfg(target_arch = "wasm32")]
pub fn clear() {
    if let Some(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
