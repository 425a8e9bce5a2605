//! Poke Clicker: a deterministic idle-economy engine for the browser.
//!
//! The crate is the full game logic with no rendering attached: a resource
//! ledger, stackable production units with evolution stages and per-unit
//! skill trees, one-time upgrades, time-boxed boosts with cooldowns, and a
//! versioned save format with offline catch-up. All mutation funnels through
//! [`engine::dispatch`]; given the same action sequence, two runs produce
//! identical states.
//!
//! A frontend holds a [`session::GameSession`], forwards user intents as
//! [`engine::Action`]s and calls [`session::GameSession::frame`] from its
//! draw loop. On wasm32, [`storage`] persists saves to localStorage.

pub mod catalog;
pub mod engine;
pub mod production;
pub mod save;
pub mod scaling;
pub mod session;
pub mod skills;
pub mod state;
pub mod storage;
pub mod time;

#[cfg(test)]
mod simulator;
