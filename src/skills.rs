//! Skill tree engine: unlock gating over a unit's EV budget.
//!
//! A unit earns 1 EV per copy purchased and spends it on tree nodes. Spent
//! EV stays spent: unlocks are permanent and the remaining budget is always
//! `experience_value` minus the cost of everything already unlocked.

use crate::catalog::{build_skill_tree, SkillNodeDef};
use crate::state::ProductionUnit;

/// EV already sunk into unlocked nodes of this unit's tree.
pub fn spent_ev(unit: &ProductionUnit) -> u32 {
    build_skill_tree(&unit.id)
        .iter()
        .filter(|node| unit.unlocked_skills.contains(&node.id))
        .map(|node| node.cost)
        .sum()
}

/// EV still available to spend.
pub fn remaining_ev(unit: &ProductionUnit) -> u32 {
    unit.experience_value.saturating_sub(spent_ev(unit))
}

/// Whether `skill` may be unlocked right now: not already unlocked, every
/// prerequisite unlocked, and remaining EV covers the cost.
pub fn can_unlock(unit: &ProductionUnit, skill: &SkillNodeDef) -> bool {
    if unit.unlocked_skills.contains(&skill.id) {
        return false;
    }
    if !skill
        .prerequisites
        .iter()
        .all(|p| unit.unlocked_skills.contains(p))
    {
        return false;
    }
    remaining_ev(unit) >= skill.cost
}

/// Unlock a skill by id. Re-validates all three conditions before mutating,
/// since the caller may act on a stale snapshot; an invalid unlock is a
/// no-op, not an error. Returns whether the set changed.
pub fn unlock(unit: &mut ProductionUnit, skill_id: &str) -> bool {
    let tree = build_skill_tree(&unit.id);
    let Some(skill) = tree.iter().find(|n| n.id == skill_id) else {
        return false;
    };
    if !can_unlock(unit, skill) {
        return false;
    }
    unit.unlocked_skills.insert(skill.id.clone())
}
