//! Content catalog: immutable definitions of production units, upgrades,
//! boosts and skill trees.
//!
//! The catalog has no behavior of its own: it supplies base numbers to the
//! scaling formulas and structure to the engine. Live game state is created
//! *from* these definitions and never mutates them; on load, a save is merged
//! against the current catalog so newly added entries appear with their
//! defaults and removed ones are dropped.

use serde::{Deserialize, Serialize};

/// Hard ceiling on a unit's level (and therefore its purchasable count).
/// Purchases are truncated at this ceiling, never overdrawn.
pub const MAX_LEVEL: u32 = 252;

/// Flat production multiplier granted by the one-way shiny flag.
/// A tuning number, not a correctness constant.
pub const SHINY_PRODUCTION_MULTIPLIER: f64 = 10.0;

/// A locked unit is revealed once lifetime energy reaches this fraction of
/// its base cost.
pub const UNLOCK_THRESHOLD_RATIO: f64 = 0.5;

/// Rarity tier of a unit. Stored explicitly on each definition so that cost
/// scaling never depends on a unit's position in the master list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Tier {
    /// Coefficient for the throughput-keyed logarithmic cost term.
    /// Rarer tiers react more strongly to the player's earning power.
    pub fn cost_coefficient(&self) -> f64 {
        match self {
            Tier::Common => 0.02,
            Tier::Uncommon => 0.04,
            Tier::Rare => 0.07,
            Tier::Epic => 0.11,
            Tier::Legendary => 0.16,
        }
    }
}

/// A cosmetic evolution stage: once `count` reaches `threshold` the unit is
/// displayed under a new identity. Production is unaffected.
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionStage {
    pub threshold: u32,
    pub name: String,
}

/// Static definition of a production unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitDef {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub base_cost: f64,
    /// Energy per second contributed by each owned copy.
    pub base_production: f64,
    pub evolutions: Vec<EvolutionStage>,
}

/// What a one-time upgrade does once purchased.
#[derive(Clone, Debug, PartialEq)]
pub enum UpgradeKind {
    /// Adds `value` to the click base.
    ClickBonus,
    /// Multiplies the click base by `value`.
    ClickMultiplier,
    /// Adds `value` percentage points to global production.
    GlobalPercent,
    /// Multiplies global production by `value`.
    GlobalMultiplier,
    /// Adds `value` to the targeted unit's per-copy base production.
    UnitBonus { target: String },
    /// Multiplies the targeted unit's production by `value`.
    UnitMultiplier { target: String },
}

/// Condition that must hold before an upgrade can be purchased.
#[derive(Clone, Debug, PartialEq)]
pub enum UnlockCondition {
    /// Lifetime energy reached the threshold.
    TotalEnergy(f64),
    /// A specific unit's owned count reached the threshold.
    UnitCount { unit: String, count: u32 },
    /// A specific unit's count crossed the given evolution stage.
    UnitEvolved { unit: String, stage: usize },
}

/// Static definition of a one-time upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub kind: UpgradeKind,
    pub value: f64,
    pub condition: Option<UnlockCondition>,
}

/// Effect category of a boost. At most one boost per kind is active at a
/// time; activating a new one of the same kind replaces the old instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostKind {
    /// Multiplies the click rate by `value` while active.
    ClickMultiplier,
    /// Multiplies total production by `value` while active.
    ProductionMultiplier,
    /// Immediately grants `value × total_energy`; never becomes active.
    InstantGrant,
    /// Generates `value` automatic clicks per second while active.
    AutoClick,
}

/// Static definition of a repeatable, cooldown-gated boost.
#[derive(Clone, Debug, PartialEq)]
pub struct BoostDef {
    pub id: String,
    pub name: String,
    pub base_cost: f64,
    /// Coefficient of the throughput-keyed logarithmic price term.
    pub cost_scale_factor: f64,
    pub kind: BoostKind,
    pub value: f64,
    /// 0 means instantaneous.
    pub duration_secs: f64,
    pub cooldown_secs: f64,
}

/// Effect of an unlocked skill node on its owning unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillKind {
    /// Adds `value` to the unit's per-copy base production.
    FlatBonus,
    /// Multiplies the unit's production by `value`.
    Multiplier,
}

/// A node in a unit's skill tree. Ids are namespaced per unit
/// (`"pikachu/focus-1"`). Layout coordinates are presentation-only.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillNodeDef {
    pub id: String,
    pub name: String,
    /// Price in experience value (EV).
    pub cost: u32,
    pub kind: SkillKind,
    pub value: f64,
    /// Sibling node ids that must all be unlocked first.
    pub prerequisites: Vec<String>,
    pub col: u8,
    pub row: u8,
}

/// Every unit owns a structurally identical skill tree, parameterized only
/// by the id prefix. Total cost across the tree deliberately exceeds the EV
/// budget cap, so a maxed unit still has to choose a path.
pub fn build_skill_tree(unit_id: &str) -> Vec<SkillNodeDef> {
    let node = |suffix: &str,
                name: &str,
                cost: u32,
                kind: SkillKind,
                value: f64,
                prereqs: &[&str],
                col: u8,
                row: u8| SkillNodeDef {
        id: format!("{unit_id}/{suffix}"),
        name: name.to_string(),
        cost,
        kind,
        value,
        prerequisites: prereqs.iter().map(|p| format!("{unit_id}/{p}")).collect(),
        col,
        row,
    };

    vec![
        node("focus-1", "Focus Energy", 10, SkillKind::FlatBonus, 0.2, &[], 0, 0),
        node("focus-2", "Sharpened Focus", 25, SkillKind::FlatBonus, 0.5, &["focus-1"], 0, 1),
        node("focus-3", "Total Focus", 60, SkillKind::FlatBonus, 1.5, &["focus-2"], 0, 2),
        node("surge-1", "Power Surge", 20, SkillKind::Multiplier, 1.10, &["focus-1"], 1, 1),
        node("surge-2", "Overcharge", 50, SkillKind::Multiplier, 1.25, &["surge-1"], 1, 2),
        node(
            "mastery",
            "Mastery",
            120,
            SkillKind::Multiplier,
            1.50,
            &["focus-3", "surge-2"],
            0,
            3,
        ),
    ]
}

/// The full immutable content set. Read-only input to the engine; the
/// presentation layer receives it from the catalog-loading module.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    pub units: Vec<UnitDef>,
    pub upgrades: Vec<UpgradeDef>,
    pub boosts: Vec<BoostDef>,
}

impl Catalog {
    pub fn unit(&self, id: &str) -> Option<&UnitDef> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn boost(&self, id: &str) -> Option<&BoostDef> {
        self.boosts.iter().find(|b| b.id == id)
    }

    /// The shipped content set.
    pub fn standard() -> Self {
        let unit = |id: &str,
                    name: &str,
                    tier: Tier,
                    base_cost: f64,
                    base_production: f64,
                    evolutions: &[(u32, &str)]| UnitDef {
            id: id.to_string(),
            name: name.to_string(),
            tier,
            base_cost,
            base_production,
            evolutions: evolutions
                .iter()
                .map(|(threshold, name)| EvolutionStage {
                    threshold: *threshold,
                    name: name.to_string(),
                })
                .collect(),
        };

        let units = vec![
            unit("caterpie", "Caterpie", Tier::Common, 15.0, 0.1, &[(30, "Metapod"), (90, "Butterfree")]),
            unit("pidgey", "Pidgey", Tier::Common, 100.0, 1.0, &[(40, "Pidgeotto"), (110, "Pidgeot")]),
            unit("pikachu", "Pikachu", Tier::Uncommon, 1_100.0, 8.0, &[(75, "Raichu")]),
            unit("machop", "Machop", Tier::Uncommon, 12_000.0, 47.0, &[(60, "Machoke"), (130, "Machamp")]),
            unit("eevee", "Eevee", Tier::Rare, 130_000.0, 260.0, &[]),
            unit("growlithe", "Growlithe", Tier::Rare, 1_400_000.0, 1_400.0, &[(80, "Arcanine")]),
            unit("dratini", "Dratini", Tier::Epic, 20_000_000.0, 7_800.0, &[(70, "Dragonair"), (140, "Dragonite")]),
            unit("snorlax", "Snorlax", Tier::Epic, 330_000_000.0, 44_000.0, &[]),
            unit("mewtwo", "Mewtwo", Tier::Legendary, 5_100_000_000.0, 260_000.0, &[]),
        ];

        let upgrade = |id: &str,
                       name: &str,
                       cost: f64,
                       kind: UpgradeKind,
                       value: f64,
                       condition: Option<UnlockCondition>| UpgradeDef {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            kind,
            value,
            condition,
        };
        let unit_count = |unit: &str, count: u32| {
            Some(UnlockCondition::UnitCount {
                unit: unit.to_string(),
                count,
            })
        };
        let evolved = |unit: &str, stage: usize| {
            Some(UnlockCondition::UnitEvolved {
                unit: unit.to_string(),
                stage,
            })
        };

        let upgrades = vec![
            upgrade("poke-ball-polish", "Poké Ball Polish", 100.0, UpgradeKind::ClickBonus, 1.0,
                Some(UnlockCondition::TotalEnergy(75.0))),
            upgrade("great-ball-polish", "Great Ball Polish", 1_500.0, UpgradeKind::ClickBonus, 4.0,
                Some(UnlockCondition::TotalEnergy(1_000.0))),
            upgrade("thunder-badge", "Thunder Badge", 12_000.0, UpgradeKind::ClickMultiplier, 2.0,
                Some(UnlockCondition::TotalEnergy(8_000.0))),
            upgrade("ultra-ball-polish", "Ultra Ball Polish", 90_000.0, UpgradeKind::ClickBonus, 20.0,
                Some(UnlockCondition::TotalEnergy(60_000.0))),
            upgrade("earth-badge", "Earth Badge", 1_200_000.0, UpgradeKind::ClickMultiplier, 3.0,
                Some(UnlockCondition::TotalEnergy(800_000.0))),
            upgrade("silk-scarf", "Silk Scarf", 500.0,
                UpgradeKind::UnitBonus { target: "caterpie".into() }, 0.1, unit_count("caterpie", 10)),
            upgrade("sharp-beak", "Sharp Beak", 2_500.0,
                UpgradeKind::UnitMultiplier { target: "pidgey".into() }, 2.0, unit_count("pidgey", 10)),
            upgrade("light-ball", "Light Ball", 30_000.0,
                UpgradeKind::UnitMultiplier { target: "pikachu".into() }, 2.0, unit_count("pikachu", 10)),
            upgrade("thunder-stone", "Thunder Stone", 250_000.0,
                UpgradeKind::UnitMultiplier { target: "pikachu".into() }, 3.0, evolved("pikachu", 0)),
            upgrade("black-belt", "Black Belt", 300_000.0,
                UpgradeKind::UnitBonus { target: "machop".into() }, 12.0, unit_count("machop", 25)),
            upgrade("dragon-scale", "Dragon Scale", 500_000_000.0,
                UpgradeKind::UnitMultiplier { target: "dratini".into() }, 2.0, evolved("dratini", 0)),
            upgrade("boulder-badge", "Boulder Badge", 50_000.0, UpgradeKind::GlobalPercent, 10.0,
                Some(UnlockCondition::TotalEnergy(25_000.0))),
            upgrade("cascade-badge", "Cascade Badge", 2_000_000.0, UpgradeKind::GlobalPercent, 15.0,
                Some(UnlockCondition::TotalEnergy(1_000_000.0))),
            upgrade("exp-share", "Exp. Share", 75_000_000.0, UpgradeKind::GlobalMultiplier, 2.0,
                Some(UnlockCondition::TotalEnergy(40_000_000.0))),
            upgrade("master-ball", "Master Ball", 12_000_000_000.0, UpgradeKind::GlobalMultiplier, 3.0,
                Some(UnlockCondition::TotalEnergy(6_000_000_000.0))),
        ];

        let boost = |id: &str,
                     name: &str,
                     base_cost: f64,
                     cost_scale_factor: f64,
                     kind: BoostKind,
                     value: f64,
                     duration_secs: f64,
                     cooldown_secs: f64| BoostDef {
            id: id.to_string(),
            name: name.to_string(),
            base_cost,
            cost_scale_factor,
            kind,
            value,
            duration_secs,
            cooldown_secs,
        };

        let boosts = vec![
            boost("x-attack", "X Attack", 500.0, 0.5, BoostKind::ClickMultiplier, 7.0, 30.0, 120.0),
            boost("amulet-coin", "Amulet Coin", 2_000.0, 0.8, BoostKind::ProductionMultiplier, 3.0, 60.0, 300.0),
            boost("helping-hand", "Helping Hand", 1_500.0, 0.6, BoostKind::AutoClick, 5.0, 45.0, 240.0),
            boost("pay-day", "Pay Day", 5_000.0, 1.0, BoostKind::InstantGrant, 0.05, 0.0, 600.0),
        ];

        Catalog {
            units,
            upgrades,
            boosts,
        }
    }
}
