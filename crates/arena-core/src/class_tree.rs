//! Static class-node (perk) definitions and the availability rule.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CLASS_TIER_LEVELS;
use crate::enums::UltimateKind;
use crate::modifiers::{ModKey, ModValue};

/// Identifier of a class node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassNodeId {
    // Tier 0
    Twin,
    Sniper,
    Trapper,
    Gunner,
    Hunter,
    Mage,
    // Tier 1
    TripleTwin,
    Ranger,
    MegaTrap,
    Streamliner,
    Predator,
    Warlock,
    // Tier 2
    Battleship,
    Assassin,
    Overtrapper,
    Skimmer,
    Annihilator,
    Archmage,
    // Tier 3
    Titan,
    Shadow,
    Overlord,
    Destroyer,
    Doomsday,
    Elder,
    // Tier 4
    Legend,
    VoidLord,
    Omega,
}

/// Immutable perk definition.
#[derive(Debug)]
pub struct ClassNode {
    pub id: ClassNodeId,
    pub name: &'static str,
    pub tier: usize,
    pub requires: &'static [ClassNodeId],
    /// Top-tier nodes merge two lineages, so holding any one of their
    /// prerequisites is enough. Lower tiers need all of them.
    pub requires_any: bool,
    pub mods: &'static [(ModKey, ModValue)],
}

use ClassNodeId as N;
use ModKey as K;
use ModValue::{Add, Flag, Mul};

const fn def(
    id: ClassNodeId,
    name: &'static str,
    tier: usize,
    requires: &'static [ClassNodeId],
    mods: &'static [(ModKey, ModValue)],
) -> ClassNode {
    ClassNode { id, name, tier, requires, requires_any: tier == 4, mods }
}

/// Every class node, indexed by `ClassNodeId as usize`.
pub static CLASS_NODES: [ClassNode; ClassNodeId::COUNT] = [
    def(N::Twin, "Twin", 0, &[], &[(K::FireRateMul, Mul(1.12)), (K::TripleUnlock, Flag)]),
    def(
        N::Sniper,
        "Sniper",
        0,
        &[],
        &[
            (K::LaserDamageMul, Mul(1.2)),
            (K::LaserLenAdd, Add(160.0)),
            (K::SpeedMul, Mul(0.92)),
            (K::CritAdd, Add(0.05)),
        ],
    ),
    def(
        N::Trapper,
        "Trapper",
        0,
        &[],
        &[(K::GravityRadiusMul, Mul(1.25)), (K::ArcChainAdd, Add(1.0)), (K::SpeedMul, Mul(0.95))],
    ),
    def(N::Gunner, "Gunner", 0, &[], &[(K::FireRateMul, Mul(1.18)), (K::ShotgunPelletsAdd, Add(2.0))]),
    def(N::Hunter, "Hunter", 0, &[], &[(K::MissileDamageMul, Mul(1.15)), (K::AcidDpsMul, Mul(1.2))]),
    def(N::Mage, "Mage", 0, &[], &[(K::PlasmaDamageMul, Mul(1.25)), (K::VoidRangeMul, Mul(1.3))]),
    def(
        N::TripleTwin,
        "Triple Twin",
        1,
        &[N::Twin],
        &[(K::FireRateMul, Mul(1.10)), (K::DamageMul, Mul(1.08))],
    ),
    def(N::Ranger, "Ranger", 1, &[N::Sniper], &[(K::LaserLenAdd, Add(220.0)), (K::CritAdd, Add(0.04))]),
    def(
        N::MegaTrap,
        "Mega Trap",
        1,
        &[N::Trapper],
        &[(K::GravityRadiusMul, Mul(1.25)), (K::GravityStrengthMul, Mul(1.15))],
    ),
    def(N::Streamliner, "Streamliner", 1, &[N::Gunner], &[(K::FireRateMul, Mul(1.20))]),
    def(
        N::Predator,
        "Predator",
        1,
        &[N::Hunter],
        &[(K::MissileTurnMul, Mul(1.25)), (K::SpeedMul, Mul(1.05))],
    ),
    def(
        N::Warlock,
        "Warlock",
        1,
        &[N::Mage],
        &[(K::PlasmaExplosionMul, Mul(1.3)), (K::VoidDamageMul, Mul(1.2))],
    ),
    def(
        N::Battleship,
        "Battleship",
        2,
        &[N::TripleTwin],
        &[(K::HpMul, Mul(1.12)), (K::ShieldMul, Mul(1.12)), (K::SpeedMul, Mul(0.92))],
    ),
    def(
        N::Assassin,
        "Assassin",
        2,
        &[N::Ranger],
        &[(K::DamageMul, Mul(1.15)), (K::CritAdd, Add(0.08)), (K::HpMul, Mul(0.92))],
    ),
    def(
        N::Overtrapper,
        "Overtrapper",
        2,
        &[N::MegaTrap],
        &[(K::ArcChainAdd, Add(2.0)), (K::ArcRangeAdd, Add(120.0))],
    ),
    def(
        N::Skimmer,
        "Skimmer",
        2,
        &[N::Streamliner],
        &[(K::DamageMul, Mul(1.10)), (K::FireRateMul, Mul(1.08))],
    ),
    def(
        N::Annihilator,
        "Annihilator",
        2,
        &[N::Predator],
        &[(K::MissileDamageMul, Mul(1.25)), (K::FireRateMul, Mul(0.85))],
    ),
    def(
        N::Archmage,
        "Archmage",
        2,
        &[N::Warlock],
        &[(K::PlasmaDamageMul, Mul(1.2)), (K::VoidRadiusMul, Mul(1.4))],
    ),
    def(
        N::Titan,
        "Titan",
        3,
        &[N::Battleship],
        &[(K::HpMul, Mul(1.25)), (K::ShieldMul, Mul(1.25)), (K::DamageMul, Mul(1.1))],
    ),
    def(
        N::Shadow,
        "Shadow",
        3,
        &[N::Assassin],
        &[(K::SpeedMul, Mul(1.15)), (K::CritAdd, Add(0.12)), (K::Stealth, Flag)],
    ),
    def(
        N::Overlord,
        "Overlord",
        3,
        &[N::Overtrapper],
        &[(K::GravityRadiusMul, Mul(1.5)), (K::ArcChainAdd, Add(3.0))],
    ),
    def(
        N::Destroyer,
        "Destroyer",
        3,
        &[N::Skimmer],
        &[(K::DamageMul, Mul(1.25)), (K::FireRateMul, Mul(1.15))],
    ),
    def(
        N::Doomsday,
        "Doomsday",
        3,
        &[N::Annihilator],
        &[(K::MissileDamageMul, Mul(1.4)), (K::MissileCountAdd, Add(2.0))],
    ),
    def(
        N::Elder,
        "Elder",
        3,
        &[N::Archmage],
        &[(K::PlasmaDamageMul, Mul(1.3)), (K::VoidDamageMul, Mul(1.4))],
    ),
    def(
        N::Legend,
        "Legend",
        4,
        &[N::Titan, N::Shadow],
        &[(K::AllStatsMul, Mul(1.2)), (K::UltimateUnlock, Flag)],
    ),
    def(
        N::VoidLord,
        "Void Lord",
        4,
        &[N::Overlord, N::Elder],
        &[(K::VoidMastery, Flag), (K::GravityVoidSynergy, Flag), (K::UltimateUnlock, Flag)],
    ),
    def(
        N::Omega,
        "Omega",
        4,
        &[N::Destroyer, N::Doomsday],
        &[(K::OmegaMode, Flag), (K::DamageMul, Mul(1.5)), (K::UltimateUnlock, Flag)],
    ),
];

impl ClassNodeId {
    pub const COUNT: usize = 27;

    pub fn all() -> impl Iterator<Item = ClassNodeId> {
        CLASS_NODES.iter().map(|n| n.id)
    }

    /// Identifier as written in commands and config (`"TripleTwin"`).
    pub fn as_str(self) -> &'static str {
        match self {
            N::Twin => "Twin",
            N::Sniper => "Sniper",
            N::Trapper => "Trapper",
            N::Gunner => "Gunner",
            N::Hunter => "Hunter",
            N::Mage => "Mage",
            N::TripleTwin => "TripleTwin",
            N::Ranger => "Ranger",
            N::MegaTrap => "MegaTrap",
            N::Streamliner => "Streamliner",
            N::Predator => "Predator",
            N::Warlock => "Warlock",
            N::Battleship => "Battleship",
            N::Assassin => "Assassin",
            N::Overtrapper => "Overtrapper",
            N::Skimmer => "Skimmer",
            N::Annihilator => "Annihilator",
            N::Archmage => "Archmage",
            N::Titan => "Titan",
            N::Shadow => "Shadow",
            N::Overlord => "Overlord",
            N::Destroyer => "Destroyer",
            N::Doomsday => "Doomsday",
            N::Elder => "Elder",
            N::Legend => "Legend",
            N::VoidLord => "VoidLord",
            N::Omega => "Omega",
        }
    }
}

impl fmt::Display for ClassNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassNodeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClassNodeId::all().find(|id| id.as_str() == s).ok_or(())
    }
}

/// Definition for `id`.
pub fn node(id: ClassNodeId) -> &'static ClassNode {
    &CLASS_NODES[id as usize]
}

/// Level required to buy a node of `tier`.
pub fn tier_level(tier: usize) -> Option<u32> {
    CLASS_TIER_LEVELS.get(tier).copied()
}

/// Whether `id` may be bought now, ignoring class-point balance.
///
/// A ship climbs one lineage: the purchasable tier always equals the
/// number of nodes already held.
pub fn is_available(id: ClassNodeId, level: u32, held: &BTreeSet<ClassNodeId>) -> bool {
    let def = node(id);
    if held.contains(&id) || def.tier != held.len() {
        return false;
    }
    match tier_level(def.tier) {
        Some(need) if level >= need => {}
        _ => return false,
    }
    if def.requires.is_empty() {
        return true;
    }
    if def.requires_any {
        def.requires.iter().any(|r| held.contains(r))
    } else {
        def.requires.iter().all(|r| held.contains(r))
    }
}

/// Nodes purchasable now, in table order.
pub fn available_nodes(level: u32, held: &BTreeSet<ClassNodeId>) -> Vec<ClassNodeId> {
    ClassNodeId::all().filter(|&id| is_available(id, level, held)).collect()
}

/// Ultimate variant granted by the top-tier node held, if any.
pub fn ultimate_for(held: &BTreeSet<ClassNodeId>) -> Option<UltimateKind> {
    if held.contains(&N::Legend) {
        Some(UltimateKind::Barrage)
    } else if held.contains(&N::VoidLord) {
        Some(UltimateKind::VoidBurst)
    } else if held.contains(&N::Omega) {
        Some(UltimateKind::TimeSlow)
    } else {
        None
    }
}
