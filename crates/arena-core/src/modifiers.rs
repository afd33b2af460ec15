//! Class modifier engine.
//!
//! A ship's acquired class nodes fold into one table of modifiers:
//! multiplicative fields start at 1.0 and multiply, additive fields start
//! at 0.0 and sum, flags start false and OR. Every fold is commutative so
//! node order never matters. The folded table is cached behind an explicit
//! dirty flag and recomputed lazily on the next read after a node is added.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::class_tree::{self, ClassNodeId};

/// How a modifier field combines across nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModKind {
    Multiplicative,
    Additive,
    Flag,
}

/// A modifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModKey {
    SpeedMul,
    DamageMul,
    FireRateMul,
    HpMul,
    ShieldMul,
    AllStatsMul,
    LaserDamageMul,
    LaserLenAdd,
    ArcChainAdd,
    ArcRangeAdd,
    GravityRadiusMul,
    GravityStrengthMul,
    MissileDamageMul,
    MissileTurnMul,
    MissileCountAdd,
    ShotgunPelletsAdd,
    AcidDpsMul,
    PlasmaDamageMul,
    PlasmaExplosionMul,
    VoidDamageMul,
    VoidRangeMul,
    VoidRadiusMul,
    CritAdd,
    TripleUnlock,
    UltimateUnlock,
    Stealth,
    VoidMastery,
    GravityVoidSynergy,
    OmegaMode,
}

impl ModKey {
    pub const COUNT: usize = 29;

    pub const ALL: [ModKey; Self::COUNT] = [
        ModKey::SpeedMul,
        ModKey::DamageMul,
        ModKey::FireRateMul,
        ModKey::HpMul,
        ModKey::ShieldMul,
        ModKey::AllStatsMul,
        ModKey::LaserDamageMul,
        ModKey::LaserLenAdd,
        ModKey::ArcChainAdd,
        ModKey::ArcRangeAdd,
        ModKey::GravityRadiusMul,
        ModKey::GravityStrengthMul,
        ModKey::MissileDamageMul,
        ModKey::MissileTurnMul,
        ModKey::MissileCountAdd,
        ModKey::ShotgunPelletsAdd,
        ModKey::AcidDpsMul,
        ModKey::PlasmaDamageMul,
        ModKey::PlasmaExplosionMul,
        ModKey::VoidDamageMul,
        ModKey::VoidRangeMul,
        ModKey::VoidRadiusMul,
        ModKey::CritAdd,
        ModKey::TripleUnlock,
        ModKey::UltimateUnlock,
        ModKey::Stealth,
        ModKey::VoidMastery,
        ModKey::GravityVoidSynergy,
        ModKey::OmegaMode,
    ];

    /// Snake-case field name, as used by external tooling.
    pub fn name(self) -> &'static str {
        match self {
            ModKey::SpeedMul => "speed_mul",
            ModKey::DamageMul => "damage_mul",
            ModKey::FireRateMul => "firerate_mul",
            ModKey::HpMul => "hp_mul",
            ModKey::ShieldMul => "shield_mul",
            ModKey::AllStatsMul => "all_stats_mul",
            ModKey::LaserDamageMul => "laser_damage_mul",
            ModKey::LaserLenAdd => "laser_len_add",
            ModKey::ArcChainAdd => "arc_chain_add",
            ModKey::ArcRangeAdd => "arc_range_add",
            ModKey::GravityRadiusMul => "gravity_radius_mul",
            ModKey::GravityStrengthMul => "gravity_strength_mul",
            ModKey::MissileDamageMul => "missile_damage_mul",
            ModKey::MissileTurnMul => "missile_turn_mul",
            ModKey::MissileCountAdd => "missile_count_add",
            ModKey::ShotgunPelletsAdd => "shotgun_pellets_add",
            ModKey::AcidDpsMul => "acid_dps_mul",
            ModKey::PlasmaDamageMul => "plasma_damage_mul",
            ModKey::PlasmaExplosionMul => "plasma_explosion_mul",
            ModKey::VoidDamageMul => "void_damage_mul",
            ModKey::VoidRangeMul => "void_range_mul",
            ModKey::VoidRadiusMul => "void_radius_mul",
            ModKey::CritAdd => "crit_add",
            ModKey::TripleUnlock => "triple_unlock",
            ModKey::UltimateUnlock => "ultimate_unlock",
            ModKey::Stealth => "stealth",
            ModKey::VoidMastery => "void_mastery",
            ModKey::GravityVoidSynergy => "gravity_void_synergy",
            ModKey::OmegaMode => "omega_mode",
        }
    }

    /// Combination rule, derived from the field-name suffix.
    pub fn kind(self) -> ModKind {
        let name = self.name();
        if name.ends_with("_mul") {
            ModKind::Multiplicative
        } else if name.ends_with("_add") {
            ModKind::Additive
        } else {
            ModKind::Flag
        }
    }

    /// Identity value for this field's combination rule.
    pub fn baseline(self) -> f64 {
        match self.kind() {
            ModKind::Multiplicative => 1.0,
            ModKind::Additive | ModKind::Flag => 0.0,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for ModKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModKey::ALL.iter().copied().find(|k| k.name() == s).ok_or(())
    }
}

/// One effect contributed by a class node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModValue {
    Mul(f64),
    Add(f64),
    Flag,
}

/// A fully folded modifier table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedModifiers {
    values: [f64; ModKey::COUNT],
}

impl Default for ResolvedModifiers {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ResolvedModifiers {
    /// The table of a ship with no class nodes.
    pub fn baseline() -> Self {
        let mut values = [0.0; ModKey::COUNT];
        for key in ModKey::ALL {
            values[key.index()] = key.baseline();
        }
        Self { values }
    }

    /// Fold the modifiers of every node in `nodes` into a fresh table.
    pub fn fold<'a>(nodes: impl IntoIterator<Item = &'a ClassNodeId>) -> Self {
        let mut table = Self::baseline();
        for id in nodes {
            for &(key, value) in class_tree::node(*id).mods {
                let slot = &mut table.values[key.index()];
                match value {
                    ModValue::Mul(v) => *slot *= v,
                    ModValue::Add(v) => *slot += v,
                    ModValue::Flag => *slot = 1.0,
                }
            }
        }
        table
    }

    pub fn get(&self, key: ModKey) -> f64 {
        self.values[key.index()]
    }

    pub fn flag(&self, key: ModKey) -> bool {
        self.values[key.index()] != 0.0
    }

    /// Additive field rounded down to a count (chain hops, pellets, missiles).
    pub fn count(&self, key: ModKey) -> u32 {
        self.get(key).max(0.0) as u32
    }
}

/// A ship's acquired class nodes and their cached modifier table (ECS component).
#[derive(Debug, Clone, Default)]
pub struct ClassTree {
    nodes: BTreeSet<ClassNodeId>,
    cache: ResolvedModifiers,
    dirty: bool,
}

impl ClassTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Returns false (and changes nothing) if already held.
    pub fn insert(&mut self, node: ClassNodeId) -> bool {
        if !self.nodes.insert(node) {
            return false;
        }
        self.invalidate();
        true
    }

    /// Mark the cached table stale.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn contains(&self, node: ClassNodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn nodes(&self) -> &BTreeSet<ClassNodeId> {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The folded table, recomputed first if stale.
    pub fn resolved(&mut self) -> ResolvedModifiers {
        if self.dirty {
            self.cache = ResolvedModifiers::fold(&self.nodes);
            self.dirty = false;
        }
        self.cache
    }

    pub fn get(&mut self, key: ModKey) -> f64 {
        self.resolved().get(key)
    }

    pub fn flag(&mut self, key: ModKey) -> bool {
        self.resolved().flag(key)
    }

    /// Look a field up by name; unknown names yield `default`.
    pub fn get_modifier(&mut self, key: &str, default: f64) -> f64 {
        match key.parse::<ModKey>() {
            Ok(k) => self.get(k),
            Err(()) => default,
        }
    }
}
