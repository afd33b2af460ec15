//! Random picks made by bots: class nodes, weapons and upgrades.

use rand::seq::SliceRandom;
use rand::Rng;

use arena_core::class_tree::ClassNodeId;
use arena_core::enums::{UpgradeKey, WeaponKind};

/// Uniform pick among the currently available nodes.
pub fn choose_class_node<R: Rng>(available: &[ClassNodeId], rng: &mut R) -> Option<ClassNodeId> {
    available.choose(rng).copied()
}

/// Uniform pick among unlocked weapons.
pub fn choose_weapon<R: Rng>(unlocked: &[WeaponKind], rng: &mut R) -> Option<WeaponKind> {
    unlocked.choose(rng).copied()
}

/// Random-upgrade candidates in the order they should be tried.
pub fn upgrade_order<R: Rng>(rng: &mut R) -> Vec<UpgradeKey> {
    let mut keys = UpgradeKey::random_pool();
    keys.shuffle(rng);
    keys
}
