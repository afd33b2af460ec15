//! Spheres, levels, generic upgrades and class-node purchases.

use rand::Rng;

use arena_ai::choices::upgrade_order;
use arena_core::class_tree::{self, ClassNodeId};
use arena_core::components::*;
use arena_core::constants::*;
use arena_core::enums::{ShipKind, UpgradeKey, WeaponKind};
use arena_core::modifiers::{ClassTree, ModKey, ModValue};

/// Spheres needed to leave `level`.
pub fn spheres_needed(level: u32) -> f64 {
    SPHERE_BASE_REQUIREMENT + SPHERE_STEP * (level.saturating_sub(1)) as f64
}

/// Grant one class point per tier threshold reached, each tier once.
pub fn grant_class_points(prog: &mut Progression) {
    while prog.tiers_granted < CLASS_TIER_LEVELS.len() && prog.level >= CLASS_TIER_LEVELS[prog.tiers_granted] {
        prog.class_points += 1;
        prog.tiers_granted += 1;
    }
}

/// Add collected spheres, scaled by the resource upgrade, and level up as
/// many times as they allow. Returns the number of levels gained.
pub fn award_spheres(prog: &mut Progression, upgrades: &Upgrades, spheres: u32) -> u32 {
    let gain = (spheres as f64 * (1.0 + 0.1 * upgrades.resource as f64)).floor();
    prog.spheres += gain;

    let mut gained = 0;
    while prog.level < MAX_LEVEL && prog.spheres >= spheres_needed(prog.level) {
        prog.spheres -= spheres_needed(prog.level);
        prog.level += 1;
        prog.upgrade_points += 1;
        gained += 1;
    }
    if gained > 0 {
        grant_class_points(prog);
    }
    gained
}

/// Mutable view over the components progression touches.
pub struct Sheet<'a> {
    pub kind: ShipKind,
    pub hull: &'a mut Hull,
    pub loadout: &'a mut Loadout,
    pub upgrades: &'a mut Upgrades,
    pub progression: &'a mut Progression,
    pub tree: &'a mut ClassTree,
}

fn bump(level: &mut u32) -> bool {
    if *level >= MAX_UPGRADE_LEVEL {
        return false;
    }
    *level += 1;
    true
}

/// Spend one upgrade point on `key`. Returns false, changing nothing, when
/// no point is available or the key is already maxed.
pub fn apply_upgrade(sheet: &mut Sheet, key: UpgradeKey) -> bool {
    if sheet.progression.upgrade_points == 0 {
        return false;
    }
    let up = &mut *sheet.upgrades;
    let applied = match key {
        UpgradeKey::Speed => bump(&mut up.speed),
        UpgradeKey::FireRate => bump(&mut up.firerate),
        UpgradeKey::Damage => bump(&mut up.damage),
        UpgradeKey::Trail => bump(&mut up.trail),
        UpgradeKey::Resource => bump(&mut up.resource),
        UpgradeKey::Crit => bump(&mut up.crit),
        UpgradeKey::Reinforce => bump(&mut up.reinforce),
        UpgradeKey::Quantum => bump(&mut up.quantum),
        UpgradeKey::Teleport => bump(&mut up.teleport),
        UpgradeKey::Ultimate => bump(&mut up.ultimate),
        UpgradeKey::Armor => {
            let ok = bump(&mut up.armor);
            if ok {
                let hull = &mut *sheet.hull;
                hull.max_hp += 6.0;
                hull.max_shield += 6.0;
                hull.shield_regen += 0.6;
                hull.hp = (hull.hp + 6.0).min(hull.max_hp);
                hull.shield = (hull.shield + 6.0).min(hull.max_shield);
            }
            ok
        }
        UpgradeKey::Weapon(weapon) => {
            let slot = &mut sheet.loadout.slots[weapon.index()];
            if !slot.unlocked {
                slot.unlocked = true;
                if sheet.kind == ShipKind::Player {
                    sheet.loadout.selected = weapon;
                }
                true
            } else {
                bump(&mut slot.level)
            }
        }
    };
    if applied {
        sheet.progression.upgrade_points -= 1;
    }
    applied
}

/// Try upgrade keys in random order until one is accepted.
pub fn apply_random_upgrade<R: Rng>(sheet: &mut Sheet, rng: &mut R) -> Option<UpgradeKey> {
    upgrade_order(rng).into_iter().find(|&key| apply_upgrade(sheet, key))
}

/// Nodes this sheet may buy right now, including the point balance.
pub fn purchasable_nodes(sheet: &Sheet) -> Vec<ClassNodeId> {
    if sheet.progression.class_points == 0 {
        return Vec::new();
    }
    class_tree::available_nodes(sheet.progression.level, sheet.tree.nodes())
}

/// Buy a class node. Already-held or unavailable nodes are rejected with
/// no state change.
pub fn acquire_class_node(sheet: &mut Sheet, id: ClassNodeId) -> bool {
    if sheet.progression.class_points == 0
        || !class_tree::is_available(id, sheet.progression.level, sheet.tree.nodes())
    {
        return false;
    }
    if !sheet.tree.insert(id) {
        return false;
    }
    sheet.progression.class_points -= 1;

    // Instant effects scale current maxima by this node's own factors.
    let hull = &mut *sheet.hull;
    for &(key, value) in class_tree::node(id).mods {
        match (key, value) {
            (ModKey::HpMul, ModValue::Mul(m)) => hull.max_hp = (hull.max_hp * m).floor(),
            (ModKey::ShieldMul, ModValue::Mul(m)) => hull.max_shield = (hull.max_shield * m).floor(),
            _ => {}
        }
    }
    hull.hp = hull.hp.min(hull.max_hp);
    hull.shield = hull.shield.min(hull.max_shield);

    if sheet.tree.flag(ModKey::TripleUnlock) {
        sheet.loadout.slots[WeaponKind::Triple.index()].unlocked = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Parts {
        hull: Hull,
        loadout: Loadout,
        upgrades: Upgrades,
        progression: Progression,
        tree: ClassTree,
    }

    impl Parts {
        fn new() -> Self {
            Self {
                hull: Hull::default(),
                loadout: Loadout::default(),
                upgrades: Upgrades::default(),
                progression: Progression::default(),
                tree: ClassTree::new(),
            }
        }

        fn sheet(&mut self, kind: ShipKind) -> Sheet<'_> {
            Sheet {
                kind,
                hull: &mut self.hull,
                loadout: &mut self.loadout,
                upgrades: &mut self.upgrades,
                progression: &mut self.progression,
                tree: &mut self.tree,
            }
        }
    }

    #[test]
    fn test_sphere_requirement_grows() {
        assert!((spheres_needed(1) - 8.0).abs() < 1e-12);
        assert!((spheres_needed(2) - 9.5).abs() < 1e-12);
        assert!((spheres_needed(11) - 23.0).abs() < 1e-12);
    }

    #[test]
    fn test_multi_level_up_keeps_remainder() {
        let mut prog = Progression::default();
        let gained = award_spheres(&mut prog, &Upgrades::default(), 20);
        // 8 for level 1, 9.5 for level 2, 2.5 left over.
        assert_eq!(gained, 2);
        assert_eq!(prog.level, 3);
        assert_eq!(prog.upgrade_points, 2);
        assert!((prog.spheres - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_resource_upgrade_scales_gain() {
        let mut prog = Progression::default();
        let up = Upgrades { resource: 5, ..Upgrades::default() };
        award_spheres(&mut prog, &up, 3);
        assert!((prog.spheres - 4.0).abs() < 1e-12, "floor(3 * 1.5)");
    }

    #[test]
    fn test_class_points_once_per_tier() {
        let mut prog = Progression { level: 21, ..Progression::default() };
        grant_class_points(&mut prog);
        assert_eq!(prog.class_points, 2);
        grant_class_points(&mut prog);
        assert_eq!(prog.class_points, 2);
    }

    #[test]
    fn test_level_caps_at_max() {
        let mut prog = Progression { level: MAX_LEVEL, ..Progression::default() };
        assert_eq!(award_spheres(&mut prog, &Upgrades::default(), 10_000), 0);
        assert_eq!(prog.level, MAX_LEVEL);
    }

    #[test]
    fn test_upgrade_needs_point_and_caps() {
        let mut p = Parts::new();
        assert!(!apply_upgrade(&mut p.sheet(ShipKind::Bot), UpgradeKey::Speed));
        p.progression.upgrade_points = 20;
        p.upgrades.speed = MAX_UPGRADE_LEVEL;
        assert!(!apply_upgrade(&mut p.sheet(ShipKind::Bot), UpgradeKey::Speed));
        assert_eq!(p.progression.upgrade_points, 20);
        assert!(apply_upgrade(&mut p.sheet(ShipKind::Bot), UpgradeKey::Crit));
        assert_eq!(p.upgrades.crit, 1);
        assert_eq!(p.progression.upgrade_points, 19);
    }

    #[test]
    fn test_armor_raises_maxima_within_bounds() {
        let mut p = Parts::new();
        p.progression.upgrade_points = 1;
        assert!(apply_upgrade(&mut p.sheet(ShipKind::Bot), UpgradeKey::Armor));
        assert_eq!(p.hull.max_hp, 106.0);
        assert_eq!(p.hull.max_shield, 66.0);
        assert!(p.hull.hp <= p.hull.max_hp);
        assert!(p.hull.shield <= p.hull.max_shield);
        assert!((p.hull.shield_regen - 8.6).abs() < 1e-12);
    }

    #[test]
    fn test_weapon_key_unlocks_then_levels() {
        let mut p = Parts::new();
        p.progression.upgrade_points = 2;
        assert!(apply_upgrade(&mut p.sheet(ShipKind::Player), UpgradeKey::Weapon(WeaponKind::Laser)));
        assert!(p.loadout.slots[WeaponKind::Laser.index()].unlocked);
        assert_eq!(p.loadout.selected, WeaponKind::Laser);
        assert!(apply_upgrade(&mut p.sheet(ShipKind::Player), UpgradeKey::Weapon(WeaponKind::Laser)));
        assert_eq!(p.loadout.slots[WeaponKind::Laser.index()].level, 2);

        let mut bot = Parts::new();
        bot.progression.upgrade_points = 1;
        apply_upgrade(&mut bot.sheet(ShipKind::Bot), UpgradeKey::Weapon(WeaponKind::Arc));
        assert_eq!(bot.loadout.selected, WeaponKind::Blaster, "bots keep their weapon");
    }

    #[test]
    fn test_random_upgrade_spends_one_point() {
        let mut p = Parts::new();
        p.progression.upgrade_points = 3;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(apply_random_upgrade(&mut p.sheet(ShipKind::Bot), &mut rng).is_some());
        assert_eq!(p.progression.upgrade_points, 2);
    }

    #[test]
    fn test_acquire_node_rules() {
        let mut p = Parts::new();
        p.progression.level = 8;
        assert!(!acquire_class_node(&mut p.sheet(ShipKind::Bot), ClassNodeId::Twin), "no point");
        p.progression.class_points = 2;
        assert!(!acquire_class_node(&mut p.sheet(ShipKind::Bot), ClassNodeId::TripleTwin), "wrong tier");
        assert!(acquire_class_node(&mut p.sheet(ShipKind::Bot), ClassNodeId::Twin));
        assert!(p.loadout.slots[WeaponKind::Triple.index()].unlocked);
        assert_eq!(p.progression.class_points, 1);

        // Re-adding changes nothing.
        let before = p.tree.resolved();
        assert!(!acquire_class_node(&mut p.sheet(ShipKind::Bot), ClassNodeId::Twin));
        assert_eq!(p.progression.class_points, 1);
        assert_eq!(p.tree.resolved(), before);
    }

    #[test]
    fn test_hp_multiplier_clamps_current() {
        let mut p = Parts::new();
        p.progression.level = 35;
        p.progression.class_points = 3;
        for id in [ClassNodeId::Sniper, ClassNodeId::Ranger, ClassNodeId::Assassin] {
            assert!(acquire_class_node(&mut p.sheet(ShipKind::Bot), id), "{id}");
        }
        assert_eq!(p.hull.max_hp, 92.0);
        assert_eq!(p.hull.hp, 92.0);
    }

    #[test]
    fn test_purchasable_requires_point() {
        let mut p = Parts::new();
        p.progression.level = 10;
        assert!(purchasable_nodes(&p.sheet(ShipKind::Bot)).is_empty());
        p.progression.class_points = 1;
        assert_eq!(purchasable_nodes(&p.sheet(ShipKind::Bot)).len(), 6);
    }
}
