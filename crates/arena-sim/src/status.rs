//! Timed debuffs: damage over time, slow and stun.
//!
//! Entries of the same kind stack independently. Resolution runs once per
//! tick per ship, before shield regeneration.

use arena_core::components::{Hull, StatusEffect, StatusEffects};
use arena_core::constants::SLOW_FACTOR;
use arena_core::enums::StatusKind;

/// Append a timed entry. Zero or negative durations are ignored.
pub fn add_effect(effects: &mut StatusEffects, kind: StatusKind, secs: f64, dps: f64) {
    if secs <= 0.0 {
        return;
    }
    effects.entries.push(StatusEffect { kind, remaining: secs, dps });
}

/// Extend the slow timer to at least `secs`.
pub fn add_slow(effects: &mut StatusEffects, secs: f64) {
    effects.slow_secs = effects.slow_secs.max(secs);
}

pub fn add_stun(effects: &mut StatusEffects, secs: f64) {
    effects.stun_secs = effects.stun_secs.max(secs);
}

/// Advance every entry by `dt`, applying its damage to the hull.
///
/// Damage lands on health directly; void corruption also drains shield at
/// half rate and keeps the ship slowed while it lasts. An invulnerable
/// hull takes nothing but timers still run, so spawn protection and
/// quantum invulnerability shelter a ship from burns too. Returns true if
/// health reached zero, in which case every entry is dropped.
pub fn resolve(hull: &mut Hull, effects: &mut StatusEffects, dt: f64) -> bool {
    let protected = hull.invuln_secs > 0.0;
    let mut slow = 0.0_f64;

    for entry in effects.entries.iter_mut() {
        if !protected {
            hull.hp -= entry.dps * dt;
            if entry.kind == StatusKind::Void {
                hull.shield = (hull.shield - entry.dps * 0.5 * dt).max(0.0);
            }
        }
        entry.remaining -= dt;
        if entry.kind == StatusKind::Void && entry.remaining > 0.0 {
            slow = slow.max(entry.remaining);
        }
    }

    if hull.hp <= 0.0 {
        effects.entries.clear();
        return true;
    }
    effects.entries.retain(|e| e.remaining > 0.0);
    add_slow(effects, slow);
    false
}

/// Movement multiplier from slow and stun, ticking both timers down.
pub fn movement_factor(effects: &mut StatusEffects, dt: f64) -> f64 {
    let mut factor = 1.0;
    if effects.slow_secs > 0.0 {
        factor *= SLOW_FACTOR;
        effects.slow_secs = (effects.slow_secs - dt).max(0.0);
    }
    if effects.stun_secs > 0.0 {
        factor = 0.0;
        effects.stun_secs = (effects.stun_secs - dt).max(0.0);
    }
    factor
}

pub fn has(effects: &StatusEffects, kind: StatusKind) -> bool {
    effects.entries.iter().any(|e| e.kind == kind)
}
