//! Shared per-match state threaded explicitly through every system.
//!
//! Anything a ship, weapon or ability needs beyond its own components
//! (randomness, event output, pending spawns, ship lookup) lives here and
//! is passed by `&mut` reference. Nothing is reached through a global.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_core::components::*;
use arena_core::config::MatchConfig;
use arena_core::events::AudioEvent;
use arena_core::types::{Rect, ShipId, TeamId, Vec2};

/// Something to add to the world once the current system releases its
/// borrows.
#[derive(Debug, Clone)]
pub enum Spawn {
    Projectile {
        owner: Owner,
        position: Vec2,
        velocity: Vec2,
        projectile: Projectile,
        homing: Option<Homing>,
    },
    Beam {
        owner: Owner,
        beam: Beam,
    },
    /// A resolved chain arc: `hits` take `damage` in order, `path` is drawn.
    Arc {
        owner: Owner,
        path: Vec<Vec2>,
        hits: Vec<ShipId>,
        damage: f64,
    },
    Pulse {
        owner: Owner,
        position: Vec2,
        pulse: GravityPulse,
    },
    Trail {
        owner: Owner,
        position: Vec2,
        segment: TrailSegment,
    },
    Pickup {
        position: Vec2,
        value: u32,
    },
    Reinforcement {
        summoner: ShipId,
        team: TeamId,
        position: Vec2,
        lifetime: f64,
        zone: Rect,
    },
}

/// Explicit simulation context.
pub struct SimContext {
    pub config: MatchConfig,
    pub rng: ChaCha8Rng,
    pub events: Vec<AudioEvent>,
    pub spawns: Vec<Spawn>,
    pub despawn_buffer: Vec<Entity>,
    /// Visible region, used for AI aggro.
    pub viewport: Rect,
    ships: HashMap<ShipId, Entity>,
    next_ship_id: u32,
}

impl SimContext {
    pub fn new(config: MatchConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            events: Vec::new(),
            spawns: Vec::new(),
            despawn_buffer: Vec::new(),
            viewport: Rect::default(),
            ships: HashMap::new(),
            next_ship_id: 0,
        }
    }

    /// Clear all per-match state and reseed.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.events.clear();
        self.spawns.clear();
        self.despawn_buffer.clear();
        self.ships.clear();
        self.next_ship_id = 0;
    }

    pub fn allocate_ship_id(&mut self) -> ShipId {
        let id = ShipId(self.next_ship_id);
        self.next_ship_id += 1;
        id
    }

    pub fn register_ship(&mut self, id: ShipId, entity: Entity) {
        self.ships.insert(id, entity);
    }

    pub fn unregister_ship(&mut self, id: ShipId) {
        self.ships.remove(&id);
    }

    pub fn ship_entity(&self, id: ShipId) -> Option<Entity> {
        self.ships.get(&id).copied()
    }

    pub fn arena(&self) -> Rect {
        Rect::new(0.0, 0.0, self.config.arena_width, self.config.arena_height)
    }

    /// Despawn everything collected in the despawn buffer.
    pub fn flush_despawns(&mut self, world: &mut World) {
        for entity in self.despawn_buffer.drain(..) {
            let _ = world.despawn(entity);
        }
    }
}
