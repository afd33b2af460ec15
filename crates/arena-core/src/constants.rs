//! Simulation constants and tuning parameters.

/// Target frame rate of the frame clock (Hz).
pub const TARGET_FPS: u32 = 60;

/// Nominal seconds per tick at the target frame rate.
pub const DT: f64 = 1.0 / TARGET_FPS as f64;

/// Largest delta time a single tick will integrate. Longer frames are capped.
pub const MAX_FRAME_DT: f64 = 0.05;

/// Upper bound on teams in a match.
pub const MAX_TEAMS: usize = 6;

// --- Ships ---

/// Ship collision diameter.
pub const SHIP_SIZE: f64 = 34.0;

pub const SHIP_BASE_HP: f64 = 100.0;
pub const SHIP_BASE_SHIELD: f64 = 60.0;

/// Shield regeneration per second while not invulnerable.
pub const SHIELD_REGEN: f64 = 8.0;

/// Invulnerability granted on spawn and respawn (seconds).
pub const INVULN_TIME: f64 = 3.0;

/// Max speed gained per level above 1.
pub const SPEED_PER_LEVEL: f64 = 6.0;

/// Max speed fraction gained per speed upgrade above 1.
pub const SPEED_PER_UPGRADE: f64 = 0.08;

/// Per-tick velocity damping factor.
pub const VELOCITY_DAMPING: f64 = 0.98;

/// Movement multiplier while slowed.
pub const SLOW_FACTOR: f64 = 0.6;

/// Acceleration per unit of player movement intent.
pub const PLAYER_ACCEL: f64 = 900.0;

/// Placement attempts before respawn falls back to an unchecked point.
pub const RESPAWN_ATTEMPTS: u32 = 20;

/// Distance kept from a spawn zone's edge when placing ships.
pub const SPAWN_MARGIN: f64 = 40.0;

/// Side length of a team's spawn zone.
pub const SPAWN_ZONE_SIZE: f64 = 600.0;

// --- Progression ---

pub const SPHERE_BASE_REQUIREMENT: f64 = 8.0;
pub const SPHERE_STEP: f64 = 1.5;
pub const MAX_LEVEL: u32 = 100;

/// Levels at which a class point for each tier is granted.
pub const CLASS_TIER_LEVELS: [u32; 5] = [8, 20, 35, 50, 70];

/// Cap on any generic upgrade or weapon level.
pub const MAX_UPGRADE_LEVEL: u32 = 15;

pub const KILL_SCORE: u32 = 100;
pub const CAPTURE_SCORE: u32 = 50;

// --- Weapons ---

/// Hard floor on any weapon cooldown.
pub const MIN_WEAPON_COOLDOWN: f64 = 0.08;

/// Base Blaster shots per second.
pub const BLASTER_FIRE_RATE: f64 = 4.0;

/// Fire-rate bonus per global fire-rate upgrade above 1.
pub const FIRE_RATE_PER_UPGRADE: f64 = 0.05;

/// Damage bonus per damage upgrade above 1.
pub const DAMAGE_PER_UPGRADE: f64 = 0.06;

pub const BASE_CRIT_CHANCE: f64 = 0.02;
pub const CRIT_PER_UPGRADE: f64 = 0.01;
pub const CRIT_MULTIPLIER: f64 = 2.0;

/// Half-angle of a shotgun pellet's random spread (radians).
pub const SHOTGUN_SPREAD: f64 = 0.28;

/// Angular offset of the outer Triple bullets (radians).
pub const TRIPLE_OFFSET: f64 = 0.12;

pub const BULLET_RADIUS: f64 = 4.0;
pub const BULLET_LIFE: f64 = 1.6;

pub const MISSILE_SPEED: f64 = 400.0;
pub const MISSILE_TURN_RATE: f64 = 3.2;
pub const MISSILE_LIFE: f64 = 4.0;
pub const MISSILE_DAMAGE: f64 = 35.0;
pub const MISSILE_RADIUS: f64 = 6.0;

pub const LASER_LENGTH: f64 = 820.0;
pub const LASER_DURATION: f64 = 0.45;
/// Fraction of beam damage applied per second of contact.
pub const LASER_TICK_FACTOR: f64 = 0.9;
/// Shield takes beam damage at this rate...
pub const LASER_SHIELD_RATE: f64 = 1.7;
/// ...while health bleeds through at this rate.
pub const LASER_BLEED_RATE: f64 = 0.25;
/// Health rate once the shield is gone.
pub const LASER_HULL_RATE: f64 = 0.7;

pub const ARC_DURATION: f64 = 0.22;

pub const GRAVITY_RADIUS: f64 = 240.0;
pub const GRAVITY_STRENGTH: f64 = 900.0;
pub const GRAVITY_DURATION: f64 = 0.45;
/// Damage per second dealt to enemy ships inside a pulse.
pub const GRAVITY_DPS: f64 = 1.0;

pub const PLASMA_SPEED: f64 = 750.0;
pub const PLASMA_LIFE: f64 = 2.0;
pub const PLASMA_RADIUS: f64 = 8.0;

pub const VOID_SPEED: f64 = 650.0;
pub const VOID_LIFE: f64 = 2.5;
pub const VOID_RADIUS: f64 = 10.0;

// --- Status effects: (duration secs, magnitude per sec) ---

pub const ACID_DOT: (f64, f64) = (2.2, 6.0);
pub const PLASMA_BURN: (f64, f64) = (3.0, 5.0);
pub const VOID_CORRUPTION: (f64, f64) = (4.0, 6.0);
/// Slow applied by a void projectile hit (seconds).
pub const VOID_SLOW_SECS: f64 = 2.0;

// --- Abilities ---

pub const REINFORCE_CD: f64 = 20.0;
pub const REINFORCE_LIFETIME: f64 = 20.0;
pub const QUANTUM_CD: f64 = 25.0;
pub const TELEPORT_CD: f64 = 15.0;
pub const ULTIMATE_CD: f64 = 60.0;

/// Cooldown fraction removed per ability upgrade level.
pub const ABILITY_CD_PER_UPGRADE: f64 = 0.05;

/// Teleport targets closer than this to the arena edge are rejected.
pub const TELEPORT_EDGE_MARGIN: f64 = 50.0;

pub const BARRAGE_BULLETS: usize = 8;
pub const BARRAGE_DAMAGE: f64 = 50.0;
pub const VOID_BURST_RADIUS: f64 = 400.0;
pub const VOID_BURST_DAMAGE: f64 = 30.0;
pub const VOID_BURST_CORRUPTION: (f64, f64) = (3.0, 8.0);
pub const TIME_SLOW_RADIUS: f64 = 500.0;
pub const TIME_SLOW_SECS: f64 = 5.0;

// --- Trail ---

/// Damage per second dealt by energy-trail segments.
pub const TRAIL_DPS: f64 = 12.0;
/// Per-tick chance of dropping a trail segment.
pub const TRAIL_DROP_CHANCE: f64 = 0.9;

// --- Capture points ---

/// Progress decay rate for non-occupying teams while one team holds the point.
pub const CAPTURE_DECAY_OTHERS: f64 = 0.8;
/// Progress decay rate while nobody is inside.
pub const CAPTURE_DECAY_EMPTY: f64 = 0.5;
/// Progress decay rate while contested.
pub const CAPTURE_DECAY_CONTESTED: f64 = 0.2;

// --- Pickups ---

pub const PICKUP_LIFE: f64 = 25.0;
pub const PICKUP_RADIUS: f64 = 8.0;
/// Scatter applied to dropped spheres on each axis.
pub const PICKUP_SCATTER: f64 = 20.0;

// --- Obstacles ---

/// Damage used to destroy a ship touching a lethal hazard.
pub const HAZARD_DAMAGE: f64 = 9999.0;
/// Random jitter applied after bumping into a block.
pub const OBSTACLE_JITTER: f64 = 6.0;

// --- AI ---

/// Acceleration toward the goal capture point.
pub const AI_GOAL_ACCEL: f64 = 420.0;
/// Additional acceleration toward the combat target.
pub const AI_TARGET_ACCEL: f64 = 120.0;
/// Radius within which a bot picks up a combat target.
pub const AI_DETECTION_RADIUS: f64 = 700.0;
/// Per-tick probability of firing at the current target.
pub const AI_FIRE_CHANCE: f64 = 0.9;
/// Per-tick probability of spending class points.
pub const AI_CLASS_SPEND_CHANCE: f64 = 0.02;
/// Per-tick probability of switching weapon.
pub const AI_WEAPON_SWITCH_CHANCE: f64 = 0.0025;
/// Per-tick probability of taking a random upgrade.
pub const AI_UPGRADE_CHANCE: f64 = 0.003;
/// Bots stop gifting themselves upgrade points at this balance.
pub const AI_UPGRADE_POINT_CAP: u32 = 6;
/// Aggro grace timer range (seconds).
pub const AI_AGGRO_GRACE: (f64, f64) = (2.0, 4.0);
