//! Tuning constants for the simulation. All speeds are world units per
//! millisecond; all durations are milliseconds.

pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 600.0;
/// Projectiles and enemies are culled once they leave the arena by this much.
pub const OFFSCREEN_MARGIN: f32 = 50.0;

pub const PLAYER_SIZE: f32 = 30.0;
pub const PLAYER_SPAWN_Y: f32 = 550.0;
pub const PLAYER_SPEED: f32 = 0.3;
pub const PLAYER_MAX_HEALTH: i32 = 10;
pub const PLAYER_DAMAGE: i32 = 1;
pub const PLAYER_BULLET_SPEED: f32 = 0.5;
pub const PLAYER_SHOOT_COOLDOWN_MS: f32 = 200.0;
pub const PLAYER_SHOOT_COOLDOWN_FLOOR_MS: f32 = 50.0;
pub const SHIELD_DURATION_MS: f32 = 1000.0;
pub const STARTING_LIVES: i32 = 3;

/// Angular spacing between multi-shot projectiles, radians.
pub const MULTI_SHOT_SPREAD_RAD: f32 = 0.25;

pub const BULLET_WIDTH: f32 = 4.0;
pub const BULLET_HEIGHT: f32 = 10.0;
/// Wall reflection damping: the reflected axis loses more energy.
pub const RICOCHET_AXIS_DAMPING: f32 = 0.85;
pub const RICOCHET_CROSS_DAMPING: f32 = 0.95;

pub const GRUNT_SIZE: (f32, f32) = (30.0, 30.0);
pub const GRUNT_SPEED: f32 = 0.10;
pub const GRUNT_CONTACT_DAMAGE: i32 = 1;

pub const SHOOTER_SIZE: (f32, f32) = (30.0, 30.0);
pub const SHOOTER_SPEED: f32 = 0.08;
pub const SHOOTER_CONTACT_DAMAGE: i32 = 2;
pub const SHOOTER_COOLDOWN_BASE_MS: f32 = 1500.0;
pub const SHOOTER_COOLDOWN_FLOOR_MS: f32 = 800.0;
pub const SHOOTER_BULLET_SPEED: f32 = 0.25;

pub const TANK_SIZE: (f32, f32) = (50.0, 40.0);
pub const TANK_SPEED: f32 = 0.03;
pub const TANK_DRIFT_SPEED: f32 = 0.02;
pub const TANK_HP: i32 = 3;
pub const TANK_CONTACT_DAMAGE: i32 = 2;
pub const TANK_COOLDOWN_BASE_MS: f32 = 2000.0;
pub const TANK_COOLDOWN_FLOOR_MS: f32 = 1000.0;
pub const TANK_BULLET_SPEED: f32 = 0.2;
pub const TANK_SPREAD_STEP: f32 = 0.3;

pub const SPRINTER_SIZE: (f32, f32) = (25.0, 25.0);
pub const SPRINTER_SPEED: f32 = 0.4;
pub const SPRINTER_HP: i32 = 1;
pub const SPRINTER_CONTACT_DAMAGE: i32 = 1;
pub const SPRINTER_TRACK_SPEED: f32 = 0.1;
pub const SPRINTER_DASH_TRACK_SPEED: f32 = 0.5;
pub const SPRINTER_DASH_COOLDOWN_BASE_MS: f32 = 3000.0;
pub const SPRINTER_DASH_COOLDOWN_FLOOR_MS: f32 = 2000.0;
pub const SPRINTER_DASH_DURATION_MS: f32 = 500.0;

pub const PHASED_FIRE_SIZE: (f32, f32) = (60.0, 40.0);
pub const PHASED_FIRE_HP: i32 = 85;
pub const PHASED_FIRE_SPEED: f32 = 0.10;
pub const PHASED_FIRE_CONTACT_DAMAGE: i32 = 4;
pub const PHASED_FIRE_BULLET_SPEED: f32 = 0.25;
pub const PHASED_FIRE_SPREAD_STEP: f32 = 0.4;
pub const PHASED_FIRE_SPECIAL_BULLETS: u32 = 8;
pub const PHASED_FIRE_SPECIAL_SPEED: f32 = 0.2;
pub const PHASED_FIRE_SPECIAL_BASE_MS: f32 = 5000.0;
pub const PHASED_FIRE_SPECIAL_FLOOR_MS: f32 = 3000.0;

pub const LOCK_ON_SIZE: (f32, f32) = (50.0, 60.0);
pub const LOCK_ON_HP: i32 = 65;
pub const LOCK_ON_CONTACT_DAMAGE: i32 = 8;
pub const LOCK_ON_DASH_DAMAGE: i32 = 16;
pub const LOCK_ON_HOME_SPEED: f32 = 0.5;
pub const LOCK_ON_DASH_SPEED: f32 = 1.2;
pub const LOCK_ON_DASH_RANGE: f32 = 300.0;
pub const LOCK_ON_DURATION_MS: f32 = 1500.0;
pub const LOCK_ON_ROTATION_RATE: f32 = 0.002;
pub const LOCK_ON_COOLDOWN_MS: f32 = 3000.0;

pub const SUMMONER_SIZE: (f32, f32) = (40.0, 30.0);
pub const SUMMONER_HP: i32 = 45;
pub const SUMMONER_CONTACT_DAMAGE: i32 = 3;
pub const SUMMONER_PREFERRED_DISTANCE: f32 = 200.0;
pub const SUMMONER_DRIFT_SPEED: f32 = 0.1;
pub const SUMMONER_RETREAT_SPEED: f32 = 0.25;
pub const SUMMONER_RETREAT_MIN_MS: f32 = 1000.0;
pub const SUMMONER_SAFE_ZONE_Y: f32 = 60.0;
pub const SUMMONER_WAVE_COOLDOWN_MS: f32 = 3500.0;
pub const SUMMONER_SPAWN_DELAY_MS: f32 = 500.0;

pub const ENEMY_SPAWN_Y: f32 = -40.0;
pub const BOSS_SPAWN_Y: f32 = -60.0;

/// Grunt cadence shrinks with the wave number but never below the floor.
pub const GRUNT_INTERVAL_BASE_MS: f32 = 1200.0;
pub const GRUNT_INTERVAL_STEP_MS: f32 = 50.0;
pub const GRUNT_INTERVAL_FLOOR_MS: f32 = 300.0;
pub const SHOOTER_INTERVAL_MS: f32 = 6000.0;
pub const TANK_INTERVAL_MS: f32 = 10_000.0;
pub const TANK_FIRST_WAVE: u32 = 2;
pub const SPRINTER_INTERVAL_MS: f32 = 8000.0;
pub const SPRINTER_FIRST_WAVE: u32 = 3;

pub const BOSS_WAVE_INTERVAL: u32 = 10;
pub const PRE_BOSS_COUNTDOWN_MS: f32 = 3000.0;

pub const WAVE_REQUIREMENT_START: u32 = 300;
pub const WAVE_REQUIREMENT_STEP: u32 = 50;
/// Difficulty and payout cadence: every wave whose number divides by this.
pub const DIFFICULTY_WAVE_STRIDE: u32 = 5;
pub const ENEMY_MULTIPLIER_STEP: f32 = 0.3;
pub const DAMAGE_MULTIPLIER_STEP: f32 = 0.5;
pub const PAYOUT_UNIT: u32 = 3;

pub const EXP_TO_LEVEL_START: u32 = 100;
pub const EXP_CURVE_FACTOR: f32 = 1.5;
pub const UPGRADE_CHOICES: usize = 3;

pub const SCORE_GRUNT_KILL: u32 = 10;
pub const EXP_GRUNT_KILL: u32 = 5;
pub const SCORE_SHOOTER_KILL: u32 = 25;
pub const EXP_SHOOTER_KILL: u32 = 12;
pub const SCORE_TANK_HIT: u32 = 5;
pub const EXP_TANK_HIT: u32 = 3;
pub const SCORE_TANK_KILL: u32 = 50;
pub const EXP_TANK_KILL: u32 = 25;
pub const SCORE_SPRINTER_HIT: u32 = 8;
pub const EXP_SPRINTER_HIT: u32 = 4;
pub const SCORE_SPRINTER_KILL: u32 = 75;
pub const EXP_SPRINTER_KILL: u32 = 35;
pub const SCORE_BOSS_HIT: u32 = 15;
pub const EXP_BOSS_HIT: u32 = 8;
pub const SCORE_BOSS_KILL: u32 = 200;
pub const EXP_BOSS_KILL: u32 = 100;

pub const LIFE_STEAL_HEAL: i32 = 1;
pub const LIFE_STEAL_BOSS_HEAL: i32 = 3;

pub const EXPLOSION_PARTICLES: u32 = 8;
pub const PARTICLE_LIFE_MS: f32 = 1000.0;
pub const PARTICLE_MAX_DRIFT: f32 = 0.2;

/// Upper bound on the score a single wave can plausibly produce; used by the
/// server-side validator to reject impossible client reports. A boss wave is
/// worth a few hundred points plus trash kills, so this leaves wide headroom.
pub const MAX_PLAUSIBLE_WAVE_SCORE: u32 = 10_000;
