use serde::Serialize;

mod boss;
mod enemy;
mod game;
mod player;
mod projectile;
mod waves;

pub use boss::{
    phased_fire_phase, Boss, BossKind, DashState, LockOnDash, PhasedFire, SummonMove, Summoner,
};
pub use enemy::{Enemy, EnemyKind, EnemyTag};
pub use game::Game;
pub use player::{Player, Upgrade};
pub use projectile::Projectile;
pub use waves::{
    boss_variant_for_wave, grunt_spawn_interval_ms, is_boss_wave, BossVariant, SpawnScheduler,
};

/// What the presentation layer should be showing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    Start,
    Running,
    Paused,
    LevelUp,
    PreBoss,
}

/// Evidence that the entry fee settled. Issued by whatever gates play
/// (normally the payment server); the simulation never starts a run without
/// one, replacing the ambient has-paid flag of older builds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryTicket {
    pub session_id: String,
}

impl EntryTicket {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// Final tally of a finished run, kept on the snapshot after the game
/// returns to the start screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub score: u32,
    pub wave_reached: u32,
    pub level: u32,
    pub payout_earned: u32,
}

/// Cosmetic explosion debris. No gameplay effect.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life_ms: f32,
    pub max_life_ms: f32,
}

impl Particle {
    pub(crate) fn update(&mut self, delta_ms: f32) {
        self.x += self.vx * delta_ms;
        self.y += self.vy * delta_ms;
        self.life_ms -= delta_ms;
    }

    pub fn alive(&self) -> bool {
        self.life_ms > 0.0
    }
}

/// Read-only view of the whole world, rebuilt on demand for the renderer.
#[derive(Clone, Debug, Serialize)]
pub struct WorldSnapshot {
    pub mode: UiMode,
    pub score: u32,
    pub lives: i32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next_level: u32,
    pub wave_number: u32,
    pub wave_progress: u32,
    pub wave_requirement: u32,
    pub enemy_multiplier: f32,
    pub damage_multiplier: f32,
    pub payout_earned: u32,
    pub preboss_remaining_ms: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Boss>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub pending_upgrades: Vec<Upgrade>,
    pub last_run: Option<RunSummary>,
}

#[inline]
pub(crate) fn aabb_overlap(
    ax: f32,
    ay: f32,
    aw: f32,
    ah: f32,
    bx: f32,
    by: f32,
    bw: f32,
    bh: f32,
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Unit vector from `(fx, fy)` toward `(tx, ty)`. Coincident points fall back
/// to straight down rather than dividing by zero.
#[inline]
pub(crate) fn unit_toward(fx: f32, fy: f32, tx: f32, ty: f32) -> (f32, f32) {
    let dx = tx - fx;
    let dy = ty - fy;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance > 0.0 {
        (dx / distance, dy / distance)
    } else {
        (0.0, 1.0)
    }
}

#[inline]
pub(crate) fn distance_between(fx: f32, fy: f32, tx: f32, ty: f32) -> f32 {
    let dx = tx - fx;
    let dy = ty - fy;
    (dx * dx + dy * dy).sqrt()
}

#[inline]
pub(crate) fn scaled_damage(base: i32, multiplier: f32) -> i32 {
    (base.max(1) as f32 * multiplier).ceil() as i32
}
