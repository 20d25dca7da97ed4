use serde::Serialize;

use crate::constants::*;
use crate::rng::SeededRng;

use super::boss::Boss;
use super::enemy::Enemy;

/// Boss waves fire on a fixed cadence: every tenth wave.
pub fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// Grunt cadence tightens as waves climb, floored so late waves stay sane.
pub fn grunt_spawn_interval_ms(wave: u32) -> f32 {
    (GRUNT_INTERVAL_BASE_MS - wave as f32 * GRUNT_INTERVAL_STEP_MS).max(GRUNT_INTERVAL_FLOOR_MS)
}

/// Which boss archetype a given boss wave fields. Cycles through the three
/// variants in order, so wave 10 gets the first, wave 20 the second, and so
/// on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BossVariant {
    PhasedFire,
    LockOnDash,
    Summoner,
}

pub fn boss_variant_for_wave(wave: u32) -> BossVariant {
    match (wave / BOSS_WAVE_INTERVAL).saturating_sub(1) % 3 {
        0 => BossVariant::PhasedFire,
        1 => BossVariant::LockOnDash,
        _ => BossVariant::Summoner,
    }
}

/// Per-archetype spawn timers plus the per-wave boss latch. Regular spawning
/// suspends entirely on boss waves; the latch guarantees exactly one boss per
/// boss wave and resets on every wave transition.
#[derive(Clone, Debug, Serialize)]
pub struct SpawnScheduler {
    grunt_timer_ms: f32,
    shooter_timer_ms: f32,
    tank_timer_ms: f32,
    sprinter_timer_ms: f32,
    boss_spawned: bool,
}

impl SpawnScheduler {
    pub(crate) fn new() -> Self {
        Self {
            grunt_timer_ms: 0.0,
            shooter_timer_ms: 0.0,
            tank_timer_ms: 0.0,
            sprinter_timer_ms: 0.0,
            boss_spawned: false,
        }
    }

    pub(crate) fn begin_wave(&mut self) {
        self.boss_spawned = false;
    }

    pub(crate) fn tick(
        &mut self,
        delta_ms: f32,
        wave: u32,
        enemy_multiplier: f32,
        rng: &mut SeededRng,
        enemies: &mut Vec<Enemy>,
        bosses: &mut Vec<Boss>,
    ) {
        if is_boss_wave(wave) {
            if !self.boss_spawned {
                self.boss_spawned = true;
                bosses.push(match boss_variant_for_wave(wave) {
                    BossVariant::PhasedFire => Boss::phased_fire(enemy_multiplier, rng),
                    BossVariant::LockOnDash => Boss::lock_on_dash(enemy_multiplier),
                    BossVariant::Summoner => Boss::summoner(enemy_multiplier),
                });
            }
            return;
        }

        self.grunt_timer_ms += delta_ms;
        if self.grunt_timer_ms > grunt_spawn_interval_ms(wave) {
            self.grunt_timer_ms = 0.0;
            let x = rng.next_range_f32(0.0, ARENA_WIDTH - GRUNT_SIZE.0);
            enemies.push(Enemy::grunt(x, enemy_multiplier));
        }

        self.shooter_timer_ms += delta_ms;
        if self.shooter_timer_ms > SHOOTER_INTERVAL_MS {
            self.shooter_timer_ms = 0.0;
            let x = rng.next_range_f32(0.0, ARENA_WIDTH - SHOOTER_SIZE.0);
            enemies.push(Enemy::shooter(x, enemy_multiplier));
        }

        self.tank_timer_ms += delta_ms;
        if self.tank_timer_ms > TANK_INTERVAL_MS && wave >= TANK_FIRST_WAVE {
            self.tank_timer_ms = 0.0;
            let x = rng.next_range_f32(0.0, ARENA_WIDTH - TANK_SIZE.0);
            enemies.push(Enemy::tank(x, enemy_multiplier, rng));
        }

        self.sprinter_timer_ms += delta_ms;
        if self.sprinter_timer_ms > SPRINTER_INTERVAL_MS && wave >= SPRINTER_FIRST_WAVE {
            self.sprinter_timer_ms = 0.0;
            let x = rng.next_range_f32(0.0, ARENA_WIDTH - SPRINTER_SIZE.0);
            enemies.push(Enemy::sprinter(x, enemy_multiplier));
        }
    }
}
