use serde::Serialize;

use crate::constants::*;
use crate::rng::SeededRng;

use super::player::Player;
use super::projectile::Projectile;
use super::{scaled_damage, unit_toward};

/// Archetype tag, used for spawn tables and collision precedence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyTag {
    Grunt,
    Shooter,
    Tank,
    Sprinter,
}

/// Per-archetype behavior state. One collection holds every regular enemy;
/// the variant carries whatever timers that archetype needs.
#[derive(Clone, Debug, Serialize)]
pub enum EnemyKind {
    Grunt,
    Shooter {
        shoot_cooldown_ms: f32,
        since_last_shot_ms: f32,
    },
    Tank {
        shoot_cooldown_ms: f32,
        since_last_shot_ms: f32,
        drift_dir: f32,
    },
    Sprinter {
        dash_cooldown_ms: f32,
        dash_timer_ms: f32,
        dashing: bool,
        dash_target_x: f32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub contact_damage: i32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub(crate) fn spawn(tag: EnemyTag, x: f32, multiplier: f32, rng: &mut SeededRng) -> Self {
        match tag {
            EnemyTag::Grunt => Self::grunt(x, multiplier),
            EnemyTag::Shooter => Self::shooter(x, multiplier),
            EnemyTag::Tank => Self::tank(x, multiplier, rng),
            EnemyTag::Sprinter => Self::sprinter(x, multiplier),
        }
    }

    pub(crate) fn grunt(x: f32, multiplier: f32) -> Self {
        let (width, height) = GRUNT_SIZE;
        Self {
            x,
            y: ENEMY_SPAWN_Y,
            width,
            height,
            speed: GRUNT_SPEED * multiplier,
            // Grunts and shooters die to any hit regardless of scaling.
            hp: 1,
            max_hp: 1,
            contact_damage: scaled_damage(GRUNT_CONTACT_DAMAGE, multiplier),
            kind: EnemyKind::Grunt,
        }
    }

    pub(crate) fn shooter(x: f32, multiplier: f32) -> Self {
        let (width, height) = SHOOTER_SIZE;
        Self {
            x,
            y: ENEMY_SPAWN_Y,
            width,
            height,
            speed: SHOOTER_SPEED * multiplier,
            hp: 1,
            max_hp: 1,
            contact_damage: scaled_damage(SHOOTER_CONTACT_DAMAGE, multiplier),
            kind: EnemyKind::Shooter {
                shoot_cooldown_ms: (SHOOTER_COOLDOWN_BASE_MS / multiplier)
                    .max(SHOOTER_COOLDOWN_FLOOR_MS),
                since_last_shot_ms: 0.0,
            },
        }
    }

    pub(crate) fn tank(x: f32, multiplier: f32, rng: &mut SeededRng) -> Self {
        let (width, height) = TANK_SIZE;
        let hp = scaled_damage(TANK_HP, multiplier);
        Self {
            x,
            y: ENEMY_SPAWN_Y,
            width,
            height,
            speed: TANK_SPEED * multiplier,
            hp,
            max_hp: hp,
            contact_damage: scaled_damage(TANK_CONTACT_DAMAGE, multiplier),
            kind: EnemyKind::Tank {
                shoot_cooldown_ms: (TANK_COOLDOWN_BASE_MS / multiplier)
                    .max(TANK_COOLDOWN_FLOOR_MS),
                since_last_shot_ms: 0.0,
                drift_dir: if rng.next_unit_f32() > 0.5 { 1.0 } else { -1.0 },
            },
        }
    }

    pub(crate) fn sprinter(x: f32, multiplier: f32) -> Self {
        let (width, height) = SPRINTER_SIZE;
        let hp = scaled_damage(SPRINTER_HP, multiplier);
        Self {
            x,
            y: ENEMY_SPAWN_Y,
            width,
            height,
            speed: SPRINTER_SPEED * multiplier,
            hp,
            max_hp: hp,
            contact_damage: scaled_damage(SPRINTER_CONTACT_DAMAGE, multiplier),
            kind: EnemyKind::Sprinter {
                dash_cooldown_ms: (SPRINTER_DASH_COOLDOWN_BASE_MS / multiplier)
                    .max(SPRINTER_DASH_COOLDOWN_FLOOR_MS),
                dash_timer_ms: 0.0,
                dashing: false,
                dash_target_x: x,
            },
        }
    }

    pub fn tag(&self) -> EnemyTag {
        match self.kind {
            EnemyKind::Grunt => EnemyTag::Grunt,
            EnemyKind::Shooter { .. } => EnemyTag::Shooter,
            EnemyKind::Tank { .. } => EnemyTag::Tank,
            EnemyKind::Sprinter { .. } => EnemyTag::Sprinter,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub(crate) fn update(
        &mut self,
        delta_ms: f32,
        player: &Player,
        damage_multiplier: f32,
        projectiles: &mut Vec<Projectile>,
    ) {
        match &mut self.kind {
            EnemyKind::Grunt => {
                self.y += self.speed * delta_ms;
            }
            EnemyKind::Shooter {
                shoot_cooldown_ms,
                since_last_shot_ms,
            } => {
                self.y += self.speed * delta_ms;
                *since_last_shot_ms += delta_ms;
                if *since_last_shot_ms >= *shoot_cooldown_ms {
                    *since_last_shot_ms = 0.0;
                    let (cx, cy) = (self.x + self.width / 2.0, self.y + self.height);
                    let (px, py) = player.center();
                    let (dir_x, dir_y) = unit_toward(cx, cy, px, py);
                    projectiles.push(Projectile::enemy_shot(
                        cx,
                        cy,
                        dir_x * SHOOTER_BULLET_SPEED,
                        dir_y * SHOOTER_BULLET_SPEED,
                        scaled_damage(self.contact_damage, damage_multiplier),
                    ));
                }
            }
            EnemyKind::Tank {
                shoot_cooldown_ms,
                since_last_shot_ms,
                drift_dir,
            } => {
                self.y += self.speed * delta_ms;
                self.x += *drift_dir * TANK_DRIFT_SPEED * delta_ms;
                if self.x <= 0.0 || self.x >= ARENA_WIDTH - self.width {
                    *drift_dir = -*drift_dir;
                    self.x = self.x.clamp(0.0, ARENA_WIDTH - self.width);
                }

                *since_last_shot_ms += delta_ms;
                if *since_last_shot_ms >= *shoot_cooldown_ms {
                    *since_last_shot_ms = 0.0;
                    let (cx, cy) = (self.x + self.width / 2.0, self.y + self.height);
                    let (px, py) = player.center();
                    let (dir_x, dir_y) = unit_toward(cx, cy, px, py);
                    let damage = scaled_damage(self.contact_damage, damage_multiplier);
                    for i in -1..=1 {
                        projectiles.push(Projectile::enemy_shot(
                            cx,
                            cy,
                            dir_x * TANK_BULLET_SPEED + i as f32 * TANK_SPREAD_STEP,
                            dir_y * TANK_BULLET_SPEED,
                            damage,
                        ));
                    }
                }
            }
            EnemyKind::Sprinter {
                dash_cooldown_ms,
                dash_timer_ms,
                dashing,
                dash_target_x,
            } => {
                *dash_timer_ms += delta_ms;

                if !*dashing {
                    self.y += self.speed * delta_ms;

                    let (px, _) = player.center();
                    let dx = px - (self.x + self.width / 2.0);
                    if dx.abs() > 5.0 {
                        self.x += dx.signum() * SPRINTER_TRACK_SPEED * delta_ms;
                    }

                    if *dash_timer_ms >= *dash_cooldown_ms {
                        *dashing = true;
                        // Target x is locked at dash start; the player can dodge.
                        *dash_target_x =
                            (px - self.width / 2.0).clamp(0.0, ARENA_WIDTH - self.width);
                    }
                } else {
                    self.y += self.speed * 3.0 * delta_ms;

                    let dx = *dash_target_x - self.x;
                    if dx.abs() > 2.0 {
                        self.x += dx.signum() * SPRINTER_DASH_TRACK_SPEED * delta_ms;
                    }

                    if *dash_timer_ms >= *dash_cooldown_ms + SPRINTER_DASH_DURATION_MS {
                        *dashing = false;
                        *dash_timer_ms = 0.0;
                    }
                }

                self.x = self.x.clamp(0.0, ARENA_WIDTH - self.width);
            }
        }
    }

    /// Drifted past the bottom edge (dead enemies are pruned separately).
    pub(crate) fn off_screen(&self) -> bool {
        self.y > ARENA_HEIGHT + OFFSCREEN_MARGIN
    }
}
