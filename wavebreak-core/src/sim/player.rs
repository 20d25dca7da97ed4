use serde::Serialize;

use crate::constants::*;
use crate::input::FrameInput;

use super::projectile::Projectile;

/// The player ship and every upgrade-mutable combat stat.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub damage: i32,
    pub bullet_speed: f32,
    pub pierce: u32,
    pub ricochet: bool,
    pub ricochet_bounces: u32,
    pub multi_shot: u32,
    pub shoot_cooldown_ms: f32,
    pub shoot_cooldown_max_ms: f32,
    pub shield_duration_ms: f32,
    pub life_steal: bool,
    pub invulnerable_ms: f32,
}

impl Player {
    pub(crate) fn new() -> Self {
        Self {
            x: ARENA_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
            y: PLAYER_SPAWN_Y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            damage: PLAYER_DAMAGE,
            bullet_speed: PLAYER_BULLET_SPEED,
            pierce: 1,
            ricochet: false,
            ricochet_bounces: 0,
            multi_shot: 1,
            shoot_cooldown_ms: 0.0,
            shoot_cooldown_max_ms: PLAYER_SHOOT_COOLDOWN_MS,
            shield_duration_ms: SHIELD_DURATION_MS,
            life_steal: false,
            invulnerable_ms: 0.0,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Axis-aligned movement clamped to the arena, plus timer bookkeeping.
    pub(crate) fn update(&mut self, input: &FrameInput, delta_ms: f32) {
        let step = self.speed * delta_ms;
        if input.left {
            self.x = (self.x - step).max(0.0);
        }
        if input.right {
            self.x = (self.x + step).min(ARENA_WIDTH - self.width);
        }
        if input.up {
            self.y = (self.y - step).max(0.0);
        }
        if input.down {
            self.y = (self.y + step).min(ARENA_HEIGHT - self.height);
        }

        self.shoot_cooldown_ms = (self.shoot_cooldown_ms - delta_ms).max(0.0);
        self.invulnerable_ms = (self.invulnerable_ms - delta_ms).max(0.0);
    }

    /// Fire a fan of `multi_shot` projectiles toward the aim point. No-op
    /// while the cooldown is running. Returns true if anything was fired.
    pub(crate) fn try_shoot(
        &mut self,
        aim_x: f32,
        aim_y: f32,
        out: &mut Vec<Projectile>,
    ) -> bool {
        if self.shoot_cooldown_ms > 0.0 {
            return false;
        }
        self.shoot_cooldown_ms = self.shoot_cooldown_max_ms;

        let (cx, cy) = self.center();
        let dx = aim_x - cx;
        let dy = aim_y - cy;
        // Aim point on top of the ship: default to firing straight up.
        let base_angle = if dx == 0.0 && dy == 0.0 {
            -core::f32::consts::FRAC_PI_2
        } else {
            dy.atan2(dx)
        };

        let shots = self.multi_shot.max(1);
        let spread = if shots > 1 { MULTI_SHOT_SPREAD_RAD } else { 0.0 };
        let start_angle = base_angle - (shots - 1) as f32 * spread / 2.0;

        for i in 0..shots {
            let angle = start_angle + i as f32 * spread;
            out.push(Projectile::player_shot(self, angle));
        }

        true
    }

    /// Apply incoming damage unless shielded; arms the invulnerability
    /// window when damage lands. Returns true if damage was applied.
    pub(crate) fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = (self.health - amount).max(0);
        self.invulnerable_ms = self.shield_duration_ms;
        true
    }

    pub(crate) fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Refill after a life is lost; the shield window covers the respawn.
    pub(crate) fn restore_after_life_loss(&mut self) {
        self.health = self.max_health;
        self.invulnerable_ms = self.shield_duration_ms;
    }
}

/// The level-up upgrade pool. Each variant is a pure stat mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    ReinforcedHull,
    DamageBoost,
    FireRate,
    BulletSpeed,
    PierceShot,
    Ricochet,
    MultiShot,
    SpeedBoost,
    LifeSteal,
    ShieldRecharge,
}

impl Upgrade {
    pub const POOL: [Upgrade; 10] = [
        Upgrade::ReinforcedHull,
        Upgrade::DamageBoost,
        Upgrade::FireRate,
        Upgrade::BulletSpeed,
        Upgrade::PierceShot,
        Upgrade::Ricochet,
        Upgrade::MultiShot,
        Upgrade::SpeedBoost,
        Upgrade::LifeSteal,
        Upgrade::ShieldRecharge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ReinforcedHull => "Reinforced Hull",
            Self::DamageBoost => "Damage Boost",
            Self::FireRate => "Fire Rate",
            Self::BulletSpeed => "Bullet Speed",
            Self::PierceShot => "Pierce Shot",
            Self::Ricochet => "Ricochet",
            Self::MultiShot => "Multi Shot",
            Self::SpeedBoost => "Speed Boost",
            Self::LifeSteal => "Life Steal",
            Self::ShieldRecharge => "Shield Recharge",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ReinforcedHull => "+5 max shield, restored now",
            Self::DamageBoost => "+1 bullet damage",
            Self::FireRate => "Faster shooting",
            Self::BulletSpeed => "Faster bullets",
            Self::PierceShot => "Bullets go through one more enemy",
            Self::Ricochet => "Bullets bounce off walls (+2 bounces)",
            Self::MultiShot => "+1 bullet per shot",
            Self::SpeedBoost => "Move faster",
            Self::LifeSteal => "Recover shield on enemy kills",
            Self::ShieldRecharge => "Recover 5 lost shield",
        }
    }

    pub(crate) fn apply(self, player: &mut Player) {
        match self {
            Self::ReinforcedHull => {
                player.max_health += 5;
                player.health += 5;
            }
            Self::DamageBoost => player.damage += 1,
            Self::FireRate => {
                player.shoot_cooldown_max_ms =
                    (player.shoot_cooldown_max_ms - 30.0).max(PLAYER_SHOOT_COOLDOWN_FLOOR_MS);
            }
            Self::BulletSpeed => player.bullet_speed += 0.2,
            Self::PierceShot => player.pierce += 1,
            Self::Ricochet => {
                player.ricochet = true;
                player.ricochet_bounces += 2;
            }
            Self::MultiShot => player.multi_shot += 1,
            Self::SpeedBoost => player.speed += 0.1,
            Self::LifeSteal => player.life_steal = true,
            Self::ShieldRecharge => player.heal(5),
        }
    }
}
