use serde::Serialize;

use crate::constants::*;

use super::player::Player;

/// A live bullet. Player shots carry pierce/ricochet budgets; enemy shots are
/// one-hit and expire on any contact with the player.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub damage: i32,
    pub from_player: bool,
    pub pierce: u32,
    pub hits: u32,
    pub ricochet: bool,
    pub ricochet_bounces: u32,
    pub alive: bool,
}

impl Projectile {
    /// One shot of a player fan, travelling along `angle_rad` with the
    /// player's current stats baked in.
    pub(crate) fn player_shot(player: &Player, angle_rad: f32) -> Self {
        let (cx, cy) = player.center();
        Self {
            x: cx - BULLET_WIDTH / 2.0,
            y: cy,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            vx: angle_rad.cos() * player.bullet_speed,
            vy: angle_rad.sin() * player.bullet_speed,
            damage: player.damage,
            from_player: true,
            pierce: player.pierce.max(1),
            hits: 0,
            ricochet: player.ricochet,
            ricochet_bounces: if player.ricochet {
                player.ricochet_bounces
            } else {
                0
            },
            alive: true,
        }
    }

    pub(crate) fn enemy_shot(x: f32, y: f32, vx: f32, vy: f32, damage: i32) -> Self {
        Self {
            x,
            y,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            vx,
            vy,
            damage,
            from_player: false,
            pierce: 1,
            hits: 0,
            ricochet: false,
            ricochet_bounces: 0,
            alive: true,
        }
    }

    pub(crate) fn update(&mut self, delta_ms: f32) {
        self.x += self.vx * delta_ms;
        self.y += self.vy * delta_ms;

        if self.ricochet && self.from_player {
            self.resolve_wall_bounces();
        }
    }

    /// Reflect off arena walls: invert the struck axis with asymmetric
    /// damping, clamp back inside, and spend one bounce per wall.
    fn resolve_wall_bounces(&mut self) {
        if self.x <= 0.0 || self.x + self.width >= ARENA_WIDTH {
            self.vx = -self.vx * RICOCHET_AXIS_DAMPING;
            self.vy *= RICOCHET_CROSS_DAMPING;
            self.x = self.x.clamp(0.0, ARENA_WIDTH - self.width);
            self.ricochet_bounces = self.ricochet_bounces.saturating_sub(1);
        }
        if self.y <= 0.0 || self.y + self.height >= ARENA_HEIGHT {
            self.vy = -self.vy * RICOCHET_AXIS_DAMPING;
            self.vx *= RICOCHET_CROSS_DAMPING;
            self.y = self.y.clamp(0.0, ARENA_HEIGHT - self.height);
            self.ricochet_bounces = self.ricochet_bounces.saturating_sub(1);
        }

        if self.ricochet_bounces == 0 {
            self.ricochet = false;
        }
    }

    pub(crate) fn register_hit(&mut self) {
        self.hits += 1;
        if self.spent() {
            self.alive = false;
        }
    }

    /// Pierce budget exhausted (player shots only).
    pub(crate) fn spent(&self) -> bool {
        self.from_player && self.hits >= self.pierce
    }

    pub(crate) fn out_of_bounds(&self) -> bool {
        self.x < -OFFSCREEN_MARGIN
            || self.x > ARENA_WIDTH + OFFSCREEN_MARGIN
            || self.y < -OFFSCREEN_MARGIN
            || self.y > ARENA_HEIGHT + OFFSCREEN_MARGIN
    }
}
