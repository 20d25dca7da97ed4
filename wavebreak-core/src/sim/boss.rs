use serde::Serialize;

use crate::constants::*;
use crate::rng::SeededRng;

use super::enemy::{Enemy, EnemyTag};
use super::player::Player;
use super::projectile::Projectile;
use super::{distance_between, scaled_damage, unit_toward};

/// Hp-ratio phase of the phased-fire boss. Pure function of current hp so
/// replays and tests get the same answer no matter how often it is asked.
pub fn phased_fire_phase(hp: i32, max_hp: i32) -> u8 {
    let ratio = hp.max(0) as f32 / max_hp.max(1) as f32;
    if ratio <= 0.3 {
        3
    } else if ratio <= 0.6 {
        2
    } else {
        1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashState {
    Idle,
    Locking,
    Dashing,
    Cooldown,
}

#[derive(Clone, Debug, Serialize)]
pub struct PhasedFire {
    pub speed: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub since_volley_ms: f32,
    pub since_special_ms: f32,
    pub special_interval_ms: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct LockOnDash {
    pub state: DashState,
    pub facing_rad: f32,
    pub lock_ms: f32,
    pub cooldown_left_ms: f32,
    pub home_speed: f32,
    pub dash_speed: f32,
    pub dash_damage: i32,
    pub dash_vx: f32,
    pub dash_vy: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummonMove {
    Drifting,
    Retreating,
}

#[derive(Clone, Debug, Serialize)]
pub struct Summoner {
    pub drift_speed: f32,
    pub retreat_speed: f32,
    pub move_dir: f32,
    pub move_state: SummonMove,
    pub state_ms: f32,
    pub last_player_distance: f32,
    pub wave_timer_ms: f32,
    pub since_member_spawn_ms: f32,
    pub spawn_queue: Vec<EnemyTag>,
}

#[derive(Clone, Debug, Serialize)]
pub enum BossKind {
    PhasedFire(PhasedFire),
    LockOnDash(LockOnDash),
    Summoner(Summoner),
}

#[derive(Clone, Debug, Serialize)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub contact_damage: i32,
    pub kind: BossKind,
}

/// Which composition the summoner escalates to at its hp breakpoints.
fn summoner_composition(hp: i32, max_hp: i32) -> &'static [EnemyTag] {
    const FIRST: [EnemyTag; 3] = [EnemyTag::Grunt, EnemyTag::Grunt, EnemyTag::Shooter];
    const SECOND: [EnemyTag; 4] = [
        EnemyTag::Grunt,
        EnemyTag::Grunt,
        EnemyTag::Shooter,
        EnemyTag::Shooter,
    ];
    const THIRD: [EnemyTag; 5] = [
        EnemyTag::Grunt,
        EnemyTag::Sprinter,
        EnemyTag::Tank,
        EnemyTag::Shooter,
        EnemyTag::Shooter,
    ];
    const FOURTH: [EnemyTag; 6] = [
        EnemyTag::Tank,
        EnemyTag::Tank,
        EnemyTag::Tank,
        EnemyTag::Sprinter,
        EnemyTag::Shooter,
        EnemyTag::Shooter,
    ];

    let ratio = hp.max(0) as f32 / max_hp.max(1) as f32;
    if ratio > 0.75 {
        &FIRST
    } else if ratio > 0.5 {
        &SECOND
    } else if ratio > 0.25 {
        &THIRD
    } else {
        &FOURTH
    }
}

/// Wrap an angle difference into [-pi, pi].
fn normalize_angle_diff(diff: f32) -> f32 {
    use core::f32::consts::PI;
    let mut diff = diff;
    while diff > PI {
        diff -= 2.0 * PI;
    }
    while diff < -PI {
        diff += 2.0 * PI;
    }
    diff
}

impl Boss {
    pub(crate) fn phased_fire(multiplier: f32, rng: &mut SeededRng) -> Self {
        let (width, height) = PHASED_FIRE_SIZE;
        let hp = scaled_damage(PHASED_FIRE_HP, multiplier);
        Self {
            x: ARENA_WIDTH / 2.0 - width / 2.0,
            y: BOSS_SPAWN_Y,
            width,
            height,
            hp,
            max_hp: hp,
            contact_damage: scaled_damage(PHASED_FIRE_CONTACT_DAMAGE, multiplier),
            kind: BossKind::PhasedFire(PhasedFire {
                speed: PHASED_FIRE_SPEED * multiplier,
                target_x: rng.next_range_f32(0.0, ARENA_WIDTH - width),
                target_y: rng.next_range_f32(0.0, ARENA_HEIGHT - height),
                since_volley_ms: 0.0,
                since_special_ms: 0.0,
                special_interval_ms: (PHASED_FIRE_SPECIAL_BASE_MS / multiplier)
                    .max(PHASED_FIRE_SPECIAL_FLOOR_MS),
            }),
        }
    }

    pub(crate) fn lock_on_dash(multiplier: f32) -> Self {
        let (width, height) = LOCK_ON_SIZE;
        let hp = scaled_damage(LOCK_ON_HP, multiplier);
        Self {
            x: ARENA_WIDTH / 2.0 - width / 2.0,
            y: BOSS_SPAWN_Y,
            width,
            height,
            hp,
            max_hp: hp,
            contact_damage: scaled_damage(LOCK_ON_CONTACT_DAMAGE, multiplier),
            kind: BossKind::LockOnDash(LockOnDash {
                state: DashState::Idle,
                facing_rad: core::f32::consts::FRAC_PI_2,
                lock_ms: 0.0,
                cooldown_left_ms: 0.0,
                home_speed: LOCK_ON_HOME_SPEED * multiplier,
                dash_speed: LOCK_ON_DASH_SPEED * multiplier,
                dash_damage: scaled_damage(LOCK_ON_DASH_DAMAGE, multiplier),
                dash_vx: 0.0,
                dash_vy: 0.0,
            }),
        }
    }

    pub(crate) fn summoner(multiplier: f32) -> Self {
        let (width, height) = SUMMONER_SIZE;
        let hp = scaled_damage(SUMMONER_HP, multiplier);
        Self {
            x: ARENA_WIDTH / 2.0 - width / 2.0,
            y: BOSS_SPAWN_Y,
            width,
            height,
            hp,
            max_hp: hp,
            contact_damage: scaled_damage(SUMMONER_CONTACT_DAMAGE, multiplier),
            kind: BossKind::Summoner(Summoner {
                drift_speed: SUMMONER_DRIFT_SPEED * multiplier,
                retreat_speed: SUMMONER_RETREAT_SPEED * multiplier,
                move_dir: 1.0,
                move_state: SummonMove::Drifting,
                state_ms: 0.0,
                last_player_distance: SUMMONER_PREFERRED_DISTANCE,
                wave_timer_ms: 0.0,
                since_member_spawn_ms: 0.0,
                spawn_queue: Vec::new(),
            }),
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Contact damage right now; elevated while a lock-on boss is mid-dash.
    pub fn contact_damage_now(&self) -> i32 {
        match &self.kind {
            BossKind::LockOnDash(dash) if dash.state == DashState::Dashing => dash.dash_damage,
            _ => self.contact_damage,
        }
    }

    pub(crate) fn take_damage(&mut self, damage: i32) {
        self.hp -= damage;
    }

    pub(crate) fn update(
        &mut self,
        delta_ms: f32,
        player: &Player,
        enemy_multiplier: f32,
        damage_multiplier: f32,
        projectiles: &mut Vec<Projectile>,
        minions: &mut Vec<Enemy>,
        rng: &mut SeededRng,
    ) {
        // Split borrows: behavior state lives in `kind`, body fields on self.
        let (x, y, width, height) = (self.x, self.y, self.width, self.height);
        let (hp, max_hp, contact_damage) = (self.hp, self.max_hp, self.contact_damage);
        let cx = x + width / 2.0;
        let cy = y + height / 2.0;
        let (px, py) = player.center();

        match &mut self.kind {
            BossKind::PhasedFire(fire) => {
                let phase = phased_fire_phase(hp, max_hp);

                // Roam between random waypoints.
                let distance = distance_between(x, y, fire.target_x, fire.target_y);
                if distance > 0.0 {
                    let (dir_x, dir_y) = unit_toward(x, y, fire.target_x, fire.target_y);
                    self.x += dir_x * fire.speed * delta_ms;
                    self.y += dir_y * fire.speed * delta_ms;
                }
                if distance < 5.0 {
                    fire.target_x = rng.next_range_f32(0.0, ARENA_WIDTH - width);
                    fire.target_y = rng.next_range_f32(0.0, ARENA_HEIGHT - height);
                }

                fire.since_volley_ms += delta_ms;
                let volley_interval = match phase {
                    3 => 400.0,
                    2 => 600.0,
                    _ => 800.0,
                };
                if fire.since_volley_ms >= volley_interval {
                    fire.since_volley_ms = 0.0;
                    let shots: i32 = match phase {
                        3 => 5,
                        2 => 3,
                        _ => 1,
                    };
                    let damage = scaled_damage(contact_damage, damage_multiplier);
                    let (dir_x, dir_y) = unit_toward(cx, cy, px, py);
                    for i in 0..shots {
                        let spread = (i - shots / 2) as f32 * PHASED_FIRE_SPREAD_STEP;
                        projectiles.push(Projectile::enemy_shot(
                            cx,
                            y + height,
                            dir_x * PHASED_FIRE_BULLET_SPEED + spread,
                            dir_y * PHASED_FIRE_BULLET_SPEED,
                            damage,
                        ));
                    }
                }

                fire.since_special_ms += delta_ms;
                if fire.since_special_ms >= fire.special_interval_ms {
                    fire.since_special_ms = 0.0;
                    let damage = scaled_damage(contact_damage, damage_multiplier);
                    for i in 0..PHASED_FIRE_SPECIAL_BULLETS {
                        let angle = i as f32 / PHASED_FIRE_SPECIAL_BULLETS as f32
                            * core::f32::consts::TAU;
                        projectiles.push(Projectile::enemy_shot(
                            cx,
                            cy,
                            angle.cos() * PHASED_FIRE_SPECIAL_SPEED,
                            angle.sin() * PHASED_FIRE_SPECIAL_SPEED,
                            damage,
                        ));
                    }
                }
            }

            BossKind::LockOnDash(dash) => {
                if dash.state != DashState::Dashing && dash.state != DashState::Cooldown {
                    let target_angle = (py - cy).atan2(px - cx);
                    let diff = normalize_angle_diff(target_angle - dash.facing_rad);
                    dash.facing_rad += diff * LOCK_ON_ROTATION_RATE * delta_ms;
                    dash.facing_rad = normalize_angle_diff(dash.facing_rad);
                }

                dash.cooldown_left_ms = (dash.cooldown_left_ms - delta_ms).max(0.0);

                match dash.state {
                    DashState::Idle => {
                        if y < 0.0 {
                            // Still entering the arena.
                            self.y += dash.home_speed * delta_ms * 2.0;
                        } else {
                            let (dir_x, dir_y) = unit_toward(x, y, px, py);
                            self.x += dir_x * dash.home_speed * delta_ms;
                            self.y += dir_y * dash.home_speed * delta_ms;

                            let distance = distance_between(x, y, px, py);
                            if distance <= LOCK_ON_DASH_RANGE && dash.cooldown_left_ms <= 0.0 {
                                dash.state = DashState::Locking;
                                dash.lock_ms = 0.0;
                            }
                        }
                    }
                    DashState::Locking => {
                        dash.lock_ms += delta_ms;
                        if dash.lock_ms >= LOCK_ON_DURATION_MS {
                            let (dir_x, dir_y) = unit_toward(cx, cy, px, py);
                            dash.dash_vx = dir_x * dash.dash_speed;
                            dash.dash_vy = dir_y * dash.dash_speed;
                            dash.state = DashState::Dashing;
                        }
                    }
                    DashState::Dashing => {
                        self.x += dash.dash_vx * delta_ms;
                        self.y += dash.dash_vy * delta_ms;

                        let hit_wall = self.x <= 0.0
                            || self.x + width >= ARENA_WIDTH
                            || self.y <= 0.0
                            || self.y + height >= ARENA_HEIGHT;
                        if hit_wall {
                            self.x = self.x.clamp(0.0, ARENA_WIDTH - width);
                            self.y = self.y.clamp(0.0, ARENA_HEIGHT - height);
                            dash.state = DashState::Cooldown;
                            dash.cooldown_left_ms = LOCK_ON_COOLDOWN_MS;
                        }
                    }
                    DashState::Cooldown => {
                        if dash.cooldown_left_ms <= 0.0 {
                            dash.state = DashState::Idle;
                        }
                    }
                }
            }

            BossKind::Summoner(summoner) => {
                let distance = distance_between(x, y, px, py);
                let should_retreat = distance < SUMMONER_PREFERRED_DISTANCE
                    || (distance < 250.0 && distance < summoner.last_player_distance);

                match summoner.move_state {
                    SummonMove::Drifting if should_retreat => {
                        summoner.move_state = SummonMove::Retreating;
                        summoner.state_ms = 0.0;
                    }
                    // Retreat is latched for a minimum hold so the boss does
                    // not flicker between states at the range boundary.
                    SummonMove::Retreating
                        if !should_retreat && summoner.state_ms > SUMMONER_RETREAT_MIN_MS =>
                    {
                        summoner.move_state = SummonMove::Drifting;
                        summoner.state_ms = 0.0;
                    }
                    _ => {}
                }

                summoner.state_ms += delta_ms;
                summoner.last_player_distance = distance;

                match summoner.move_state {
                    SummonMove::Retreating => {
                        let mut escape_x: f32 = if px > x { -1.0 } else { 1.0 };
                        let mut escape_y: f32 = if py > y { -1.0 } else { 1.0 };
                        if x <= 50.0 {
                            escape_x = escape_x.max(0.5);
                        }
                        if x >= ARENA_WIDTH - width - 50.0 {
                            escape_x = escape_x.min(-0.5);
                        }
                        if y <= 20.0 {
                            escape_y = escape_y.max(0.5);
                        }
                        self.x += escape_x * summoner.retreat_speed * delta_ms;
                        self.y += escape_y * summoner.retreat_speed * delta_ms;
                    }
                    SummonMove::Drifting => {
                        self.x += summoner.move_dir * summoner.drift_speed * delta_ms;
                        if self.x <= 50.0 || self.x >= ARENA_WIDTH - width - 50.0 {
                            summoner.move_dir = -summoner.move_dir;
                        }
                        if self.y > SUMMONER_SAFE_ZONE_Y + 20.0 {
                            self.y -= summoner.drift_speed * delta_ms * 0.5;
                        }
                    }
                }

                self.x = self.x.clamp(10.0, ARENA_WIDTH - width - 10.0);
                self.y = self.y.clamp(10.0, ARENA_HEIGHT - height - 50.0);

                // Queue a fresh (shuffled) composition once the previous one
                // has fully spawned and the cooldown elapsed.
                summoner.wave_timer_ms += delta_ms;
                if summoner.wave_timer_ms >= SUMMONER_WAVE_COOLDOWN_MS
                    && summoner.spawn_queue.is_empty()
                {
                    summoner.wave_timer_ms = 0.0;
                    summoner.since_member_spawn_ms = 0.0;
                    let mut queue: Vec<EnemyTag> = summoner_composition(hp, max_hp).to_vec();
                    rng.shuffle(&mut queue);
                    summoner.spawn_queue = queue;
                }

                if !summoner.spawn_queue.is_empty() {
                    summoner.since_member_spawn_ms += delta_ms;
                    if summoner.since_member_spawn_ms >= SUMMONER_SPAWN_DELAY_MS {
                        summoner.since_member_spawn_ms = 0.0;
                        let tag = summoner.spawn_queue.remove(0);
                        let spawn_x = rng.next_range_f32(0.0, ARENA_WIDTH - 40.0);
                        minions.push(Enemy::spawn(tag, spawn_x, enemy_multiplier, rng));
                    }
                }
            }
        }
    }
}
