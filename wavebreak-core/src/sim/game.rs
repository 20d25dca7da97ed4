use crate::constants::*;
use crate::error::ControlError;
use crate::input::FrameInput;
use crate::rng::SeededRng;

use super::boss::Boss;
use super::enemy::{Enemy, EnemyTag};
use super::player::{Player, Upgrade};
use super::projectile::Projectile;
use super::waves::{is_boss_wave, SpawnScheduler};
use super::{
    aabb_overlap, scaled_damage, EntryTicket, Particle, RunSummary, UiMode, WorldSnapshot,
};

/// Collision test order for player projectiles. Pierce budget is consumed
/// across categories in this fixed precedence, bosses last.
const CATEGORY_PRECEDENCE: [EnemyTag; 4] = [
    EnemyTag::Grunt,
    EnemyTag::Shooter,
    EnemyTag::Tank,
    EnemyTag::Sprinter,
];

/// The simulation root. One tick consumes input, spawns, updates every live
/// entity, resolves collisions, and advances wave/level progression. All
/// randomness flows through the owned seeded generator, so a fixed seed and
/// input sequence replays identically.
#[derive(Clone)]
pub struct Game {
    mode: UiMode,
    player: Player,
    enemies: Vec<Enemy>,
    bosses: Vec<Boss>,
    projectiles: Vec<Projectile>,
    particles: Vec<Particle>,
    score: u32,
    lives: i32,
    exp: u32,
    level: u32,
    exp_to_next_level: u32,
    wave_number: u32,
    wave_progress: u32,
    wave_requirement: u32,
    enemy_multiplier: f32,
    damage_multiplier: f32,
    payout_earned: u32,
    scheduler: SpawnScheduler,
    pending_upgrades: Vec<Upgrade>,
    preboss_remaining_ms: f32,
    ticket: Option<EntryTicket>,
    last_run: Option<RunSummary>,
    rng: SeededRng,
}

impl Game {
    pub fn new(seed: u32) -> Self {
        Self {
            mode: UiMode::Start,
            player: Player::new(),
            enemies: Vec::new(),
            bosses: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            score: 0,
            lives: STARTING_LIVES,
            exp: 0,
            level: 1,
            exp_to_next_level: EXP_TO_LEVEL_START,
            wave_number: 1,
            wave_progress: 0,
            wave_requirement: WAVE_REQUIREMENT_START,
            enemy_multiplier: 1.0,
            damage_multiplier: 1.0,
            payout_earned: 0,
            scheduler: SpawnScheduler::new(),
            pending_upgrades: Vec::new(),
            preboss_remaining_ms: 0.0,
            ticket: None,
            last_run: None,
            rng: SeededRng::new(seed),
        }
    }

    #[inline]
    pub fn mode(&self) -> UiMode {
        self.mode
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    #[inline]
    pub fn payout_earned(&self) -> u32 {
        self.payout_earned
    }

    #[inline]
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Begin a run. Only legal from the start screen, and only with payment
    /// evidence in hand.
    pub fn start_run(&mut self, ticket: EntryTicket) -> Result<(), ControlError> {
        if self.mode != UiMode::Start {
            return Err(ControlError::NotAtStart);
        }
        self.reset_run();
        self.ticket = Some(ticket);
        self.mode = UiMode::Running;
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), ControlError> {
        match self.mode {
            UiMode::Running => {
                self.mode = UiMode::Paused;
                Ok(())
            }
            UiMode::Paused => {
                self.mode = UiMode::Running;
                Ok(())
            }
            _ => Err(ControlError::NotPausable),
        }
    }

    /// Resolve a pending level-up. Applies the chosen upgrade, carries spare
    /// experience forward, and resumes the simulation.
    pub fn choose_upgrade(&mut self, index: usize) -> Result<(), ControlError> {
        if self.mode != UiMode::LevelUp {
            return Err(ControlError::NoPendingLevelUp);
        }
        let upgrade = *self
            .pending_upgrades
            .get(index)
            .ok_or(ControlError::InvalidUpgradeChoice { index })?;

        upgrade.apply(&mut self.player);
        self.level += 1;
        self.exp = self.exp.saturating_sub(self.exp_to_next_level);
        self.exp_to_next_level = (self.exp_to_next_level as f32 * EXP_CURVE_FACTOR).floor() as u32;
        self.pending_upgrades.clear();
        self.mode = UiMode::Running;
        Ok(())
    }

    /// Advance the simulation by `delta_ms` wall-clock milliseconds.
    pub fn tick(&mut self, input: &FrameInput, delta_ms: f32) {
        if delta_ms <= 0.0 {
            return;
        }
        match self.mode {
            UiMode::Start | UiMode::Paused | UiMode::LevelUp => {}
            UiMode::PreBoss => self.tick_preboss(input, delta_ms),
            UiMode::Running => self.tick_running(input, delta_ms),
        }
    }

    /// Countdown interstitial before a boss wave: the player may reposition
    /// but spawning and progression are held until the timer expires.
    fn tick_preboss(&mut self, input: &FrameInput, delta_ms: f32) {
        self.player.update(input, delta_ms);
        self.update_particles(delta_ms);

        self.preboss_remaining_ms -= delta_ms;
        if self.preboss_remaining_ms <= 0.0 {
            self.preboss_remaining_ms = 0.0;
            self.advance_wave();
            self.mode = UiMode::Running;
        }
    }

    fn tick_running(&mut self, input: &FrameInput, delta_ms: f32) {
        self.player.update(input, delta_ms);
        if input.fire {
            self.player
                .try_shoot(input.aim_x, input.aim_y, &mut self.projectiles);
        }

        {
            let wave = self.wave_number;
            let multiplier = self.enemy_multiplier;
            let Game {
                scheduler,
                rng,
                enemies,
                bosses,
                ..
            } = self;
            scheduler.tick(delta_ms, wave, multiplier, rng, enemies, bosses);
        }

        self.update_enemies(delta_ms);
        self.update_bosses(delta_ms);
        for projectile in &mut self.projectiles {
            projectile.update(delta_ms);
        }
        self.update_particles(delta_ms);

        self.resolve_player_projectiles();
        self.resolve_enemy_projectiles();
        if self.mode != UiMode::Running {
            return;
        }
        self.resolve_contact_damage();
        if self.mode != UiMode::Running {
            return;
        }

        self.prune_dead();
        self.check_wave_progress();
        self.check_level_up();
    }

    fn update_enemies(&mut self, delta_ms: f32) {
        let Game {
            enemies,
            projectiles,
            player,
            damage_multiplier,
            ..
        } = self;
        for enemy in enemies.iter_mut() {
            enemy.update(delta_ms, player, *damage_multiplier, projectiles);
        }
    }

    fn update_bosses(&mut self, delta_ms: f32) {
        let Game {
            bosses,
            enemies,
            projectiles,
            player,
            rng,
            enemy_multiplier,
            damage_multiplier,
            ..
        } = self;
        for boss in bosses.iter_mut() {
            boss.update(
                delta_ms,
                player,
                *enemy_multiplier,
                *damage_multiplier,
                projectiles,
                enemies,
                rng,
            );
        }
    }

    fn update_particles(&mut self, delta_ms: f32) {
        for particle in &mut self.particles {
            particle.update(delta_ms);
        }
        self.particles.retain(Particle::alive);
    }

    /// Player projectiles against enemy categories in fixed precedence, then
    /// bosses. Each confirmed hit consumes one unit of the pierce budget.
    fn resolve_player_projectiles(&mut self) {
        for bullet_index in 0..self.projectiles.len() {
            let bullet = self.projectiles[bullet_index];
            if !bullet.alive || !bullet.from_player {
                continue;
            }

            'bullet: for tag in CATEGORY_PRECEDENCE {
                for enemy_index in 0..self.enemies.len() {
                    let enemy = &self.enemies[enemy_index];
                    if enemy.hp <= 0 || enemy.tag() != tag {
                        continue;
                    }
                    let bullet = self.projectiles[bullet_index];
                    if !aabb_overlap(
                        bullet.x,
                        bullet.y,
                        bullet.width,
                        bullet.height,
                        enemy.x,
                        enemy.y,
                        enemy.width,
                        enemy.height,
                    ) {
                        continue;
                    }

                    self.hit_enemy(enemy_index, bullet.damage);
                    self.projectiles[bullet_index].register_hit();
                    if !self.projectiles[bullet_index].alive {
                        break 'bullet;
                    }
                }
            }

            if !self.projectiles[bullet_index].alive {
                continue;
            }
            for boss_index in 0..self.bosses.len() {
                let boss = &self.bosses[boss_index];
                if boss.hp <= 0 {
                    continue;
                }
                let bullet = self.projectiles[bullet_index];
                if !aabb_overlap(
                    bullet.x,
                    bullet.y,
                    bullet.width,
                    bullet.height,
                    boss.x,
                    boss.y,
                    boss.width,
                    boss.height,
                ) {
                    continue;
                }

                self.hit_boss(boss_index, bullet.damage);
                self.projectiles[bullet_index].register_hit();
                if !self.projectiles[bullet_index].alive {
                    break;
                }
            }
        }
    }

    fn hit_enemy(&mut self, index: usize, damage: i32) {
        let tag = self.enemies[index].tag();
        let (cx, cy) = self.enemies[index].center();

        match tag {
            // Grunts and shooters fold to any hit.
            EnemyTag::Grunt | EnemyTag::Shooter => {
                self.enemies[index].hp = 0;
                self.spawn_explosion(cx, cy);
                if tag == EnemyTag::Grunt {
                    self.award(SCORE_GRUNT_KILL, EXP_GRUNT_KILL);
                } else {
                    self.award(SCORE_SHOOTER_KILL, EXP_SHOOTER_KILL);
                }
                self.apply_life_steal(LIFE_STEAL_HEAL);
            }
            EnemyTag::Tank | EnemyTag::Sprinter => {
                self.enemies[index].hp -= damage;
                self.spawn_explosion(cx, cy);
                if tag == EnemyTag::Tank {
                    self.award(SCORE_TANK_HIT, EXP_TANK_HIT);
                } else {
                    self.award(SCORE_SPRINTER_HIT, EXP_SPRINTER_HIT);
                }

                if self.enemies[index].hp <= 0 {
                    self.spawn_explosion(cx, cy);
                    if tag == EnemyTag::Tank {
                        self.award(SCORE_TANK_KILL, EXP_TANK_KILL);
                    } else {
                        self.award(SCORE_SPRINTER_KILL, EXP_SPRINTER_KILL);
                    }
                    self.apply_life_steal(LIFE_STEAL_HEAL);
                }
            }
        }
    }

    fn hit_boss(&mut self, index: usize, damage: i32) {
        let (cx, cy) = self.bosses[index].center();
        self.bosses[index].take_damage(damage);
        self.spawn_explosion(cx, cy);
        self.award(SCORE_BOSS_HIT, EXP_BOSS_HIT);

        if self.bosses[index].hp <= 0 {
            self.spawn_explosion(cx, cy);
            self.award(SCORE_BOSS_KILL, EXP_BOSS_KILL);
            // A dead boss completes the wave no matter how far along it was.
            self.wave_progress = self.wave_requirement;
            self.apply_life_steal(LIFE_STEAL_BOSS_HEAL);
        }
    }

    /// Enemy projectiles against the player: one hit, bullet always removed.
    fn resolve_enemy_projectiles(&mut self) {
        for bullet_index in 0..self.projectiles.len() {
            let bullet = self.projectiles[bullet_index];
            if !bullet.alive || bullet.from_player {
                continue;
            }
            if !aabb_overlap(
                bullet.x,
                bullet.y,
                bullet.width,
                bullet.height,
                self.player.x,
                self.player.y,
                self.player.width,
                self.player.height,
            ) {
                continue;
            }

            self.projectiles[bullet_index].alive = false;
            let (px, py) = self.player.center();
            self.spawn_explosion(px, py);
            if self.player.take_damage(bullet.damage) && self.player.health <= 0 {
                self.lose_life();
                if self.mode != UiMode::Running {
                    return;
                }
            }
        }
    }

    /// Direct contact: enemies detonate against the player, bosses persist.
    fn resolve_contact_damage(&mut self) {
        for index in 0..self.enemies.len() {
            let enemy = &self.enemies[index];
            if enemy.hp <= 0 {
                continue;
            }
            if !aabb_overlap(
                self.player.x,
                self.player.y,
                self.player.width,
                self.player.height,
                enemy.x,
                enemy.y,
                enemy.width,
                enemy.height,
            ) {
                continue;
            }

            let (cx, cy) = enemy.center();
            let damage = scaled_damage(enemy.contact_damage, self.damage_multiplier);
            self.enemies[index].hp = 0;
            self.spawn_explosion(cx, cy);
            if self.player.take_damage(damage) && self.player.health <= 0 {
                self.lose_life();
                if self.mode != UiMode::Running {
                    return;
                }
            }
        }

        for index in 0..self.bosses.len() {
            let boss = &self.bosses[index];
            if boss.hp <= 0 {
                continue;
            }
            if !aabb_overlap(
                self.player.x,
                self.player.y,
                self.player.width,
                self.player.height,
                boss.x,
                boss.y,
                boss.width,
                boss.height,
            ) {
                continue;
            }

            let damage = scaled_damage(boss.contact_damage_now(), self.damage_multiplier);
            let (px, py) = self.player.center();
            self.spawn_explosion(px, py);
            if self.player.take_damage(damage) && self.player.health <= 0 {
                self.lose_life();
                if self.mode != UiMode::Running {
                    return;
                }
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives -= 1;
        if self.lives > 0 {
            self.player.restore_after_life_loss();
        } else {
            self.finish_run();
        }
    }

    fn finish_run(&mut self) {
        self.last_run = Some(RunSummary {
            score: self.score,
            wave_reached: self.wave_number,
            level: self.level,
            payout_earned: self.payout_earned,
        });
        self.ticket = None;
        self.mode = UiMode::Start;
    }

    fn prune_dead(&mut self) {
        self.projectiles
            .retain(|projectile| projectile.alive && !projectile.out_of_bounds());
        self.enemies
            .retain(|enemy| enemy.hp > 0 && !enemy.off_screen());
        self.bosses
            .retain(|boss| boss.hp > 0 && boss.y < ARENA_HEIGHT + OFFSCREEN_MARGIN);
    }

    fn check_wave_progress(&mut self) {
        if self.wave_progress < self.wave_requirement {
            return;
        }
        if is_boss_wave(self.wave_number + 1) {
            self.enter_preboss();
        } else {
            self.advance_wave();
        }
    }

    /// Clear the field (cosmetically exploding everything) and hold the wave
    /// transition behind a countdown.
    fn enter_preboss(&mut self) {
        let blast_points: Vec<(f32, f32)> = self
            .enemies
            .iter()
            .map(Enemy::center)
            .chain(
                self.projectiles
                    .iter()
                    .map(|projectile| (projectile.x, projectile.y)),
            )
            .collect();
        for (x, y) in blast_points {
            self.spawn_explosion(x, y);
        }
        self.enemies.clear();
        self.projectiles.clear();

        self.preboss_remaining_ms = PRE_BOSS_COUNTDOWN_MS;
        self.mode = UiMode::PreBoss;
    }

    fn advance_wave(&mut self) {
        let completed = self.wave_number;
        self.wave_number += 1;
        self.wave_progress = 0;
        self.wave_requirement += WAVE_REQUIREMENT_STEP;
        self.scheduler.begin_wave();

        // Difficulty and payout step together on every fifth completed wave.
        if completed % DIFFICULTY_WAVE_STRIDE == 0 {
            self.enemy_multiplier += ENEMY_MULTIPLIER_STEP;
            self.damage_multiplier += DAMAGE_MULTIPLIER_STEP;
            self.payout_earned += PAYOUT_UNIT;
        }
    }

    fn check_level_up(&mut self) {
        if self.mode != UiMode::Running || self.exp < self.exp_to_next_level {
            return;
        }

        // Draw three distinct upgrades from the pool.
        let mut pool: Vec<Upgrade> = Upgrade::POOL.to_vec();
        let mut offered = Vec::with_capacity(UPGRADE_CHOICES);
        for _ in 0..UPGRADE_CHOICES {
            let index = self.rng.next_int(pool.len() as u32) as usize;
            offered.push(pool.swap_remove(index));
        }
        self.pending_upgrades = offered;
        self.mode = UiMode::LevelUp;
    }

    fn award(&mut self, points: u32, exp: u32) {
        self.score += points;
        self.wave_progress += points;
        self.exp += exp;
    }

    fn apply_life_steal(&mut self, amount: i32) {
        if self.player.life_steal && self.player.health < self.player.max_health {
            self.player.heal(amount);
        }
    }

    fn spawn_explosion(&mut self, x: f32, y: f32) {
        for _ in 0..EXPLOSION_PARTICLES {
            let vx = self.rng.next_range_f32(-PARTICLE_MAX_DRIFT, PARTICLE_MAX_DRIFT);
            let vy = self.rng.next_range_f32(-PARTICLE_MAX_DRIFT, PARTICLE_MAX_DRIFT);
            self.particles.push(Particle {
                x,
                y,
                vx,
                vy,
                life_ms: PARTICLE_LIFE_MS,
                max_life_ms: PARTICLE_LIFE_MS,
            });
        }
    }

    fn reset_run(&mut self) {
        self.player = Player::new();
        self.enemies.clear();
        self.bosses.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.exp = 0;
        self.level = 1;
        self.exp_to_next_level = EXP_TO_LEVEL_START;
        self.wave_number = 1;
        self.wave_progress = 0;
        self.wave_requirement = WAVE_REQUIREMENT_START;
        self.enemy_multiplier = 1.0;
        self.damage_multiplier = 1.0;
        self.payout_earned = 0;
        self.scheduler = SpawnScheduler::new();
        self.pending_upgrades.clear();
        self.preboss_remaining_ms = 0.0;
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            mode: self.mode,
            score: self.score,
            lives: self.lives,
            level: self.level,
            exp: self.exp,
            exp_to_next_level: self.exp_to_next_level,
            wave_number: self.wave_number,
            wave_progress: self.wave_progress,
            wave_requirement: self.wave_requirement,
            enemy_multiplier: self.enemy_multiplier,
            damage_multiplier: self.damage_multiplier,
            payout_earned: self.payout_earned,
            preboss_remaining_ms: self.preboss_remaining_ms,
            player: self.player.clone(),
            enemies: self.enemies.clone(),
            bosses: self.bosses.clone(),
            projectiles: self.projectiles.clone(),
            particles: self.particles.clone(),
            pending_upgrades: self.pending_upgrades.clone(),
            last_run: self.last_run.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
