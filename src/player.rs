//! The player avatar: movement, firing, abilities and shop upgrades.
//!
//! Every action returns whether it happened. Insufficient mana or a running
//! cooldown rejects the action outright; nothing is queued.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::combat::{Cooldown, Health};
use crate::entities::{frames, roll, Body, Owner, Projectile, World};
use crate::tuning::{
    Difficulty, BULLET_SPAWN_GAP, BURST_COOLDOWN, BURST_COST, BURST_DAMAGE, BURST_RADIUS,
    DASH_COOLDOWN, DASH_COST, DASH_DISTANCE, PLAYER_ACCELERATION, PLAYER_AIM_JITTER,
    PLAYER_BULLET_DAMAGE, PLAYER_BULLET_SPEED, PLAYER_FRICTION, PLAYER_RADIUS,
    PLAYER_SHOOT_DELAY, PLAYER_SPEED_JITTER, PLAYER_TURN_SPEED, SHIELD_COOLDOWN, SHIELD_COST,
    SHIELD_DURATION, UPGRADE_DAMAGE_BASE_COST, UPGRADE_DAMAGE_COST_STEP, UPGRADE_DAMAGE_GAIN,
    UPGRADE_HP_BASE_COST, UPGRADE_HP_COST_STEP, UPGRADE_HP_GAIN, UPGRADE_HP_HEAL,
    UPGRADE_SPEED_BASE_COST, UPGRADE_SPEED_COST_STEP, UPGRADE_SPEED_GAIN,
};

/// Upgradeable player stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stat {
    Damage,
    BulletSpeed,
    MaxHealth,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Damage, Stat::BulletSpeed, Stat::MaxHealth];
}

/// Area attack produced by the burst ability; the simulation applies it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub origin: Vec2,
    pub radius: f32,
    pub damage: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub health: Health,
    /// Facing angle in radians.
    pub angle: f32,
    pub turn_speed: f32,
    pub mana: u32,

    pub bullet_damage: f32,
    pub bullet_speed: f32,
    pub gun: Cooldown,

    pub dash: Cooldown,
    pub shield: Cooldown,
    pub burst: Cooldown,
    /// Seconds of invulnerability left; zero when the shield is down.
    pub shield_remaining: f32,

    pub damage_level: u32,
    pub speed_level: u32,
    pub hp_level: u32,
}

impl Player {
    pub fn new(pos: Vec2, difficulty: Difficulty) -> Self {
        let mut body = Body::new(pos, PLAYER_RADIUS);
        body.acceleration = PLAYER_ACCELERATION;
        body.friction = PLAYER_FRICTION;

        Self {
            body,
            health: Health::new(difficulty.profile().player_hp),
            angle: 0.0,
            turn_speed: PLAYER_TURN_SPEED,
            mana: 0,
            bullet_damage: PLAYER_BULLET_DAMAGE,
            bullet_speed: PLAYER_BULLET_SPEED,
            gun: Cooldown::ready(PLAYER_SHOOT_DELAY),
            dash: Cooldown::ready(DASH_COOLDOWN),
            shield: Cooldown::ready(SHIELD_COOLDOWN),
            burst: Cooldown::ready(BURST_COOLDOWN),
            shield_remaining: 0.0,
            damage_level: 1,
            speed_level: 1,
            hp_level: 1,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_depleted()
    }

    pub fn shield_active(&self) -> bool {
        self.shield_remaining > 0.0
    }

    // ── Movement ──────────────────────────────────────────────────────────────

    /// Accelerate along `axis`, whose components are each -1, 0 or 1.
    pub fn steer(&mut self, axis: Vec2) {
        self.body.accelerate(axis * self.body.acceleration);
    }

    /// Rotate toward `target` by at most `turn_speed` per frame.
    pub fn aim_at(&mut self, target: Vec2, dt: f32) {
        let to_target = target - self.body.pos;
        if to_target.length_squared() <= f32::EPSILON {
            return;
        }
        let wanted = to_target.y.atan2(to_target.x);
        let diff = (wanted - self.angle + PI).rem_euclid(TAU) - PI;
        let step = self.turn_speed * frames(dt);
        if diff < -step {
            self.angle -= step;
        } else if diff > step {
            self.angle += step;
        } else {
            self.angle = wanted;
        }
    }

    /// Integrate the body and run down every timer.
    pub fn update(&mut self, dt: f32, world: &World) {
        self.body.integrate(dt, world);
        self.gun.tick(dt);
        self.dash.tick(dt);
        self.shield.tick(dt);
        self.burst.tick(dt);
        self.shield_remaining = (self.shield_remaining - dt).max(0.0);
    }

    // ── Combat ────────────────────────────────────────────────────────────────

    pub fn try_shoot(&mut self, rng: &mut impl Rng) -> Option<Projectile> {
        if !self.gun.try_trigger() {
            return None;
        }
        let angle = self.angle + rng.gen_range(-PLAYER_AIM_JITTER..=PLAYER_AIM_JITTER);
        let speed = self.bullet_speed * roll(rng, PLAYER_SPEED_JITTER);
        Some(Projectile::from_rim(
            self.body.pos,
            self.body.radius + BULLET_SPAWN_GAP,
            angle,
            speed,
            self.bullet_damage,
            Owner::Player,
        ))
    }

    /// Apply damage unless shielded. Returns `true` on the killing blow.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.shield_active() {
            return false;
        }
        self.health.apply_damage(amount)
    }

    pub fn collect_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_add(amount);
    }

    fn spend(&mut self, cost: u32) -> bool {
        if self.mana >= cost {
            self.mana -= cost;
            true
        } else {
            false
        }
    }

    // ── Abilities ─────────────────────────────────────────────────────────────

    pub fn use_dash(&mut self, world: &World) -> bool {
        if !self.dash.is_ready() || !self.spend(DASH_COST) {
            return false;
        }
        self.dash.trigger();
        let target = self.body.pos + Vec2::from_angle(self.angle) * DASH_DISTANCE;
        self.body.pos = world.clamp(target, self.body.radius);
        debug!(x = self.body.pos.x, y = self.body.pos.y, "dash");
        true
    }

    pub fn use_shield(&mut self) -> bool {
        if !self.shield.is_ready() || !self.spend(SHIELD_COST) {
            return false;
        }
        self.shield.trigger();
        self.shield_remaining = SHIELD_DURATION;
        debug!("shield up");
        true
    }

    pub fn use_burst(&mut self) -> Option<Burst> {
        if !self.burst.is_ready() || !self.spend(BURST_COST) {
            return None;
        }
        self.burst.trigger();
        debug!("burst");
        Some(Burst {
            origin: self.body.pos,
            radius: BURST_RADIUS,
            damage: BURST_DAMAGE,
        })
    }

    // ── Upgrades ──────────────────────────────────────────────────────────────

    pub fn level(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Damage => self.damage_level,
            Stat::BulletSpeed => self.speed_level,
            Stat::MaxHealth => self.hp_level,
        }
    }

    /// Cost of the next level: base plus a fixed step per level already bought.
    pub fn upgrade_cost(&self, stat: Stat) -> u32 {
        let (base, step) = match stat {
            Stat::Damage => (UPGRADE_DAMAGE_BASE_COST, UPGRADE_DAMAGE_COST_STEP),
            Stat::BulletSpeed => (UPGRADE_SPEED_BASE_COST, UPGRADE_SPEED_COST_STEP),
            Stat::MaxHealth => (UPGRADE_HP_BASE_COST, UPGRADE_HP_COST_STEP),
        };
        base + (self.level(stat) - 1) * step
    }

    pub fn upgrade(&mut self, stat: Stat) -> bool {
        let cost = self.upgrade_cost(stat);
        if !self.spend(cost) {
            return false;
        }
        match stat {
            Stat::Damage => {
                self.damage_level += 1;
                self.bullet_damage += UPGRADE_DAMAGE_GAIN;
            }
            Stat::BulletSpeed => {
                self.speed_level += 1;
                self.bullet_speed += UPGRADE_SPEED_GAIN;
            }
            Stat::MaxHealth => {
                self.hp_level += 1;
                self.health.raise_max(UPGRADE_HP_GAIN);
                self.health.heal(UPGRADE_HP_HEAL);
            }
        }
        debug!(?stat, level = self.level(stat), cost, "upgrade bought");
        true
    }
}
