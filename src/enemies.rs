//! Enemy variants as one tagged type.
//!
//! Each `EnemyKind` picks its movement (`move_toward`), its attack
//! (`maybe_attack`) and its death fallout (`on_death`) from the static
//! templates in `tuning`.

use glam::Vec2;
use rand::Rng;

use crate::combat::{Cooldown, Health};
use crate::entities::{
    roll, spray_particles, Body, EntityId, ManaDrop, Owner, Particle, Projectile, World,
};
use crate::tuning::{
    DifficultyProfile, EnemyKind, EnemyTemplate, BULLET_SPAWN_GAP, DEATH_PARTICLES, MANA_DROP_MAX,
    MANA_DROP_MIN,
};

/// Wander applied to the leaper's orbit heading, in radians per frame.
const LEAPER_WANDER: f32 = 0.3;

/// What an enemy decided to do this tick besides moving.
#[derive(Clone, Debug, PartialEq)]
pub enum EnemyAction {
    Fire(Projectile),
    Summon {
        kind: EnemyKind,
        count: u32,
        origin: Vec2,
        hp_scale: f32,
    },
}

/// Damage and push delivered by a contact strike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactHit {
    pub damage: f32,
    pub knockback: f32,
}

/// Everything a death leaves behind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeathSpoils {
    pub mana: Option<ManaDrop>,
    pub particles: Vec<Particle>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub body: Body,
    pub health: Health,
    pub angle: f32,
    /// Follow force per frame, or cruise speed for bouncers.
    pub speed: f32,
    pub stop_distance: f32,
    /// Difficulty-scaled damage of this variant's attack.
    pub damage: f32,
    pub bullet_speed: f32,
    pub gun: Cooldown,
    /// Summon interval or leap recharge.
    pub ability: Cooldown,
    pub contact: Cooldown,
    /// Seconds since detonation, for exploders that have gone off.
    pub fuse: Option<f32>,
    pub orbit_sign: f32,
    /// Summoned minions are not part of the wave quota.
    pub minion: bool,
    dead: bool,
}

impl Enemy {
    /// Roll a fresh enemy of `kind` at `pos`. Health scales with the rolled
    /// radius and with the difficulty's HP multiplier.
    pub fn spawn(
        id: EntityId,
        kind: EnemyKind,
        pos: Vec2,
        profile: &DifficultyProfile,
        rng: &mut impl Rng,
    ) -> Self {
        let template = kind.template();
        let radius = roll(rng, template.radius);
        let mut enemy = Self::build(id, kind, pos, radius, profile, rng);

        if kind == EnemyKind::Bouncer {
            let heading = rng.gen_range(0.0..std::f32::consts::TAU);
            enemy.body.vel = Vec2::from_angle(heading) * enemy.speed;
        }
        if template.leap.is_some() && rng.gen_bool(0.5) {
            enemy.orbit_sign = -1.0;
        }
        enemy
    }

    /// A weaker, minimum-size copy produced by a summoner.
    pub fn summoned(
        id: EntityId,
        kind: EnemyKind,
        pos: Vec2,
        hp_scale: f32,
        profile: &DifficultyProfile,
        rng: &mut impl Rng,
    ) -> Self {
        let radius = kind.template().radius.0;
        let mut enemy = Self::build(id, kind, pos, radius, profile, rng);
        enemy.health = Health::new((enemy.health.max() * hp_scale).trunc().max(1.0));
        enemy.minion = true;
        enemy
    }

    fn build(
        id: EntityId,
        kind: EnemyKind,
        pos: Vec2,
        radius: f32,
        profile: &DifficultyProfile,
        rng: &mut impl Rng,
    ) -> Self {
        let template = kind.template();
        let size_scale = radius / template.radius.1;
        let base_hp = (template.hp * size_scale).trunc();
        let max_hp = (base_hp * profile.enemy_hp).trunc().max(1.0);

        let base_damage = template
            .gun
            .map(|g| g.damage)
            .or(template.explosion.map(|e| e.damage))
            .or(template.contact.map(|c| c.damage))
            .unwrap_or(0.0);

        let mut body = Body::new(pos, radius);
        body.friction = template.friction;

        Self {
            id,
            kind,
            body,
            health: Health::new(max_hp),
            angle: 0.0,
            speed: roll(rng, template.speed) * profile.enemy_speed,
            stop_distance: template.stop_distance,
            damage: (base_damage * profile.enemy_damage).trunc(),
            bullet_speed: template.gun.map(|g| roll(rng, g.bullet_speed)).unwrap_or(0.0),
            gun: Cooldown::ready(template.gun.map(|g| g.delay).unwrap_or(0.0)),
            ability: Cooldown::charged(
                template
                    .summon
                    .map(|s| s.interval)
                    .or(template.leap.map(|l| l.cooldown))
                    .unwrap_or(0.0),
            ),
            contact: Cooldown::charged(template.contact.map(|c| c.cooldown).unwrap_or(0.0)),
            fuse: None,
            orbit_sign: 1.0,
            minion: false,
            dead: false,
        }
    }

    pub fn template(&self) -> &'static EnemyTemplate {
        self.kind.template()
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_exploding(&self) -> bool {
        self.fuse.is_some()
    }

    /// Exploders whose blast has finished lingering.
    pub fn fuse_burnt(&self) -> bool {
        match (self.fuse, self.template().explosion) {
            (Some(elapsed), Some(spec)) => elapsed >= spec.fuse,
            _ => false,
        }
    }

    /// Whether this enemy can currently be hit by player attacks.
    pub fn is_targetable(&self) -> bool {
        !self.dead && !self.is_exploding()
    }

    /// Returns whether this hit was the killing blow.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_targetable() {
            return false;
        }
        self.health.apply_damage(amount)
    }

    // ── Movement ──────────────────────────────────────────────────────────────

    /// Steer according to the variant's movement style.
    pub fn move_toward(&mut self, target: Vec2, world: &World, rng: &mut impl Rng) {
        let to_target = target - self.body.pos;
        let distance = to_target.length();
        let dir = to_target.normalize_or_zero();
        if dir != Vec2::ZERO {
            self.angle = dir.y.atan2(dir.x);
        }

        match self.kind {
            EnemyKind::Shooter | EnemyKind::Tank => {
                if distance > self.stop_distance {
                    self.body.accelerate(dir * self.speed);
                }
            }
            EnemyKind::Exploder => {
                if !self.is_exploding() {
                    self.body.accelerate(dir * self.speed);
                }
            }
            EnemyKind::Bouncer => self.bounce(world),
            EnemyKind::Leaper => self.orbit(distance, dir, rng),
        }
    }

    /// Reflect off the walls and hold cruise speed.
    fn bounce(&mut self, world: &World) {
        let r = self.body.radius;
        let pos = self.body.pos;
        if pos.x <= r {
            self.body.vel.x = self.body.vel.x.abs();
        } else if pos.x >= world.width - r {
            self.body.vel.x = -self.body.vel.x.abs();
        }
        if pos.y <= r {
            self.body.vel.y = self.body.vel.y.abs();
        } else if pos.y >= world.height - r {
            self.body.vel.y = -self.body.vel.y.abs();
        }
        self.body.vel = self.body.vel.normalize_or_zero() * self.speed;
    }

    /// Circle the target at the orbit radius, drifting a little, and leap in
    /// whenever the leap has recharged and the target is close enough.
    fn orbit(&mut self, distance: f32, dir: Vec2, rng: &mut impl Rng) {
        let Some(leap) = self.template().leap else {
            return;
        };
        if dir == Vec2::ZERO {
            return;
        }

        if self.ability.is_ready() && distance <= leap.range {
            self.ability.trigger();
            self.body.apply_force(dir * leap.impulse);
            return;
        }

        let radial = ((distance - leap.orbit_radius) / leap.orbit_radius).clamp(-1.0, 1.0);
        let tangent = dir.perp() * self.orbit_sign;
        let wander = Vec2::from_angle(rng.gen_range(-LEAPER_WANDER..=LEAPER_WANDER));
        let heading = wander.rotate((dir * radial + tangent).normalize_or_zero());
        self.body.accelerate(heading * self.speed);
    }

    /// Move, integrate and run down every timer.
    pub fn update(&mut self, dt: f32, target: Vec2, world: &World, rng: &mut impl Rng) {
        if self.dead {
            return;
        }
        self.move_toward(target, world, rng);
        self.body.integrate(dt, world);
        self.gun.tick(dt);
        self.ability.tick(dt);
        self.contact.tick(dt);
        if let Some(elapsed) = self.fuse.as_mut() {
            *elapsed += dt;
        }
    }

    // ── Attacks ───────────────────────────────────────────────────────────────

    /// Ranged shot or summon, if the variant has one and it is ready.
    pub fn maybe_attack(&mut self, target: Vec2, rng: &mut impl Rng) -> Option<EnemyAction> {
        if !self.is_targetable() {
            return None;
        }
        let template = self.template();

        if let Some(gun) = template.gun {
            let distance = self.body.distance_to(target);
            if self.gun.is_ready() && distance <= gun.range {
                self.gun.trigger();
                let to_target = target - self.body.pos;
                let angle = to_target.y.atan2(to_target.x) + rng.gen_range(-gun.spread..=gun.spread);
                return Some(EnemyAction::Fire(Projectile::from_rim(
                    self.body.pos,
                    self.body.radius + BULLET_SPAWN_GAP,
                    angle,
                    self.bullet_speed,
                    self.damage,
                    Owner::Enemy,
                )));
            }
        }

        if let Some(summon) = template.summon {
            if self.ability.try_trigger() {
                return Some(EnemyAction::Summon {
                    kind: summon.kind,
                    count: summon.count,
                    origin: self.body.pos,
                    hp_scale: summon.hp_scale,
                });
            }
        }
        None
    }

    /// Cooldown-gated contact damage for bouncers and leapers.
    pub fn contact_strike(&mut self) -> Option<ContactHit> {
        let spec = self.template().contact?;
        if self.dead || !self.contact.try_trigger() {
            return None;
        }
        Some(ContactHit {
            damage: self.damage,
            knockback: spec.knockback,
        })
    }

    /// Light the fuse. Returns the blast radius the first time only.
    pub fn detonate(&mut self) -> Option<f32> {
        let spec = self.template().explosion?;
        if self.dead || self.is_exploding() {
            return None;
        }
        self.fuse = Some(0.0);
        self.body.vel = Vec2::ZERO;
        Some(spec.radius)
    }

    // ── Death ─────────────────────────────────────────────────────────────────

    /// Mark dead and produce the death fallout. Later calls return `None`, so
    /// fallout is produced exactly once. Exploders that detonated leave no mana.
    pub fn on_death(&mut self, rng: &mut impl Rng) -> Option<DeathSpoils> {
        if self.dead {
            return None;
        }
        self.dead = true;

        let particles = spray_particles(self.body.pos, self.template().color, DEATH_PARTICLES, rng);
        let mana = if self.is_exploding() {
            None
        } else {
            Some(ManaDrop::new(
                self.body.pos,
                rng.gen_range(MANA_DROP_MIN..=MANA_DROP_MAX),
            ))
        };
        Some(DeathSpoils { mana, particles })
    }
}
