//! Leaf entity types shared by every simulated object.
//!
//! Nothing in here knows about players, enemies or waves; higher layers
//! compose these pieces.

use glam::Vec2;
use rand::Rng;

use crate::tuning::{
    BULLET_RADIUS, DEFAULT_ACCELERATION, DEFAULT_FRICTION, MANA_CAPTURE_RADIUS,
    MANA_COLLECT_SPEED, MANA_DROP_HEIGHT, MANA_RADIUS, MANA_SPAWN_SECS, PARTICLE_COLOR_JITTER,
    PARTICLE_DRAG, PARTICLE_GRAVITY, PARTICLE_LIFETIME, PARTICLE_SPEED, REFERENCE_FPS,
    WORLD_HEIGHT, WORLD_WIDTH,
};

/// Stable identifier handed out by the simulation; never reused within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Shift every channel by an independent random amount in `±spread`.
    pub fn jitter(self, spread: i16, rng: &mut impl Rng) -> Rgb {
        let mut channel = |c: u8| {
            let shifted = c as i16 + rng.gen_range(-spread..=spread);
            shifted.clamp(0, 255) as u8
        };
        Rgb(channel(self.0), channel(self.1), channel(self.2))
    }
}

/// Sample uniformly from an inclusive `(low, high)` pair, tolerating `low == high`.
pub fn roll(rng: &mut impl Rng, (low, high): (f32, f32)) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// Convert a `dt` in seconds into reference frames.
#[inline]
pub fn frames(dt: f32) -> f32 {
    dt * REFERENCE_FPS
}

// ── World ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl Default for World {
    fn default() -> Self {
        Self { width: WORLD_WIDTH, height: WORLD_HEIGHT }
    }
}

impl World {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a centre point so a circle of `radius` stays fully inside.
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, (self.width - radius).max(radius)),
            pos.y.clamp(radius, (self.height - radius).max(radius)),
        )
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.x <= self.width && pos.y >= 0.0 && pos.y <= self.height
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Position/velocity/radius primitive shared by the player, enemies and drops.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub acceleration: f32,
    pub friction: f32,
    /// Acceleration per reference frame, consumed by the next `integrate`.
    pub thrust: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            acceleration: DEFAULT_ACCELERATION,
            friction: DEFAULT_FRICTION,
            thrust: Vec2::ZERO,
        }
    }

    /// Instant change of velocity.
    pub fn apply_force(&mut self, force: Vec2) {
        self.vel += force;
    }

    /// Steady push, applied on every reference frame of the next step.
    pub fn accelerate(&mut self, per_frame: Vec2) {
        self.thrust += per_frame;
    }

    /// Run `frames(dt)` reference frames of `vel = (vel + thrust) * friction;
    /// pos += vel` in closed form, then clamp into `[radius, dim - radius]`.
    /// The path is the same whatever the tick rate.
    pub fn integrate(&mut self, dt: f32, world: &World) {
        let n = frames(dt);
        let thrust = std::mem::take(&mut self.thrust);
        let friction = self.friction;

        let (travel, vel) = if (1.0 - friction).abs() <= f32::EPSILON {
            (
                self.vel * n + thrust * (n * (n + 1.0) / 2.0),
                self.vel + thrust * n,
            )
        } else {
            let decay = friction.powf(n);
            // Sum of friction^k for k in 1..=n.
            let damped = friction * (1.0 - decay) / (1.0 - friction);
            (
                self.vel * damped + thrust * (friction / (1.0 - friction) * (n - damped)),
                self.vel * decay + thrust * damped,
            )
        };

        self.vel = vel;
        self.pos = world.clamp(self.pos + travel, self.radius);
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.pos.distance(point)
    }

    /// Circle-circle overlap, touching counts.
    pub fn overlaps(&self, pos: Vec2, radius: f32) -> bool {
        self.pos.distance(pos) <= self.radius + radius
    }

    /// Unit vector toward `target`, or zero when already on top of it.
    pub fn direction_to(&self, target: Vec2) -> Vec2 {
        (target - self.pos).normalize_or_zero()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub owner: Owner,
    /// Set once the projectile hit something or left the world.
    pub spent: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, angle: f32, speed: f32, damage: f32, owner: Owner) -> Self {
        Self {
            pos,
            angle,
            speed,
            damage,
            radius: BULLET_RADIUS,
            owner,
            spent: false,
        }
    }

    /// Fire from the rim of a circle of `radius` centred at `origin`.
    pub fn from_rim(
        origin: Vec2,
        radius: f32,
        angle: f32,
        speed: f32,
        damage: f32,
        owner: Owner,
    ) -> Self {
        let muzzle = origin + Vec2::from_angle(angle) * radius;
        Self::new(muzzle, angle, speed, damage, owner)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::from_angle(self.angle) * self.speed
    }

    /// Straight-line motion; leaving the world spends the projectile.
    pub fn update(&mut self, dt: f32, world: &World) {
        if self.spent {
            return;
        }
        self.pos += self.velocity() * frames(dt);
        if !world.contains(self.pos) {
            self.spent = true;
        }
    }

    /// Whether this projectile may damage a combatant on `side`.
    pub fn can_hit(&self, side: Owner) -> bool {
        !self.spent && self.owner != side
    }
}

// ── Mana drops ────────────────────────────────────────────────────────────────

/// Currency dropped by a dead enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct ManaDrop {
    pub pos: Vec2,
    pub amount: u32,
    pub radius: f32,
    pub capture_radius: f32,
    /// Seconds since the drop appeared; the fall animation runs for `MANA_SPAWN_SECS`.
    pub age: f32,
    pub start_y: f32,
    pub rest_y: f32,
    pub attracted: bool,
    pub collected: bool,
}

impl ManaDrop {
    /// The drop falls from just above `pos`; both ends of the fall are kept
    /// inside the default arena.
    pub fn new(pos: Vec2, amount: u32) -> Self {
        let rest = World::default().clamp(pos, MANA_RADIUS);
        let start_y = (rest.y - MANA_DROP_HEIGHT).max(MANA_RADIUS);
        Self {
            pos: Vec2::new(rest.x, start_y),
            amount,
            radius: MANA_RADIUS,
            capture_radius: MANA_CAPTURE_RADIUS,
            age: 0.0,
            start_y,
            rest_y: rest.y,
            attracted: false,
            collected: false,
        }
    }

    /// Spawn-animation progress in `0..=1`.
    pub fn progress(&self) -> f32 {
        (self.age / MANA_SPAWN_SECS).min(1.0)
    }

    pub fn is_settled(&self) -> bool {
        self.age >= MANA_SPAWN_SECS
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2) {
        if self.collected {
            return;
        }
        if !self.is_settled() {
            self.age += dt;
            let t = 1.0 - (1.0 - self.progress()).powi(3);
            self.pos.y = self.start_y + (self.rest_y - self.start_y) * t;
            return;
        }

        let distance = self.pos.distance(player_pos);
        if distance < self.capture_radius {
            self.attracted = true;
            let dir = (player_pos - self.pos).normalize_or_zero();
            let pull = 1.0 + (self.capture_radius - distance) / self.capture_radius;
            let step = (MANA_COLLECT_SPEED * pull * dt).min(distance);
            self.pos += dir * step;
        }
    }
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    pub lifetime: f32,
    pub max_lifetime: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            return;
        }
        self.pos += self.vel * dt;
        self.vel *= PARTICLE_DRAG.powf(frames(dt));
        self.vel.y += PARTICLE_GRAVITY * dt;
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Remaining life as a fraction, for fading.
    pub fn fade(&self) -> f32 {
        if self.max_lifetime > 0.0 {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Radial spray of short-lived particles around `origin`.
pub fn spray_particles(origin: Vec2, color: Rgb, count: usize, rng: &mut impl Rng) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = roll(rng, PARTICLE_SPEED);
            let lifetime = roll(rng, PARTICLE_LIFETIME);
            Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                color: color.jitter(PARTICLE_COLOR_JITTER, rng),
                lifetime,
                max_lifetime: lifetime,
            }
        })
        .collect()
}
