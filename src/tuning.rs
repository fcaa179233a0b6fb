//! Compiled-in gameplay tables.
//!
//! Movement values (accelerations, velocities, projectile speeds) are per
//! reference frame at `REFERENCE_FPS`. Timers are in seconds of simulated time.

use serde::Deserialize;

use crate::entities::Rgb;

// ── World ─────────────────────────────────────────────────────────────────────

pub const WORLD_WIDTH: f32 = 2400.0;
pub const WORLD_HEIGHT: f32 = 1600.0;

/// Frame rate the per-frame movement constants were tuned at.
pub const REFERENCE_FPS: f32 = 60.0;

pub const DEFAULT_ACCELERATION: f32 = 0.5;
pub const DEFAULT_FRICTION: f32 = 0.9;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 20.0;
pub const PLAYER_ACCELERATION: f32 = 0.3;
pub const PLAYER_FRICTION: f32 = 0.85;
pub const PLAYER_TURN_SPEED: f32 = 0.08;
pub const PLAYER_BULLET_SPEED: f32 = 12.0;
pub const PLAYER_BULLET_DAMAGE: f32 = 7.0;
pub const PLAYER_SHOOT_DELAY: f32 = 0.25;
pub const PLAYER_AIM_JITTER: f32 = 0.1;
pub const PLAYER_SPEED_JITTER: (f32, f32) = (0.9, 1.1);

// ── Projectiles ───────────────────────────────────────────────────────────────

pub const BULLET_RADIUS: f32 = 4.0;
/// Gap between the shooter's rim and a freshly fired bullet.
pub const BULLET_SPAWN_GAP: f32 = 5.0;

// ── Mana ──────────────────────────────────────────────────────────────────────

pub const MANA_RADIUS: f32 = 6.0;
pub const MANA_CAPTURE_RADIUS: f32 = 150.0;
pub const MANA_PICKUP_RADIUS: f32 = 20.0;
pub const MANA_COLLECT_SPEED: f32 = 200.0;
pub const MANA_DROP_MIN: u32 = 3;
pub const MANA_DROP_MAX: u32 = 8;
pub const MANA_SPAWN_SECS: f32 = 0.5;
pub const MANA_DROP_HEIGHT: f32 = 30.0;

// ── Particles ─────────────────────────────────────────────────────────────────

pub const DEATH_PARTICLES: usize = 15;
pub const BURST_PARTICLES: usize = 30;
pub const PARTICLE_SPEED: (f32, f32) = (100.0, 300.0);
pub const PARTICLE_LIFETIME: (f32, f32) = (0.5, 1.2);
pub const PARTICLE_DRAG: f32 = 0.95;
pub const PARTICLE_GRAVITY: f32 = 200.0;
pub const PARTICLE_COLOR_JITTER: i16 = 30;

pub const BURST_COLOR: Rgb = Rgb(255, 200, 100);

// ── Upgrades ──────────────────────────────────────────────────────────────────

pub const UPGRADE_DAMAGE_BASE_COST: u32 = 10;
pub const UPGRADE_DAMAGE_COST_STEP: u32 = 5;
pub const UPGRADE_DAMAGE_GAIN: f32 = 5.0;

pub const UPGRADE_SPEED_BASE_COST: u32 = 10;
pub const UPGRADE_SPEED_COST_STEP: u32 = 5;
pub const UPGRADE_SPEED_GAIN: f32 = 2.0;

pub const UPGRADE_HP_BASE_COST: u32 = 15;
pub const UPGRADE_HP_COST_STEP: u32 = 7;
pub const UPGRADE_HP_GAIN: f32 = 20.0;
pub const UPGRADE_HP_HEAL: f32 = 30.0;

// ── Abilities ─────────────────────────────────────────────────────────────────

pub const DASH_COST: u32 = 15;
pub const DASH_DISTANCE: f32 = 200.0;
pub const DASH_COOLDOWN: f32 = 3.0;

pub const SHIELD_COST: u32 = 25;
pub const SHIELD_DURATION: f32 = 5.0;
pub const SHIELD_COOLDOWN: f32 = 15.0;

pub const BURST_COST: u32 = 20;
pub const BURST_DAMAGE: f32 = 15.0;
pub const BURST_RADIUS: f32 = 150.0;
pub const BURST_COOLDOWN: f32 = 8.0;

// ── Waves ─────────────────────────────────────────────────────────────────────

pub const WAVE_BASE_ENEMIES: u32 = 5;
pub const WAVE_ENEMY_INCREMENT: u32 = 3;
pub const WAVE_INTERMISSION_SECS: f32 = 10.0;

/// Depth of the band along each world edge that enemies spawn in.
pub const SPAWN_BORDER_MARGIN: f32 = 150.0;
/// Closest a sampled spawn point may get to the world edge.
pub const SPAWN_EDGE_INSET: f32 = 50.0;
pub const SPAWN_FALLBACK_INSET: f32 = 80.0;
pub const SPAWN_MIN_PLAYER_DISTANCE: f32 = 300.0;
pub const SPAWN_MAX_ATTEMPTS: u32 = 10;

// ── Difficulty ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Multipliers applied to every enemy and to the wave quota.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    pub enemy_speed: f32,
    pub enemy_hp: f32,
    pub enemy_damage: f32,
    pub spawn_rate: f32,
    pub waves_to_win: u32,
    pub player_hp: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                enemy_speed: 0.8,
                enemy_hp: 0.9,
                enemy_damage: 0.8,
                spawn_rate: 0.9,
                waves_to_win: 10,
                player_hp: 60.0,
            },
            Difficulty::Normal => DifficultyProfile {
                enemy_speed: 1.1,
                enemy_hp: 1.2,
                enemy_damage: 1.2,
                spawn_rate: 1.1,
                waves_to_win: 15,
                player_hp: 50.0,
            },
            Difficulty::Hard => DifficultyProfile {
                enemy_speed: 1.4,
                enemy_hp: 1.6,
                enemy_damage: 1.7,
                spawn_rate: 1.4,
                waves_to_win: 20,
                player_hp: 35.0,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

// ── Enemy templates ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Shooter,
    Exploder,
    Bouncer,
    Tank,
    Leaper,
}

/// Ranged attack gated on cooldown and range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunSpec {
    pub delay: f32,
    pub range: f32,
    pub damage: f32,
    pub bullet_speed: (f32, f32),
    pub spread: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionSpec {
    pub radius: f32,
    pub damage: f32,
    /// How long the blast lingers before the exploder is removed.
    pub fuse: f32,
}

/// Damage dealt on body contact, at most once per `cooldown`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactSpec {
    pub damage: f32,
    pub cooldown: f32,
    pub knockback: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SummonSpec {
    pub interval: f32,
    pub count: u32,
    pub kind: EnemyKind,
    /// Health multiplier for summoned minions relative to a regular spawn.
    pub hp_scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeapSpec {
    pub orbit_radius: f32,
    pub range: f32,
    pub impulse: f32,
    pub cooldown: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTemplate {
    pub color: Rgb,
    pub radius: (f32, f32),
    pub hp: f32,
    /// Follow force per frame, or cruise speed for constant-speed movers.
    pub speed: (f32, f32),
    pub stop_distance: f32,
    pub friction: f32,
    pub gun: Option<GunSpec>,
    pub explosion: Option<ExplosionSpec>,
    pub contact: Option<ContactSpec>,
    pub summon: Option<SummonSpec>,
    pub leap: Option<LeapSpec>,
}

const SHOOTER: EnemyTemplate = EnemyTemplate {
    color: Rgb(255, 80, 80),
    radius: (10.0, 15.0),
    hp: 30.0,
    speed: (0.3, 0.3),
    stop_distance: 100.0,
    friction: DEFAULT_FRICTION,
    gun: Some(GunSpec {
        delay: 2.0,
        range: 300.0,
        damage: 5.0,
        bullet_speed: (10.0, 20.0),
        spread: 0.15,
    }),
    explosion: None,
    contact: None,
    summon: None,
    leap: None,
};

const EXPLODER: EnemyTemplate = EnemyTemplate {
    color: Rgb(255, 150, 50),
    radius: (12.0, 18.0),
    hp: 25.0,
    speed: (0.5, 0.5),
    stop_distance: 0.0,
    friction: DEFAULT_FRICTION,
    gun: None,
    explosion: Some(ExplosionSpec { radius: 80.0, damage: 20.0, fuse: 0.3 }),
    contact: None,
    summon: None,
    leap: None,
};

const BOUNCER: EnemyTemplate = EnemyTemplate {
    color: Rgb(150, 255, 150),
    radius: (10.0, 16.0),
    hp: 35.0,
    speed: (4.5, 7.0),
    stop_distance: 0.0,
    friction: 1.0,
    gun: None,
    explosion: None,
    contact: Some(ContactSpec { damage: 25.0, cooldown: 0.5, knockback: 0.0 }),
    summon: None,
    leap: None,
};

const TANK: EnemyTemplate = EnemyTemplate {
    color: Rgb(150, 150, 200),
    radius: (18.0, 25.0),
    hp: 60.0,
    speed: (0.15, 0.15),
    stop_distance: 150.0,
    friction: DEFAULT_FRICTION,
    gun: Some(GunSpec {
        delay: 3.0,
        range: 250.0,
        damage: 8.0,
        bullet_speed: (8.0, 15.0),
        spread: 0.1,
    }),
    explosion: None,
    contact: None,
    summon: Some(SummonSpec {
        interval: 6.0,
        count: 2,
        kind: EnemyKind::Shooter,
        hp_scale: 0.5,
    }),
    leap: None,
};

const LEAPER: EnemyTemplate = EnemyTemplate {
    color: Rgb(10, 182, 10),
    radius: (13.0, 17.0),
    hp: 26.0,
    speed: (0.4, 0.8),
    stop_distance: 0.0,
    friction: DEFAULT_FRICTION,
    gun: None,
    explosion: None,
    contact: Some(ContactSpec { damage: 10.0, cooldown: 1.0, knockback: 14.0 }),
    summon: None,
    leap: Some(LeapSpec {
        orbit_radius: 180.0,
        range: 320.0,
        impulse: 12.0,
        cooldown: 2.5,
    }),
};

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Shooter,
        EnemyKind::Exploder,
        EnemyKind::Bouncer,
        EnemyKind::Tank,
        EnemyKind::Leaper,
    ];

    pub fn template(self) -> &'static EnemyTemplate {
        match self {
            EnemyKind::Shooter => &SHOOTER,
            EnemyKind::Exploder => &EXPLODER,
            EnemyKind::Bouncer => &BOUNCER,
            EnemyKind::Tank => &TANK,
            EnemyKind::Leaper => &LEAPER,
        }
    }

    /// Selection weight at a given wave. Harder variants grow, capped.
    pub fn weight(self, wave: u32) -> u32 {
        match self {
            EnemyKind::Shooter => 10,
            EnemyKind::Bouncer => 5 + wave.min(10),
            EnemyKind::Exploder => 3 + (wave / 2).min(8),
            EnemyKind::Leaper => 2 + (wave / 4).min(4),
            EnemyKind::Tank => (wave / 3).min(5),
        }
    }
}

/// Wave thresholds at which each roster becomes available.
pub const UNLOCKS: [(u32, &[EnemyKind]); 5] = [
    (0, &[EnemyKind::Shooter]),
    (3, &[EnemyKind::Shooter, EnemyKind::Bouncer]),
    (6, &[EnemyKind::Shooter, EnemyKind::Bouncer, EnemyKind::Exploder]),
    (
        8,
        &[EnemyKind::Shooter, EnemyKind::Bouncer, EnemyKind::Exploder, EnemyKind::Leaper],
    ),
    (
        10,
        &[
            EnemyKind::Shooter,
            EnemyKind::Bouncer,
            EnemyKind::Exploder,
            EnemyKind::Leaper,
            EnemyKind::Tank,
        ],
    ),
];
