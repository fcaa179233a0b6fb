//! Pure game-logic functions.
//!
//! `tick` takes an immutable reference to the current `GameState`, the
//! input snapshot for this frame and an RNG handle, and returns a brand-new
//! `GameState`. Side effects are limited to the injected RNG and to
//! `tracing` events.

use glam::Vec2;
use rand::Rng;
use tracing::info;

use crate::collision::{self, Graveyard};
use crate::enemies::{Enemy, EnemyAction};
use crate::entities::{spray_particles, EntityId, ManaDrop, Particle, Projectile, World};
use crate::interfaces::{Action, Camera, InputSource};
use crate::player::{Burst, Player, Stat};
use crate::tuning::{
    Difficulty, EnemyKind, BURST_COLOR, BURST_PARTICLES, SPAWN_MIN_PLAYER_DISTANCE,
    WAVE_INTERMISSION_SECS,
};
use crate::waves::WaveManager;

/// How far from the summoner a minion appears.
const SUMMON_SCATTER: f32 = 40.0;

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Countdown before the next wave spawns.
    Intermission { remaining: f32 },
    Wave,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub kills: u32,
    pub mana_collected: u32,
    pub spawn_fallbacks: u32,
    pub waves_cleared: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub world: World,
    pub difficulty: Difficulty,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub mana_drops: Vec<ManaDrop>,
    pub particles: Vec<Particle>,
    pub waves: WaveManager,
    pub phase: Phase,
    pub status: GameStatus,
    pub stats: RunStats,
    pub frame: u64,
    /// Simulated seconds since the run started.
    pub elapsed: f32,
    pub next_id: u64,
}

impl GameState {
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.is_dead()).count()
    }

    /// Seconds until the next wave, while in an intermission.
    pub fn countdown(&self) -> Option<f32> {
        match self.phase {
            Phase::Intermission { remaining } => Some(remaining),
            Phase::Wave => None,
        }
    }
}

// ── Input snapshot ────────────────────────────────────────────────────────────

/// Everything the simulation reads from the player in one tick. Captured
/// once up front; the tick never polls input again.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub dash: bool,
    pub shield: bool,
    pub burst: bool,
    /// Aim point in world coordinates.
    pub aim: Option<Vec2>,
    pub upgrade: Option<Stat>,
}

impl FrameInput {
    pub fn capture(input: &impl InputSource, camera: &Camera) -> Self {
        let upgrade = [
            (Action::UpgradeDamage, Stat::Damage),
            (Action::UpgradeSpeed, Stat::BulletSpeed),
            (Action::UpgradeHealth, Stat::MaxHealth),
        ]
        .into_iter()
        .find(|(action, _)| input.is_down(*action))
        .map(|(_, stat)| stat);

        Self {
            up: input.is_down(Action::Up),
            down: input.is_down(Action::Down),
            left: input.is_down(Action::Left),
            right: input.is_down(Action::Right),
            fire: input.is_down(Action::Fire),
            dash: input.is_down(Action::Dash),
            shield: input.is_down(Action::Shield),
            burst: input.is_down(Action::Burst),
            aim: input.cursor().map(|c| camera.to_world(c)),
            upgrade,
        }
    }

    /// Movement direction with each component in {-1, 0, 1}.
    pub fn axis(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh run: player centred, empty arena, first wave counting down.
pub fn init_state(difficulty: Difficulty) -> GameState {
    let world = World::default();
    GameState {
        world,
        difficulty,
        player: Player::new(world.center(), difficulty),
        enemies: Vec::new(),
        projectiles: Vec::new(),
        mana_drops: Vec::new(),
        particles: Vec::new(),
        waves: WaveManager::new(difficulty),
        phase: Phase::Intermission {
            remaining: WAVE_INTERMISSION_SECS,
        },
        status: GameStatus::Playing,
        stats: RunStats::default(),
        frame: 0,
        elapsed: 0.0,
        next_id: 1,
    }
}

// ── Per-frame tick (nearly pure, RNG is injected) ───────────────────────────

/// Advance the simulation by `dt` seconds. All randomness comes through
/// `rng` so callers control determinism.
pub fn tick(state: &GameState, input: &FrameInput, dt: f32, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    advance(&mut next, input, dt, rng);
    next
}

/// In-place variant of `tick`.
pub fn advance(state: &mut GameState, input: &FrameInput, dt: f32, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing {
        return;
    }
    let dt = dt.max(0.0);
    state.frame += 1;
    state.elapsed += dt;

    // ── 1. Wave countdown and spawning ───────────────────────────────────────
    if let Phase::Intermission { remaining } = state.phase {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            state.phase = Phase::Wave;
            state.waves.start_wave();
            spawn_wave(state, rng);
        } else {
            state.phase = Phase::Intermission { remaining };
        }
    }

    // ── 2. Player ────────────────────────────────────────────────────────────
    apply_player_input(state, input, dt, rng);

    // ── 3. Enemies move ──────────────────────────────────────────────────────
    let target = state.player.pos();
    for enemy in state.enemies.iter_mut() {
        enemy.update(dt, target, &state.world, rng);
    }

    // ── 4. Enemy attacks ─────────────────────────────────────────────────────
    let actions: Vec<EnemyAction> = state
        .enemies
        .iter_mut()
        .filter_map(|e| e.maybe_attack(target, rng))
        .collect();
    for action in actions {
        match action {
            EnemyAction::Fire(projectile) => state.projectiles.push(projectile),
            EnemyAction::Summon {
                kind,
                count,
                origin,
                hp_scale,
            } => summon(state, kind, count, origin, hp_scale, rng),
        }
    }

    // ── 5. Projectiles, mana and particles ───────────────────────────────────
    for projectile in state.projectiles.iter_mut() {
        projectile.update(dt, &state.world);
    }
    let player_pos = state.player.pos();
    for drop in state.mana_drops.iter_mut() {
        drop.update(dt, player_pos);
    }
    for particle in state.particles.iter_mut() {
        particle.update(dt);
    }

    // ── 6. Collisions ────────────────────────────────────────────────────────
    collision::resolve(state, rng);

    // ── 7. Compact ───────────────────────────────────────────────────────────
    state.projectiles.retain(|p| !p.spent);
    state.enemies.retain(|e| !e.is_dead());
    state.mana_drops.retain(|d| !d.collected);
    state.particles.retain(|p| p.is_alive());

    // ── 8. Wave completion, then win/loss ────────────────────────────────────
    let live = state.live_enemies();
    let cleared = state.phase == Phase::Wave && state.waves.is_wave_complete(live);
    if cleared {
        state.stats.waves_cleared += 1;
    }

    if state.player.is_dead() {
        state.status = GameStatus::Lost;
        info!(
            wave = state.waves.current_wave(),
            kills = state.stats.kills,
            "defeat"
        );
    } else if cleared && state.waves.is_game_won(live) {
        state.status = GameStatus::Won;
        info!(
            waves = state.stats.waves_cleared,
            kills = state.stats.kills,
            "victory"
        );
    } else if cleared {
        state.phase = Phase::Intermission {
            remaining: WAVE_INTERMISSION_SECS,
        };
        info!(wave = state.waves.current_wave(), "wave cleared");
    }
}

// ── Tick stages ───────────────────────────────────────────────────────────────

/// Place one enemy per spawn token along the arena edges.
fn spawn_wave(state: &mut GameState, rng: &mut impl Rng) {
    let profile = *state.waves.profile();
    let player_pos = state.player.pos();
    for kind in state.waves.spawn_list(rng) {
        let point =
            state
                .waves
                .spawn_position(&state.world, player_pos, SPAWN_MIN_PLAYER_DISTANCE, rng);
        if point.fallback {
            state.stats.spawn_fallbacks += 1;
        }
        let id = state.allocate_id();
        state
            .enemies
            .push(Enemy::spawn(id, kind, point.pos, &profile, rng));
    }
}

fn summon(
    state: &mut GameState,
    kind: EnemyKind,
    count: u32,
    origin: Vec2,
    hp_scale: f32,
    rng: &mut impl Rng,
) {
    let profile = *state.waves.profile();
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let pos = origin + Vec2::from_angle(angle) * SUMMON_SCATTER;
        let pos = state.world.clamp(pos, kind.template().radius.0);
        let id = state.allocate_id();
        state
            .enemies
            .push(Enemy::summoned(id, kind, pos, hp_scale, &profile, rng));
    }
}

/// Upgrades, abilities, aim, movement and firing, in that order.
fn apply_player_input(state: &mut GameState, input: &FrameInput, dt: f32, rng: &mut impl Rng) {
    if let Some(stat) = input.upgrade {
        state.player.upgrade(stat);
    }
    if input.dash {
        state.player.use_dash(&state.world);
    }
    if input.shield {
        state.player.use_shield();
    }
    if input.burst {
        if let Some(burst) = state.player.use_burst() {
            apply_burst(state, burst, rng);
        }
    }

    if let Some(aim) = input.aim {
        state.player.aim_at(aim, dt);
    }
    state.player.steer(input.axis());
    state.player.update(dt, &state.world);

    if input.fire {
        if let Some(projectile) = state.player.try_shoot(rng) {
            state.projectiles.push(projectile);
        }
    }
}

/// Area damage around the player. Kills take the same path as bullet kills.
fn apply_burst(state: &mut GameState, burst: Burst, rng: &mut impl Rng) {
    let mut graveyard = Graveyard {
        mana_drops: &mut state.mana_drops,
        particles: &mut state.particles,
        waves: &mut state.waves,
        stats: &mut state.stats,
    };
    for enemy in state.enemies.iter_mut() {
        if !enemy.is_targetable() || enemy.body.distance_to(burst.origin) > burst.radius {
            continue;
        }
        if enemy.take_damage(burst.damage) {
            graveyard.bury(enemy, rng);
        }
    }
    graveyard
        .particles
        .extend(spray_particles(burst.origin, BURST_COLOR, BURST_PARTICLES, rng));
}
