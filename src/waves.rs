//! Wave progression: quota, roster, weighted selection and spawn placement.
//!
//! The manager only keeps counters. It never owns enemies; the simulation
//! asks it for spawn lists and positions and reports kills back.

use glam::Vec2;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{debug, info};

use crate::entities::World;
use crate::tuning::{
    Difficulty, DifficultyProfile, EnemyKind, SPAWN_BORDER_MARGIN, SPAWN_EDGE_INSET,
    SPAWN_FALLBACK_INSET, SPAWN_MAX_ATTEMPTS, UNLOCKS, WAVE_BASE_ENEMIES, WAVE_ENEMY_INCREMENT,
};

/// Summary handed back by `start_wave`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveInfo {
    pub wave_number: u32,
    pub total_waves: u32,
    pub enemies_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn next(self) -> Edge {
        match self {
            Edge::Top => Edge::Right,
            Edge::Right => Edge::Bottom,
            Edge::Bottom => Edge::Left,
            Edge::Left => Edge::Top,
        }
    }

    /// Random point inside this edge's spawn band.
    fn sample(self, world: &World, rng: &mut impl Rng) -> Vec2 {
        let (w, h) = (world.width, world.height);
        let (m, inset) = (SPAWN_BORDER_MARGIN, SPAWN_EDGE_INSET);
        match self {
            Edge::Top => Vec2::new(span(rng, m, w - m), span(rng, inset, m)),
            Edge::Right => Vec2::new(span(rng, w - m, w - inset), span(rng, m, h - m)),
            Edge::Bottom => Vec2::new(span(rng, m, w - m), span(rng, h - m, h - inset)),
            Edge::Left => Vec2::new(span(rng, inset, m), span(rng, m, h - m)),
        }
    }

    fn midpoint(self, world: &World) -> Vec2 {
        let (w, h) = (world.width, world.height);
        match self {
            Edge::Top => Vec2::new(w / 2.0, SPAWN_FALLBACK_INSET),
            Edge::Right => Vec2::new(w - SPAWN_FALLBACK_INSET, h / 2.0),
            Edge::Bottom => Vec2::new(w / 2.0, h - SPAWN_FALLBACK_INSET),
            Edge::Left => Vec2::new(SPAWN_FALLBACK_INSET, h / 2.0),
        }
    }
}

fn span(rng: &mut impl Rng, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

/// A spawn position, flagged when every sampled attempt was too close to the
/// player and the deterministic fallback was used instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub pos: Vec2,
    pub fallback: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveManager {
    difficulty: Difficulty,
    profile: DifficultyProfile,
    current_wave: u32,
    waves_to_win: u32,
    enemies_remaining: u32,
    wave_active: bool,
}

impl WaveManager {
    pub fn new(difficulty: Difficulty) -> Self {
        let profile = difficulty.profile();
        Self {
            difficulty,
            profile,
            current_wave: 0,
            waves_to_win: profile.waves_to_win,
            enemies_remaining: 0,
            wave_active: false,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn waves_to_win(&self) -> u32 {
        self.waves_to_win
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.enemies_remaining
    }

    pub fn is_wave_active(&self) -> bool {
        self.wave_active
    }

    /// Number of spawn tokens for `wave`: linear growth scaled by spawn rate.
    pub fn quota(wave: u32, profile: &DifficultyProfile) -> u32 {
        let base = WAVE_BASE_ENEMIES + wave.saturating_sub(1) * WAVE_ENEMY_INCREMENT;
        (base as f32 * profile.spawn_rate) as u32
    }

    pub fn start_wave(&mut self) -> WaveInfo {
        self.current_wave += 1;
        self.enemies_remaining = Self::quota(self.current_wave, &self.profile);
        self.wave_active = self.enemies_remaining > 0;

        let info = self.info();
        info!(
            wave = info.wave_number,
            total = info.total_waves,
            enemies = info.enemies_count,
            "wave started"
        );
        info
    }

    pub fn info(&self) -> WaveInfo {
        WaveInfo {
            wave_number: self.current_wave,
            total_waves: self.waves_to_win,
            enemies_count: self.enemies_remaining,
        }
    }

    /// Enemy kinds unlocked at `wave`.
    pub fn roster(wave: u32) -> &'static [EnemyKind] {
        UNLOCKS
            .iter()
            .rev()
            .find(|(threshold, _)| wave >= *threshold)
            .map(|(_, kinds)| *kinds)
            .unwrap_or(&[EnemyKind::Shooter])
    }

    /// Weighted pick from `kinds` using the current wave's weights.
    pub fn select_kind(&self, kinds: &[EnemyKind], rng: &mut impl Rng) -> EnemyKind {
        let weights = kinds.iter().map(|k| k.weight(self.current_wave));
        match WeightedIndex::new(weights) {
            Ok(dist) => kinds[dist.sample(rng)],
            Err(_) => EnemyKind::Shooter,
        }
    }

    /// One enemy kind per remaining token, empty while no wave is running.
    pub fn spawn_list(&self, rng: &mut impl Rng) -> Vec<EnemyKind> {
        if !self.wave_active {
            return Vec::new();
        }
        let kinds = Self::roster(self.current_wave);
        (0..self.enemies_remaining)
            .map(|_| self.select_kind(kinds, rng))
            .collect()
    }

    /// Pick a point in a random edge band at least `min_distance` from the
    /// player, rotating edges between attempts. Gives up after
    /// `SPAWN_MAX_ATTEMPTS` and falls back to the edge midpoint farthest from
    /// the player.
    pub fn spawn_position(
        &self,
        world: &World,
        player_pos: Vec2,
        min_distance: f32,
        rng: &mut impl Rng,
    ) -> SpawnPoint {
        let mut edge = Edge::ALL[rng.gen_range(0..Edge::ALL.len())];
        for _ in 0..SPAWN_MAX_ATTEMPTS {
            let pos = edge.sample(world, rng);
            if pos.distance(player_pos) >= min_distance {
                return SpawnPoint { pos, fallback: false };
            }
            edge = edge.next();
        }

        let pos = Edge::ALL
            .iter()
            .map(|e| e.midpoint(world))
            .max_by(|a, b| a.distance(player_pos).total_cmp(&b.distance(player_pos)))
            .unwrap_or_else(|| world.center());
        debug!(x = pos.x, y = pos.y, "spawn fell back to edge midpoint");
        SpawnPoint { pos, fallback: true }
    }

    pub fn enemy_killed(&mut self) {
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
        if self.enemies_remaining == 0 {
            self.wave_active = false;
        }
    }

    /// Complete only when the quota is used up and nothing is left alive,
    /// including summoned minions that never counted toward the quota.
    pub fn is_wave_complete(&self, live_enemies: usize) -> bool {
        !self.wave_active && self.enemies_remaining == 0 && live_enemies == 0
    }

    pub fn is_game_won(&self, live_enemies: usize) -> bool {
        self.current_wave >= self.waves_to_win && self.is_wave_complete(live_enemies)
    }
}
