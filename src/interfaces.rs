//! Seams between the simulation core and whatever front end drives it.
//!
//! The core never talks to a terminal or window directly. It reads an
//! `InputSource` once per tick and pushes `Sprite`s into a `Renderer`, with
//! a `Camera` translating between screen and world coordinates.

use glam::Vec2;

use crate::compute::GameState;
use crate::enemies::Enemy;
use crate::entities::{ManaDrop, Particle, Projectile, World};
use crate::player::Player;

/// Logical controls the core understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Dash,
    Shield,
    Burst,
    UpgradeDamage,
    UpgradeSpeed,
    UpgradeHealth,
}

pub trait InputSource {
    fn is_down(&self, action: Action) -> bool;

    /// Cursor position in screen coordinates, if the source has one.
    fn cursor(&self) -> Option<Vec2>;
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Smoothing factor applied each `follow` call.
pub const CAMERA_SMOOTHING: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World coordinate of the viewport's top-left corner.
    pub offset: Vec2,
    /// Viewport size in world units.
    pub viewport: Vec2,
    pub smoothing: f32,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport,
            smoothing: CAMERA_SMOOTHING,
        }
    }

    /// Offset that centres `target`, kept inside the world.
    fn desired(&self, target: Vec2, world: &World) -> Vec2 {
        let max = (Vec2::new(world.width, world.height) - self.viewport).max(Vec2::ZERO);
        (target - self.viewport / 2.0).clamp(Vec2::ZERO, max)
    }

    /// Ease toward `target`.
    pub fn follow(&mut self, target: Vec2, world: &World) {
        let desired = self.desired(target, world);
        self.offset += (desired - self.offset) * self.smoothing;
    }

    /// Jump straight to `target`, e.g. on a fresh run.
    pub fn snap_to(&mut self, target: Vec2, world: &World) {
        self.offset = self.desired(target, world);
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// One drawable thing, borrowed from the state for the length of a frame.
#[derive(Clone, Copy, Debug)]
pub enum Sprite<'a> {
    Player(&'a Player),
    Enemy(&'a Enemy),
    Projectile(&'a Projectile),
    Mana(&'a ManaDrop),
    Particle(&'a Particle),
}

pub trait Renderer {
    fn draw(&mut self, sprite: Sprite<'_>, camera_offset: Vec2);
}

/// Push every live entity into `renderer`, back to front: mana, particles,
/// projectiles, enemies, then the player on top.
pub fn render_frame(state: &GameState, camera: &Camera, renderer: &mut impl Renderer) {
    let offset = camera.offset;
    for drop in state.mana_drops.iter().filter(|d| !d.collected) {
        renderer.draw(Sprite::Mana(drop), offset);
    }
    for particle in state.particles.iter().filter(|p| p.is_alive()) {
        renderer.draw(Sprite::Particle(particle), offset);
    }
    for projectile in state.projectiles.iter().filter(|p| !p.spent) {
        renderer.draw(Sprite::Projectile(projectile), offset);
    }
    for enemy in state.enemies.iter().filter(|e| !e.is_dead()) {
        renderer.draw(Sprite::Enemy(enemy), offset);
    }
    renderer.draw(Sprite::Player(&state.player), offset);
}
