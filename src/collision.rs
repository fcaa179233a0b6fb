//! Per-tick collision and resolution pass.
//!
//! Runs after everything has moved. Removals are only marked here
//! (`spent`, `collected`, enemy death flag); the simulation compacts the
//! collections afterwards, so nothing is processed twice within a tick.

use rand::Rng;
use tracing::debug;

use crate::compute::{GameState, RunStats};
use crate::enemies::Enemy;
use crate::entities::{EntityId, ManaDrop, Owner, Particle};
use crate::tuning::MANA_PICKUP_RADIUS;
use crate::waves::WaveManager;

/// What the pass changed, for callers and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionReport {
    pub kills: Vec<EntityId>,
    pub player_hits: u32,
    pub mana_collected: u32,
}

/// Collections touched when an enemy dies.
pub struct Graveyard<'a> {
    pub mana_drops: &'a mut Vec<ManaDrop>,
    pub particles: &'a mut Vec<Particle>,
    pub waves: &'a mut WaveManager,
    pub stats: &'a mut RunStats,
}

impl Graveyard<'_> {
    /// Run the death side effects for `enemy` once. Returns `false` if it was
    /// already buried.
    pub fn bury(&mut self, enemy: &mut Enemy, rng: &mut impl Rng) -> bool {
        let Some(spoils) = enemy.on_death(rng) else {
            return false;
        };
        self.particles.extend(spoils.particles);
        if let Some(drop) = spoils.mana {
            self.mana_drops.push(drop);
        }
        if !enemy.minion {
            self.waves.enemy_killed();
        }
        self.stats.kills += 1;
        debug!(id = enemy.id.0, kind = ?enemy.kind, "enemy killed");
        true
    }
}

pub fn resolve(state: &mut GameState, rng: &mut impl Rng) -> CollisionReport {
    let mut report = CollisionReport::default();
    let mut graveyard = Graveyard {
        mana_drops: &mut state.mana_drops,
        particles: &mut state.particles,
        waves: &mut state.waves,
        stats: &mut state.stats,
    };

    // ── 1. Player projectiles ↔ enemies ──────────────────────────────────────
    for projectile in state.projectiles.iter_mut() {
        if !projectile.can_hit(Owner::Enemy) {
            continue;
        }
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| e.is_targetable() && e.body.overlaps(projectile.pos, projectile.radius))
        else {
            continue;
        };
        projectile.spent = true;
        if enemy.take_damage(projectile.damage) && graveyard.bury(enemy, rng) {
            report.kills.push(enemy.id);
        }
    }

    // ── 2. Enemy projectiles ↔ player ────────────────────────────────────────
    let player = &mut state.player;
    for projectile in state.projectiles.iter_mut() {
        if !projectile.can_hit(Owner::Player) {
            continue;
        }
        if player.body.overlaps(projectile.pos, projectile.radius) {
            projectile.spent = true;
            player.take_damage(projectile.damage);
            report.player_hits += 1;
        }
    }

    // ── 3. Enemy bodies ↔ player ─────────────────────────────────────────────
    for enemy in state.enemies.iter_mut() {
        if enemy.is_dead() || !enemy.body.overlaps(player.pos(), player.body.radius) {
            continue;
        }
        let distance = enemy.body.distance_to(player.pos());

        if let Some(blast_radius) = enemy.detonate() {
            if distance < blast_radius {
                player.take_damage(enemy.damage);
                report.player_hits += 1;
            }
        } else if let Some(hit) = enemy.contact_strike() {
            player.take_damage(hit.damage);
            let push = enemy.body.direction_to(player.pos()) * hit.knockback;
            player.body.apply_force(push);
            report.player_hits += 1;
        }
    }

    // Exploders are gone once their blast has played out.
    for enemy in state.enemies.iter_mut() {
        if enemy.fuse_burnt() && graveyard.bury(enemy, rng) {
            report.kills.push(enemy.id);
        }
    }

    // ── 4. Mana ↔ player ─────────────────────────────────────────────────────
    for drop in graveyard.mana_drops.iter_mut() {
        if drop.collected || drop.pos.distance(player.pos()) >= MANA_PICKUP_RADIUS {
            continue;
        }
        drop.collected = true;
        player.collect_mana(drop.amount);
        graveyard.stats.mana_collected += drop.amount;
        report.mana_collected += drop.amount;
    }

    report
}
