use arena_shooter::entities::*;
use arena_shooter::player::*;
use arena_shooter::tuning::*;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;

fn make_player() -> Player {
    Player::new(World::default().center(), Difficulty::Normal)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn health_follows_difficulty() {
    let center = World::default().center();
    assert_eq!(Player::new(center, Difficulty::Easy).health.max(), 60.0);
    assert_eq!(Player::new(center, Difficulty::Normal).health.max(), 50.0);
    assert_eq!(Player::new(center, Difficulty::Hard).health.max(), 35.0);
}

#[test]
fn starts_with_base_stats() {
    let p = make_player();
    assert_eq!(p.pos(), Vec2::new(1200.0, 800.0));
    assert_eq!(p.mana, 0);
    assert_eq!(p.bullet_damage, 7.0);
    assert_eq!(p.bullet_speed, 12.0);
    for stat in Stat::ALL {
        assert_eq!(p.level(stat), 1);
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn steer_accelerates_along_axis() {
    let mut p = make_player();
    p.steer(Vec2::new(1.0, 0.0));
    assert!(approx(p.body.thrust.x, PLAYER_ACCELERATION));
    p.update(DT, &World::default());
    assert!(approx(p.body.vel.x, PLAYER_ACCELERATION * PLAYER_FRICTION));
    assert_eq!(p.body.vel.y, 0.0);
    assert_eq!(p.body.thrust, Vec2::ZERO);
}

/// Hold `axis` for one simulated second at `fps` ticks per second.
fn travel_for_one_second(axis: Vec2, fps: u32) -> Vec2 {
    let mut p = make_player();
    let start = p.pos();
    let world = World::default();
    let dt = 1.0 / fps as f32;
    for _ in 0..fps {
        p.steer(axis);
        p.update(dt, &world);
    }
    p.pos() - start
}

#[test]
fn movement_is_independent_of_tick_rate() {
    let at_60 = travel_for_one_second(Vec2::new(1.0, 0.0), 60);
    let at_30 = travel_for_one_second(Vec2::new(1.0, 0.0), 30);
    let at_20 = travel_for_one_second(Vec2::new(1.0, 0.0), 20);
    assert!(at_60.x > 50.0);
    assert!((at_60.x - at_30.x).abs() < 0.05, "{at_60} vs {at_30}");
    assert!((at_60.x - at_20.x).abs() < 0.05, "{at_60} vs {at_20}");
    assert_eq!(at_30.y, 0.0);
}

#[test]
fn aim_turns_gradually_then_locks_on() {
    let mut p = make_player();
    let below = p.pos() + Vec2::new(0.0, 100.0);
    p.aim_at(below, DT);
    assert!(approx(p.angle, PLAYER_TURN_SPEED));
    for _ in 0..30 {
        p.aim_at(below, DT);
    }
    assert!(approx(p.angle, std::f32::consts::FRAC_PI_2));
}

#[test]
fn aim_at_own_position_is_ignored() {
    let mut p = make_player();
    p.angle = 1.0;
    p.aim_at(p.pos(), DT);
    assert_eq!(p.angle, 1.0);
}

// ── Shooting ──────────────────────────────────────────────────────────────────

#[test]
fn shooting_respects_delay() {
    let mut rng = seeded_rng();
    let world = World::default();
    let mut p = make_player();

    let shot = p.try_shoot(&mut rng).expect("first shot");
    assert_eq!(shot.owner, Owner::Player);
    assert_eq!(shot.damage, 7.0);
    assert!(shot.speed >= 12.0 * 0.9 - 1e-3 && shot.speed <= 12.0 * 1.1 + 1e-3);
    assert!(p.body.distance_to(shot.pos) >= PLAYER_RADIUS);

    assert!(p.try_shoot(&mut rng).is_none());
    p.update(PLAYER_SHOOT_DELAY, &world);
    assert!(p.try_shoot(&mut rng).is_some());
}

// ── Abilities ─────────────────────────────────────────────────────────────────

#[test]
fn shield_blocks_damage() {
    let mut p = make_player();
    p.mana = SHIELD_COST;
    assert!(p.use_shield());
    assert_eq!(p.mana, 0);
    assert!(p.shield_active());

    assert!(!p.take_damage(50.0));
    assert_eq!(p.health.current(), 50.0);
}

#[test]
fn shield_wears_off() {
    let world = World::default();
    let mut p = make_player();
    p.mana = SHIELD_COST;
    p.use_shield();
    p.update(SHIELD_DURATION, &world);
    assert!(!p.shield_active());
    p.take_damage(10.0);
    assert_eq!(p.health.current(), 40.0);
}

#[test]
fn abilities_rejected_without_mana() {
    let world = World::default();
    let mut p = make_player();
    p.mana = 10;
    assert!(!p.use_shield());
    assert!(!p.use_dash(&world));
    assert!(p.use_burst().is_none());
    assert_eq!(p.mana, 10);
}

#[test]
fn dash_moves_along_facing_and_cools_down() {
    let world = World::default();
    let mut p = make_player();
    p.mana = DASH_COST * 2;
    assert!(p.use_dash(&world));
    assert_eq!(p.pos(), Vec2::new(1400.0, 800.0));

    // Mana is there but the cooldown is not.
    assert!(!p.use_dash(&world));
    assert_eq!(p.mana, DASH_COST);
}

#[test]
fn dash_is_clamped_to_world() {
    let world = World::default();
    let mut p = make_player();
    p.body.pos = Vec2::new(2350.0, 800.0);
    p.mana = DASH_COST;
    assert!(p.use_dash(&world));
    assert_eq!(p.pos().x, 2380.0);
}

#[test]
fn burst_costs_mana_and_describes_area() {
    let mut p = make_player();
    p.mana = BURST_COST;
    let burst = p.use_burst().expect("burst");
    assert_eq!(burst.origin, p.pos());
    assert_eq!(burst.radius, BURST_RADIUS);
    assert_eq!(burst.damage, BURST_DAMAGE);
    assert_eq!(p.mana, 0);
}

// ── Upgrades ──────────────────────────────────────────────────────────────────

#[test]
fn damage_upgrade_cost_grows_per_level() {
    let mut p = make_player();
    p.mana = 25;
    assert_eq!(p.upgrade_cost(Stat::Damage), 10);
    assert!(p.upgrade(Stat::Damage));
    assert_eq!(p.bullet_damage, 12.0);
    assert_eq!(p.upgrade_cost(Stat::Damage), 15);
    assert!(p.upgrade(Stat::Damage));
    assert_eq!(p.bullet_damage, 17.0);
    assert_eq!(p.mana, 0);
    assert!(!p.upgrade(Stat::Damage));
    assert_eq!(p.level(Stat::Damage), 3);
}

#[test]
fn speed_upgrade_adds_bullet_speed() {
    let mut p = make_player();
    p.mana = 10;
    assert!(p.upgrade(Stat::BulletSpeed));
    assert_eq!(p.bullet_speed, 14.0);
    assert_eq!(p.upgrade_cost(Stat::BulletSpeed), 15);
}

#[test]
fn health_upgrade_raises_max_and_heals() {
    let mut p = make_player();
    p.take_damage(40.0);
    p.mana = 15;
    assert!(p.upgrade(Stat::MaxHealth));
    assert_eq!(p.health.max(), 70.0);
    assert_eq!(p.health.current(), 40.0);
    assert_eq!(p.upgrade_cost(Stat::MaxHealth), 22);
}

#[test]
fn failed_upgrade_changes_nothing() {
    let mut p = make_player();
    p.mana = 9;
    let before = p.clone();
    assert!(!p.upgrade(Stat::Damage));
    assert_eq!(p, before);
}
