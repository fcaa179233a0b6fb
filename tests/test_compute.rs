use arena_shooter::combat::Health;
use arena_shooter::compute::*;
use arena_shooter::enemies::Enemy;
use arena_shooter::entities::*;
use arena_shooter::player::Stat;
use arena_shooter::tuning::*;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;

fn make_state() -> GameState {
    init_state(Difficulty::Normal)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> FrameInput {
    FrameInput::default()
}

fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
    let id = state.allocate_id();
    let profile = *state.waves.profile();
    state
        .enemies
        .push(Enemy::spawn(id, kind, pos, &profile, &mut seeded_rng()));
}

/// Start the next wave and report every quota enemy dead.
fn clear_wave(state: &mut GameState) {
    state.waves.start_wave();
    for _ in 0..state.waves.enemies_remaining() {
        state.waves.enemy_killed();
    }
}

fn in_bounds(world: &World, pos: Vec2, radius: f32) -> bool {
    pos.x >= radius && pos.x <= world.width - radius && pos.y >= radius && pos.y <= world.height - radius
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_centres_player() {
    let s = make_state();
    assert_eq!(s.player.pos(), s.world.center());
    assert_eq!(s.player.health.current(), 50.0);
    assert_eq!(s.difficulty, Difficulty::Normal);
}

#[test]
fn init_state_empty_arena_with_countdown() {
    let s = make_state();
    assert!(s.enemies.is_empty());
    assert!(s.projectiles.is_empty());
    assert!(s.mana_drops.is_empty());
    assert_eq!(s.phase, Phase::Intermission { remaining: WAVE_INTERMISSION_SECS });
    assert_eq!(s.countdown(), Some(WAVE_INTERMISSION_SECS));
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.waves.current_wave(), 0);
    assert_eq!(s.stats, RunStats::default());
}

// ── tick basics ───────────────────────────────────────────────────────────────

#[test]
fn tick_does_not_mutate_original() {
    let s = make_state();
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s.frame, 0);
    assert_eq!(s2.frame, 1);
    assert!((s2.elapsed - DT).abs() < 1e-6);
}

#[test]
fn intermission_counts_down() {
    let s = make_state();
    let s2 = tick(&s, &idle(), 1.0, &mut seeded_rng());
    match s2.phase {
        Phase::Intermission { remaining } => assert!((remaining - 9.0).abs() < 1e-4),
        Phase::Wave => panic!("wave started early"),
    }
    assert!(s2.enemies.is_empty());
}

#[test]
fn same_inputs_same_outcome() {
    let mut s = make_state();
    s.phase = Phase::Intermission { remaining: 0.0 };
    let input = FrameInput { fire: true, right: true, ..idle() };
    let a = tick(&s, &input, DT, &mut seeded_rng());
    let b = tick(&s, &input, DT, &mut seeded_rng());
    assert_eq!(a, b);
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn first_wave_spawns_away_from_player() {
    let mut s = make_state();
    s.phase = Phase::Intermission { remaining: 0.01 };
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());

    assert_eq!(s2.phase, Phase::Wave);
    assert_eq!(s2.waves.current_wave(), 1);
    assert_eq!(s2.enemies.len(), 5);
    assert_eq!(s2.stats.spawn_fallbacks, 0);
    for e in &s2.enemies {
        assert_eq!(e.kind, EnemyKind::Shooter);
        assert!(e.pos().distance(s2.player.pos()) >= SPAWN_MIN_PLAYER_DISTANCE);
    }
    let mut ids: Vec<_> = s2.enemies.iter().map(|e| e.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn cleared_wave_starts_intermission() {
    let mut s = make_state();
    clear_wave(&mut s);
    s.phase = Phase::Wave;
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s2.phase, Phase::Intermission { remaining: WAVE_INTERMISSION_SECS });
    assert_eq!(s2.stats.waves_cleared, 1);
    assert_eq!(s2.status, GameStatus::Playing);
}

#[test]
fn wave_not_cleared_while_enemies_live() {
    let mut s = make_state();
    clear_wave(&mut s);
    s.phase = Phase::Wave;
    add_enemy(&mut s, EnemyKind::Shooter, Vec2::new(200.0, 200.0));
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s2.phase, Phase::Wave);
    assert_eq!(s2.stats.waves_cleared, 0);
}

#[test]
fn clearing_last_wave_wins() {
    let mut s = make_state();
    for _ in 0..15 {
        clear_wave(&mut s);
    }
    s.phase = Phase::Wave;
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Won);

    // Finished runs are frozen.
    let s3 = tick(&s2, &idle(), DT, &mut seeded_rng());
    assert_eq!(s3, s2);
}

#[test]
fn clearing_second_to_last_wave_does_not_win() {
    let mut s = make_state();
    for _ in 0..14 {
        clear_wave(&mut s);
    }
    s.phase = Phase::Wave;
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
}

#[test]
fn death_loses_the_run() {
    let mut s = make_state();
    s.player.health.apply_damage(1000.0);
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Lost);
}

#[test]
fn death_beats_victory_on_the_same_tick() {
    let mut s = make_state();
    for _ in 0..15 {
        clear_wave(&mut s);
    }
    s.phase = Phase::Wave;
    s.player.health.apply_damage(1000.0);
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Lost);
}

// ── Player input ──────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_one_bullet_per_delay() {
    let s = make_state();
    let input = FrameInput { fire: true, ..idle() };
    let mut rng = seeded_rng();
    let s2 = tick(&s, &input, DT, &mut rng);
    assert_eq!(s2.projectiles.len(), 1);
    assert_eq!(s2.projectiles[0].owner, Owner::Player);
    let s3 = tick(&s2, &input, DT, &mut rng);
    assert_eq!(s3.projectiles.len(), 1);
}

#[test]
fn movement_input_accelerates_player() {
    let s = make_state();
    let input = FrameInput { right: true, up: true, ..idle() };
    let s2 = tick(&s, &input, DT, &mut seeded_rng());
    assert!(s2.player.pos().x > s.player.pos().x);
    assert!(s2.player.pos().y < s.player.pos().y);
}

#[test]
fn upgrade_input_spends_mana() {
    let mut s = make_state();
    s.player.mana = 10;
    let input = FrameInput { upgrade: Some(Stat::Damage), ..idle() };
    let s2 = tick(&s, &input, DT, &mut seeded_rng());
    assert_eq!(s2.player.level(Stat::Damage), 2);
    assert_eq!(s2.player.mana, 0);
}

#[test]
fn burst_kills_nearby_enemies_through_death_path() {
    let mut s = make_state();
    let pos = s.player.pos() + Vec2::new(100.0, 0.0);
    add_enemy(&mut s, EnemyKind::Shooter, pos);
    add_enemy(&mut s, EnemyKind::Shooter, Vec2::new(200.0, 200.0));
    s.enemies[0].health = Health::new(10.0);
    s.player.mana = BURST_COST;

    let input = FrameInput { burst: true, ..idle() };
    let s2 = tick(&s, &input, DT, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.stats.kills, 1);
    assert_eq!(s2.mana_drops.len(), 1);
    assert_eq!(s2.particles.len(), DEATH_PARTICLES + BURST_PARTICLES);
    assert_eq!(s2.player.mana, 0);
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[test]
fn tank_summons_minions() {
    let mut s = make_state();
    add_enemy(&mut s, EnemyKind::Tank, Vec2::new(300.0, 300.0));
    s.enemies[0].ability.tick(10.0);
    let s2 = tick(&s, &idle(), DT, &mut seeded_rng());
    assert_eq!(s2.enemies.len(), 3);
    let minions: Vec<_> = s2.enemies.iter().filter(|e| e.minion).collect();
    assert_eq!(minions.len(), 2);
    for m in minions {
        assert_eq!(m.kind, EnemyKind::Shooter);
        assert!(m.pos().distance(s2.enemies[0].pos()) < 60.0);
    }
}

#[test]
fn entities_stay_in_bounds_through_a_fight() {
    let mut s = make_state();
    s.phase = Phase::Intermission { remaining: 0.0 };
    let mut rng = seeded_rng();
    let input = FrameInput {
        fire: true,
        left: true,
        up: true,
        aim: Some(Vec2::ZERO),
        ..idle()
    };
    for _ in 0..900 {
        s = tick(&s, &input, DT, &mut rng);
        assert!(in_bounds(&s.world, s.player.pos(), s.player.body.radius));
        for e in &s.enemies {
            assert!(in_bounds(&s.world, e.pos(), e.body.radius));
        }
        for p in &s.projectiles {
            assert!(s.world.contains(p.pos));
        }
        for d in &s.mana_drops {
            assert!(in_bounds(&s.world, d.pos, d.radius));
        }
    }
}
