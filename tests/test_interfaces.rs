use std::collections::HashSet;

use arena_shooter::compute::*;
use arena_shooter::entities::*;
use arena_shooter::interfaces::*;
use arena_shooter::player::Stat;
use arena_shooter::tuning::Difficulty;

use glam::Vec2;

// ── Stubs ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct StubInput {
    down: HashSet<Action>,
    cursor: Option<Vec2>,
}

impl StubInput {
    fn with(actions: &[Action]) -> Self {
        Self {
            down: actions.iter().copied().collect(),
            cursor: None,
        }
    }
}

impl InputSource for StubInput {
    fn is_down(&self, action: Action) -> bool {
        self.down.contains(&action)
    }

    fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<(&'static str, Vec2)>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, sprite: Sprite<'_>, camera_offset: Vec2) {
        let tag = match sprite {
            Sprite::Player(_) => "player",
            Sprite::Enemy(_) => "enemy",
            Sprite::Projectile(_) => "projectile",
            Sprite::Mana(_) => "mana",
            Sprite::Particle(_) => "particle",
        };
        self.calls.push((tag, camera_offset));
    }
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[test]
fn camera_snaps_to_centre_target() {
    let world = World::default();
    let mut camera = Camera::new(Vec2::new(800.0, 600.0));
    camera.snap_to(world.center(), &world);
    assert_eq!(camera.offset, Vec2::new(800.0, 500.0));
}

#[test]
fn camera_eases_toward_target() {
    let world = World::default();
    let mut camera = Camera::new(Vec2::new(800.0, 600.0));
    camera.follow(world.center(), &world);
    assert!((camera.offset - Vec2::new(80.0, 50.0)).length() < 1e-3);
}

#[test]
fn camera_stays_inside_world() {
    let world = World::default();
    let mut camera = Camera::new(Vec2::new(800.0, 600.0));
    camera.snap_to(Vec2::ZERO, &world);
    assert_eq!(camera.offset, Vec2::ZERO);
    camera.snap_to(Vec2::new(2400.0, 1600.0), &world);
    assert_eq!(camera.offset, Vec2::new(1600.0, 1000.0));

    let mut huge = Camera::new(Vec2::new(5000.0, 5000.0));
    huge.snap_to(world.center(), &world);
    assert_eq!(huge.offset, Vec2::ZERO);
}

#[test]
fn screen_world_round_trip() {
    let mut camera = Camera::new(Vec2::new(800.0, 600.0));
    camera.offset = Vec2::new(100.0, 40.0);
    let screen = Vec2::new(10.0, 20.0);
    assert_eq!(camera.to_world(screen), Vec2::new(110.0, 60.0));
    assert_eq!(camera.to_screen(camera.to_world(screen)), screen);
}

// ── Input snapshot ────────────────────────────────────────────────────────────

#[test]
fn capture_reads_every_action() {
    let mut input = StubInput::with(&[Action::Up, Action::Left, Action::Fire, Action::Shield]);
    input.cursor = Some(Vec2::new(100.0, 100.0));
    let mut camera = Camera::new(Vec2::new(800.0, 600.0));
    camera.offset = Vec2::new(50.0, 50.0);

    let frame = FrameInput::capture(&input, &camera);
    assert!(frame.up && frame.left && frame.fire && frame.shield);
    assert!(!frame.down && !frame.right && !frame.dash && !frame.burst);
    assert_eq!(frame.aim, Some(Vec2::new(150.0, 150.0)));
    assert_eq!(frame.axis(), Vec2::new(-1.0, -1.0));
    assert_eq!(frame.upgrade, None);
}

#[test]
fn capture_maps_upgrade_keys() {
    let camera = Camera::new(Vec2::new(800.0, 600.0));
    let frame = FrameInput::capture(&StubInput::with(&[Action::UpgradeHealth]), &camera);
    assert_eq!(frame.upgrade, Some(Stat::MaxHealth));
    let frame = FrameInput::capture(&StubInput::with(&[Action::UpgradeSpeed]), &camera);
    assert_eq!(frame.upgrade, Some(Stat::BulletSpeed));
}

#[test]
fn opposite_keys_cancel() {
    let frame = FrameInput { left: true, right: true, down: true, ..FrameInput::default() };
    assert_eq!(frame.axis(), Vec2::new(0.0, 1.0));
}

#[test]
fn no_cursor_means_no_aim() {
    let camera = Camera::new(Vec2::new(800.0, 600.0));
    let frame = FrameInput::capture(&StubInput::default(), &camera);
    assert_eq!(frame.aim, None);
    assert_eq!(frame, FrameInput::default());
}

// ── render_frame ──────────────────────────────────────────────────────────────

#[test]
fn render_frame_draws_live_entities_back_to_front() {
    let mut s = init_state(Difficulty::Normal);
    let mut rng = rand::rngs::mock::StepRng::new(0, 1);
    let id = s.allocate_id();
    let profile = *s.waves.profile();
    s.enemies.push(arena_shooter::enemies::Enemy::spawn(
        id,
        arena_shooter::tuning::EnemyKind::Shooter,
        Vec2::new(300.0, 300.0),
        &profile,
        &mut rng,
    ));
    s.projectiles.push(Projectile::new(Vec2::new(400.0, 400.0), 0.0, 1.0, 1.0, Owner::Player));
    let mut spent = Projectile::new(Vec2::new(410.0, 400.0), 0.0, 1.0, 1.0, Owner::Enemy);
    spent.spent = true;
    s.projectiles.push(spent);
    s.mana_drops.push(ManaDrop::new(Vec2::new(500.0, 500.0), 4));
    s.particles
        .extend(spray_particles(Vec2::new(600.0, 600.0), Rgb(1, 2, 3), 1, &mut rng));

    let mut camera = Camera::new(Vec2::new(800.0, 600.0));
    camera.offset = Vec2::new(80.0, 50.0);
    let mut renderer = RecordingRenderer::default();
    render_frame(&s, &camera, &mut renderer);

    let tags: Vec<_> = renderer.calls.iter().map(|(tag, _)| *tag).collect();
    assert_eq!(tags, ["mana", "particle", "projectile", "enemy", "player"]);
    assert!(renderer.calls.iter().all(|(_, offset)| *offset == camera.offset));
}
