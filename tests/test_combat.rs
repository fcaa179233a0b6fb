use arena_shooter::combat::*;

// ── Health ────────────────────────────────────────────────────────────────────

#[test]
fn health_starts_full() {
    let h = Health::new(30.0);
    assert_eq!(h.current(), 30.0);
    assert_eq!(h.max(), 30.0);
    assert_eq!(h.fraction(), 1.0);
}

#[test]
fn damage_never_increases_health() {
    let mut h = Health::new(30.0);
    let mut last = h.current();
    for amount in [7.0, 0.0, -5.0, 3.5, 100.0, 1.0] {
        h.apply_damage(amount);
        assert!(h.current() <= last);
        assert!(h.current() >= 0.0 && h.current() <= h.max());
        last = h.current();
    }
    assert!(h.is_depleted());
}

#[test]
fn killing_blow_reported_once() {
    let mut h = Health::new(10.0);
    assert!(!h.apply_damage(4.0));
    assert!(h.apply_damage(20.0));
    assert_eq!(h.current(), 0.0);
    assert!(!h.apply_damage(5.0));
    assert_eq!(h.current(), 0.0);
}

#[test]
fn heal_is_clamped_to_max() {
    let mut h = Health::new(50.0);
    h.apply_damage(10.0);
    h.heal(30.0);
    assert_eq!(h.current(), 50.0);
}

#[test]
fn raising_max_keeps_current() {
    let mut h = Health::new(50.0);
    h.apply_damage(40.0);
    h.raise_max(20.0);
    assert_eq!(h.max(), 70.0);
    assert_eq!(h.current(), 10.0);
}

// ── Cooldown ──────────────────────────────────────────────────────────────────

#[test]
fn ready_cooldown_fires_immediately() {
    let mut cd = Cooldown::ready(2.0);
    assert!(cd.is_ready());
    assert!(cd.try_trigger());
    assert!(!cd.try_trigger());
    assert_eq!(cd.remaining(), 2.0);
}

#[test]
fn charged_cooldown_waits_one_delay() {
    let mut cd = Cooldown::charged(1.0);
    assert!(!cd.is_ready());
    cd.tick(0.5);
    assert!(!cd.is_ready());
    cd.tick(0.5);
    assert!(cd.is_ready());
}

#[test]
fn tick_floors_at_zero() {
    let mut cd = Cooldown::charged(1.0);
    cd.tick(5.0);
    assert_eq!(cd.remaining(), 0.0);
    assert_eq!(cd.delay(), 1.0);
}
