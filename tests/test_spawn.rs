use rand::rngs::StdRng;
use rand::SeedableRng;

use skystrike::entities::{Enemy, EnemyKind, ItemKind, Item, Vec2, PLAYFIELD};
use skystrike::spawn::{cycle_edge, ItemTable, Scheduler, SpawnTable};
use skystrike::store::Store;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn scheduler(json: &str) -> Scheduler {
    Scheduler::new(SpawnTable::from_json(json).expect("test table must parse"))
}

// ── Table loading ─────────────────────────────────────────────────────────────

#[test]
fn malformed_table_is_rejected() {
    assert!(SpawnTable::from_json("{ not json").is_err());
    assert!(SpawnTable::from_json(r#"{"rules": [{"variant": "basic"}]}"#).is_err());
}

#[test]
fn non_positive_mu_is_rejected() {
    let json = r#"{"rules": [{
        "variant": "basic",
        "trigger": {"mode": "periodic", "mu": 0.0, "std": 1.0},
        "placement": {"mode": "random-top"}
    }]}"#;
    assert!(SpawnTable::from_json(json).is_err());
}

#[test]
fn negative_std_is_rejected() {
    let json = r#"{"rules": [{
        "variant": "basic",
        "trigger": {"mode": "periodic", "mu": 100.0, "std": -1.0},
        "placement": {"mode": "random-top"}
    }]}"#;
    assert!(SpawnTable::from_json(json).is_err());
}

// ── Edge detection ────────────────────────────────────────────────────────────

#[test]
fn cycle_edge_fires_on_wraparound() {
    assert!(cycle_edge(986.0, 1003.0, 1000.0)); // 986 > 3
    assert!(!cycle_edge(900.0, 917.0, 1000.0)); // mid-cycle
}

#[test]
fn cycle_edge_never_fires_without_time_advancing() {
    // A paused tick keeps last == now and must not fire, even at a wrap point
    assert!(!cycle_edge(1000.0, 1000.0, 1000.0));
    assert!(!cycle_edge(1003.0, 986.0, 1000.0)); // time going backwards
}

// ── Periodic rules (scenario: mu=1000, std=0) ─────────────────────────────────

#[test]
fn degenerate_periodic_rule_fires_once_per_period() {
    let json = r#"{"rules": [{
        "variant": "basic",
        "trigger": {"mode": "periodic", "mu": 1000.0, "std": 0.0},
        "placement": {"mode": "random-top"}
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    let mut rng = seeded_rng();

    let mut t = 0.0_f32;
    while t < 10_200.0 {
        let before = enemies.len();
        sched.run(&mut enemies, PLAYFIELD, 0, t, t + 17.0, &mut rng);
        // never twice in one tick
        assert!(enemies.len() - before <= 1);
        t += 17.0;
    }
    // exactly one spawn per 1000ms of advancing timestamp
    assert_eq!(enemies.len(), 10);
}

#[test]
fn periodic_rule_skips_paused_tick() {
    let json = r#"{"rules": [{
        "variant": "basic",
        "trigger": {"mode": "periodic", "mu": 1000.0, "std": 0.0},
        "placement": {"mode": "random-top"}
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    let mut rng = seeded_rng();
    // Timestamp did not advance: nothing may fire
    sched.run(&mut enemies, PLAYFIELD, 0, 1000.0, 1000.0, &mut rng);
    assert!(enemies.is_empty());
}

#[test]
fn first_at_gates_eligibility() {
    let json = r#"{"rules": [{
        "variant": "basic",
        "trigger": {"mode": "periodic", "mu": 1000.0, "std": 0.0},
        "placement": {"mode": "random-top"},
        "first_at": 5000.0
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    let mut rng = seeded_rng();
    let mut t = 0.0_f32;
    while t < 4000.0 {
        sched.run(&mut enemies, PLAYFIELD, 0, t, t + 17.0, &mut rng);
        t += 17.0;
    }
    assert!(enemies.is_empty());
}

// ── Timestamp rules ───────────────────────────────────────────────────────────

#[test]
fn timestamp_rule_fires_exactly_once() {
    let json = r#"{"rules": [{
        "variant": "tracker",
        "trigger": {"mode": "at", "times": [500.0]},
        "placement": {"mode": "fixed", "x": 120.0, "y": 40.0}
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    let mut rng = seeded_rng();
    let mut t = 0.0_f32;
    while t < 2000.0 {
        sched.run(&mut enemies, PLAYFIELD, 0, t, t + 17.0, &mut rng);
        t += 17.0;
    }
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies.get(0).map(|e| e.kind), Some(EnemyKind::Tracker));
    assert_eq!(enemies.get(0).map(|e| e.pos), Some(Vec2::new(120.0, 40.0)));
}

#[test]
fn unknown_variant_is_skipped_not_fatal() {
    let json = r#"{"rules": [{
        "variant": "flying-saucer",
        "trigger": {"mode": "at", "times": [500.0]},
        "placement": {"mode": "random-top"}
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    let mut rng = seeded_rng();
    sched.run(&mut enemies, PLAYFIELD, 0, 490.0, 510.0, &mut rng);
    assert!(enemies.is_empty());
}

// ── Boss gate ─────────────────────────────────────────────────────────────────

#[test]
fn periodic_spawning_suppressed_while_boss_alive() {
    let json = r#"{"rules": [{
        "variant": "basic",
        "trigger": {"mode": "periodic", "mu": 100.0, "std": 0.0},
        "placement": {"mode": "random-top"}
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    enemies.push(Enemy::new(EnemyKind::RingBurst, Vec2::new(200.0, 80.0)));
    let mut rng = seeded_rng();

    let mut t = 0.0_f32;
    while t < 1000.0 {
        sched.run(&mut enemies, PLAYFIELD, 0, t, t + 17.0, &mut rng);
        t += 17.0;
    }
    assert_eq!(enemies.len(), 1); // still only the boss

    // Boss gone: spawning resumes immediately
    enemies.mark_remove(0);
    enemies.commit();
    while t < 2000.0 {
        sched.run(&mut enemies, PLAYFIELD, 0, t, t + 17.0, &mut rng);
        t += 17.0;
    }
    assert!(!enemies.is_empty());
}

#[test]
fn boss_spawn_records_anchor_and_scales() {
    let json = r#"{"rules": [{
        "variant": "ring-burst",
        "trigger": {"mode": "at", "times": [100.0]},
        "placement": {"mode": "fixed", "x": 200.0, "y": 80.0}
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    let mut rng = seeded_rng();
    let anchor = sched.run(&mut enemies, PLAYFIELD, 1, 90.0, 107.0, &mut rng);
    assert_eq!(anchor, Some(107.0));
    let boss = enemies.get(0).expect("boss spawned");
    assert!(boss.kind.is_boss());
    // Level-1 scaling applied at spawn, max_hp captured afterwards
    let expected_hp = 250.0 * 1.67;
    assert!((boss.hp - expected_hp).abs() < 1e-2);
    assert_eq!(boss.max_hp, Some(boss.hp));
}

#[test]
fn second_boss_is_suppressed() {
    let json = r#"{"rules": [{
        "variant": "capital-ship",
        "trigger": {"mode": "at", "times": [100.0]},
        "placement": {"mode": "fixed", "x": 200.0, "y": 70.0}
    }]}"#;
    let mut sched = scheduler(json);
    let mut enemies: Store<Enemy> = Store::new();
    enemies.push(Enemy::new(EnemyKind::RingBurst, Vec2::new(200.0, 80.0)));
    let mut rng = seeded_rng();
    let anchor = sched.run(&mut enemies, PLAYFIELD, 0, 90.0, 107.0, &mut rng);
    assert_eq!(anchor, None);
    assert_eq!(enemies.len(), 1);
}

// ── Loot table ────────────────────────────────────────────────────────────────

#[test]
fn flattened_table_density_matches_weights() {
    let table = ItemTable::from_weights(&[(ItemKind::Heal, 3), (ItemKind::Attack, 1)]);
    let flat = table.flattened();
    assert_eq!(flat.len(), 4);
    assert_eq!(flat.iter().filter(|&&k| k == ItemKind::Heal).count(), 3);
    assert_eq!(flat.iter().filter(|&&k| k == ItemKind::Attack).count(), 1);
}

#[test]
fn try_spawn_respects_probability_extremes() {
    let table = ItemTable::standard();
    let mut items: Store<Item> = Store::new();
    let mut rng = seeded_rng();

    for _ in 0..100 {
        table.try_spawn(0.0, Vec2::ZERO, &mut items, &mut rng);
    }
    assert!(items.is_empty());

    for _ in 0..100 {
        table.try_spawn(1.0, Vec2::ZERO, &mut items, &mut rng);
    }
    assert_eq!(items.len(), 100);
}

#[test]
fn empty_table_spawns_nothing() {
    let table = ItemTable::from_weights(&[]);
    let mut items: Store<Item> = Store::new();
    let mut rng = seeded_rng();
    table.try_spawn(1.0, Vec2::ZERO, &mut items, &mut rng);
    assert!(items.is_empty());
}
