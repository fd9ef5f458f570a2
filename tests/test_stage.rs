use rand::rngs::StdRng;
use rand::SeedableRng;

use skystrike::entities::{
    Bullet, BulletOwner, Direction, Enemy, EnemyKind, GameStatus, Vec2, BLASTER_ATK_MUL,
    PLAYER_PORT_LAYOUT,
};
use skystrike::progression::scale_for_level;
use skystrike::spawn::SpawnTable;
use skystrike::stage::Stage;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn empty_stage() -> Stage {
    Stage::new(SpawnTable::from_json(r#"{"rules": []}"#).expect("empty table"))
}

// ── Setup & clock ─────────────────────────────────────────────────────────────

#[test]
fn new_stage_starts_at_the_bottom_center() {
    let stage = empty_stage();
    assert_eq!(stage.player.pos, Vec2::new(200.0, 570.0));
    assert!(stage.enemies.is_empty());
    assert!(stage.bullets.is_empty());
    assert_eq!(stage.level, 0);
    assert_eq!(stage.score, 0);
    assert_eq!(stage.status, GameStatus::Playing);
}

#[test]
fn tick_advances_the_clock() {
    let mut stage = empty_stage();
    let mut rng = seeded_rng();
    stage.tick(17.0, &mut rng);
    assert_eq!(stage.last_time_stamp, 0.0);
    assert_eq!(stage.time_stamp, 17.0);
    stage.tick(17.0, &mut rng);
    assert_eq!(stage.last_time_stamp, 17.0);
    assert_eq!(stage.time_stamp, 34.0);
}

// ── Movement intents ──────────────────────────────────────────────────────────

#[test]
fn player_moves_by_speed_per_intent() {
    let mut stage = empty_stage();
    stage.player_move(Direction::Left);
    assert_eq!(stage.player.pos.x, 195.0);
    stage.player_move(Direction::Up);
    assert_eq!(stage.player.pos.y, 565.0);
}

#[test]
fn player_movement_is_rejected_at_the_edge() {
    let mut stage = empty_stage();
    stage.player.pos = Vec2::new(2.0, 570.0);
    stage.player_move(Direction::Left); // would land at -3
    assert_eq!(stage.player.pos.x, 2.0);

    stage.player.pos = Vec2::new(200.0, 597.0);
    stage.player_move(Direction::Down); // would land at 602
    assert_eq!(stage.player.pos.y, 597.0);
}

// ── Fire intents ──────────────────────────────────────────────────────────────

#[test]
fn player_fire_respects_cooldown() {
    let mut stage = empty_stage();
    let mut rng = seeded_rng();

    stage.player_fire(); // t=0 equals last_fired: still cooling down
    assert!(stage.bullets.is_empty());

    for _ in 0..16 {
        stage.tick(17.0, &mut rng); // 272ms > 250ms interval
    }
    stage.player_fire();
    assert_eq!(stage.bullets.len(), 1);
    let b = stage.bullets.get(0).unwrap();
    assert_eq!(b.owner, BulletOwner::Player);
    assert_eq!(b.atk, 20.0);
    assert_eq!(b.vel, Vec2::new(0.0, -10.0));
    assert_eq!(b.pos, Vec2::new(200.0, 555.0)); // nose fire port

    stage.player_fire(); // same timestamp: blocked
    assert_eq!(stage.bullets.len(), 1);
}

#[test]
fn blaster_upgrade_triples_bullet_attack() {
    let mut stage = empty_stage();
    let mut rng = seeded_rng();
    stage.player.has_blaster = true;
    for _ in 0..16 {
        stage.tick(17.0, &mut rng);
    }
    stage.player_fire();
    assert_eq!(stage.bullets.get(0).unwrap().atk, 20.0 * BLASTER_ATK_MUL);
}

#[test]
fn every_fire_port_emits_a_bullet() {
    let mut stage = empty_stage();
    let mut rng = seeded_rng();
    stage.player.fire_ports = PLAYER_PORT_LAYOUT.to_vec();
    for _ in 0..16 {
        stage.tick(17.0, &mut rng);
    }
    stage.player_fire();
    assert_eq!(stage.bullets.len(), 3);
}

// ── Boss fight end-to-end ─────────────────────────────────────────────────────

#[test]
fn boss_dies_on_the_fiftieth_hit_and_rewinds_the_clock() {
    let mut stage = empty_stage();
    let mut rng = seeded_rng();

    let mut boss = Enemy::new(EnemyKind::RingBurst, Vec2::new(200.0, 300.0));
    scale_for_level(0).apply(&mut boss);
    assert_eq!(boss.hp, 250.0);
    stage.enemies.push(boss);
    stage.boss_anchor = Some(5000.0);
    stage.time_stamp = 60_000.0;
    stage.last_time_stamp = 60_000.0;

    // 49 hits of 5 (atk 8 against defen 3): the boss hangs on
    for _ in 0..49 {
        let target = stage.enemies.get(0).expect("boss alive").pos;
        stage
            .bullets
            .push(Bullet::new(BulletOwner::Player, target, Vec2::ZERO, 8.0));
        stage.tick(17.0, &mut rng);
    }
    let boss = stage.boss().expect("boss survives 49 hits");
    assert_eq!(boss.hp, 250.0 - 49.0 * 5.0);

    // Hit 50 kills it: level up and clock rewind to the anchor
    let target = stage.enemies.get(0).unwrap().pos;
    stage
        .bullets
        .push(Bullet::new(BulletOwner::Player, target, Vec2::ZERO, 8.0));
    stage.tick(17.0, &mut rng);

    assert!(stage.boss().is_none());
    assert_eq!(stage.level, 1);
    assert_eq!(stage.time_stamp, 5000.0);
    assert_eq!(stage.player.last_fired, 5000.0);
    assert_eq!(stage.boss_anchor, None);
}

#[test]
fn periodic_spawning_pauses_for_the_boss_and_resumes_after() {
    let table = SpawnTable::from_json(
        r#"{"rules": [{
            "variant": "basic",
            "trigger": {"mode": "periodic", "mu": 1000.0, "std": 0.0},
            "placement": {"mode": "random-top"}
        }]}"#,
    )
    .expect("table");
    let mut stage = Stage::new(table);
    let mut rng = seeded_rng();

    let mut boss = Enemy::new(EnemyKind::RingBurst, Vec2::new(200.0, 300.0));
    scale_for_level(0).apply(&mut boss);
    stage.enemies.push(boss);
    stage.boss_anchor = Some(0.0);

    // Over a full second of boss fight, no ordinary enemy may spawn
    for _ in 0..60 {
        stage.tick(17.0, &mut rng);
    }
    assert_eq!(stage.enemies.len(), 1);

    // Kill the boss; the clock rewinds to t=0
    let target = stage.enemies.get(0).unwrap().pos;
    stage
        .bullets
        .push(Bullet::new(BulletOwner::Player, target, Vec2::ZERO, 1000.0));
    stage.tick(17.0, &mut rng);
    assert!(stage.boss().is_none());
    assert_eq!(stage.time_stamp, 0.0);

    // Spawning resumes on the next period edge
    for _ in 0..65 {
        stage.tick(17.0, &mut rng);
    }
    assert!(stage
        .enemies
        .iter()
        .any(|e| e.kind == EnemyKind::Basic));
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn lethal_hit_flips_the_terminal_flag_and_stops_the_clock() {
    let mut stage = empty_stage();
    let mut rng = seeded_rng();
    stage.player.hp = 1.0;
    stage.bullets.push(Bullet::new(
        BulletOwner::Enemy,
        stage.player.pos,
        Vec2::ZERO,
        5.0,
    ));

    stage.tick(17.0, &mut rng);
    assert_eq!(stage.status, GameStatus::GameOver);
    assert_eq!(stage.player.hp, 0.0);

    // A finished game refuses to tick
    let frozen = stage.time_stamp;
    stage.tick(17.0, &mut rng);
    assert_eq!(stage.time_stamp, frozen);
}
