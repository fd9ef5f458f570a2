//! Enemy movement and per-variant AI, plus enemy fire patterns.
//!
//! Every enemy advances by its velocity each tick, bouncing off the
//! horizontal playfield bounds.  Variant behavior is layered on top through
//! an exhaustive match per kind, so a new variant cannot be silently left
//! without movement or fire logic.

use std::f32::consts::FRAC_PI_2;

use rand::Rng;

use crate::entities::{
    Bounds, Bullet, BulletOwner, Enemy, EnemyKind, Vec2, BEAM_ATK_MUL, BEAM_PHASE_MS,
    ESCORT_CYCLE_MS,
};
use crate::progression::scale_for_level;
use crate::spawn::cycle_edge;
use crate::store::Store;

/// Step size of the tracker's pursuit, per tick.
pub const TRACKER_STEP: f32 = 2.2;

const CHARGER_CYCLE_MS: f32 = 10_000.0;
const VADER_CYCLE_MS: f32 = 8_000.0;

/// Angular speed of the windmill's rotating fire pattern.
const WINDMILL_SPIN_RAD_PER_SEC: f32 = 0.9;

const ENEMY_BULLET_SPEED: f32 = 5.0;
const BEAM_BULLET_SPEED: f32 = 3.5;

/// The ring-burst's 8-direction bullet fan (speed 5, diagonals 5/√2).
const RING_VELOCITIES: [Vec2; 8] = [
    Vec2 { x: 5.0, y: 0.0 },
    Vec2 { x: 3.5355, y: 3.5355 },
    Vec2 { x: 0.0, y: 5.0 },
    Vec2 { x: -3.5355, y: 3.5355 },
    Vec2 { x: -5.0, y: 0.0 },
    Vec2 { x: -3.5355, y: -3.5355 },
    Vec2 { x: 0.0, y: -5.0 },
    Vec2 { x: 3.5355, y: -3.5355 },
];

/// The triple-shooter's 3-way fan.
const TRIPLE_FAN: [Vec2; 3] = [
    Vec2 { x: 0.0, y: 5.0 },
    Vec2 { x: -1.0, y: 5.0 },
    Vec2 { x: 1.0, y: 5.0 },
];

// ── Movement ──────────────────────────────────────────────────────────────────

/// Advance every enemy one tick: timed-mode velocity switching, pursuit,
/// escort sub-spawning, then the generic bounce-and-move.  Sub-spawned
/// escorts are staged and only join the collection after the pass.
pub fn update_enemies(
    enemies: &mut Store<Enemy>,
    player_pos: Vec2,
    bounds: Bounds,
    last: f32,
    now: f32,
    level: u32,
    rng: &mut impl Rng,
) {
    for i in 0..enemies.len() {
        let mut escort_at: Option<Vec2> = None;

        if let Some(e) = enemies.get_mut(i) {
            match e.kind {
                EnemyKind::Tracker => {
                    pursue(e, player_pos);
                    continue; // pursuit replaces the generic move
                }
                EnemyKind::Charger => {
                    e.vel = charger_velocity(now % CHARGER_CYCLE_MS, e.vel.x);
                }
                EnemyKind::VaderFighter => {
                    e.vel = vader_velocity(now % VADER_CYCLE_MS, e.vel.x);
                }
                EnemyKind::CapitalShip | EnemyKind::FinalBoss => {
                    if cycle_edge(last, now, ESCORT_CYCLE_MS) {
                        escort_at = Some(e.pos);
                    }
                    if let Some(beam) = &mut e.beam {
                        let phase = (now / BEAM_PHASE_MS) as u64;
                        if phase != beam.phase {
                            beam.phase = phase;
                            beam.origin_x = rng.gen::<f32>() * bounds.w;
                        }
                    }
                }
                _ => {}
            }

            // Bounce off the horizontal bounds before moving, then move.
            let next_x = e.pos.x + e.vel.x;
            if next_x < 0.0 || next_x >= bounds.w {
                e.vel.x = -e.vel.x;
            }
            e.pos.x += e.vel.x;
            e.pos.y += e.vel.y;
        }

        if let Some(pos) = escort_at {
            let mut escort = Enemy::new(EnemyKind::EscortFighter, pos);
            scale_for_level(level).apply(&mut escort);
            enemies.stage(escort);
        }
    }
    enemies.commit();
}

/// Fixed-step pursuit along the normalized vector to the player.  Standing
/// exactly on the player means no movement this tick, never a NaN.
fn pursue(e: &mut Enemy, target: Vec2) {
    let dx = target.x - e.pos.x;
    let dy = target.y - e.pos.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > 0.0 {
        e.pos.x += dx / dist * TRACKER_STEP;
        e.pos.y += dy / dist * TRACKER_STEP;
    }
}

/// Charger cycle: 6s sideways patrol, 1.5s dive, then climb back up.
fn charger_velocity(t: f32, vx: f32) -> Vec2 {
    if t < 6000.0 {
        let vx = if vx == 0.0 { 2.0 } else { keep_sign(vx, 2.0) };
        Vec2::new(vx, 0.6)
    } else if t < 7500.0 {
        Vec2::new(0.0, 7.0)
    } else {
        Vec2::new(0.0, -1.5)
    }
}

/// Vader cycle: 3s wide strafe, 2s dive, 3s slow drift.
fn vader_velocity(t: f32, vx: f32) -> Vec2 {
    if t < 3000.0 {
        let vx = if vx == 0.0 { 3.0 } else { keep_sign(vx, 3.0) };
        Vec2::new(vx, 0.5)
    } else if t < 5000.0 {
        Vec2::new(0.0, 4.0)
    } else {
        let vx = if vx == 0.0 { 1.0 } else { keep_sign(vx, 1.0) };
        Vec2::new(vx, 0.3)
    }
}

fn keep_sign(current: f32, magnitude: f32) -> f32 {
    if current < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// The windmill's 4 orthogonal bullet velocities, rotating with time.
pub fn windmill_rays(now_ms: f32) -> [Vec2; 4] {
    let base = now_ms / 1000.0 * WINDMILL_SPIN_RAD_PER_SEC;
    let mut rays = [Vec2::ZERO; 4];
    for (k, ray) in rays.iter_mut().enumerate() {
        let theta = base + k as f32 * FRAC_PI_2;
        *ray = Vec2::new(
            ENEMY_BULLET_SPEED * theta.cos(),
            ENEMY_BULLET_SPEED * theta.sin(),
        );
    }
    rays
}

// ── Fire ──────────────────────────────────────────────────────────────────────

/// Fire every enemy whose interval has elapsed, one volley per fire port.
/// The final boss's beam channel runs independently of its blaster.
pub fn enemy_fire(enemies: &mut Store<Enemy>, bullets: &mut Store<Bullet>, now: f32) {
    for e in enemies.iter_mut() {
        if now - e.last_fired >= e.fire_interval {
            for port in &e.fire_ports {
                let origin = Vec2::new(e.pos.x + port.x, e.pos.y + port.y);
                match e.kind {
                    EnemyKind::TripleShooter => {
                        for vel in TRIPLE_FAN {
                            bullets.push(Bullet::new(BulletOwner::Enemy, origin, vel, e.atk));
                        }
                    }
                    EnemyKind::RingBurst => {
                        for vel in RING_VELOCITIES {
                            bullets.push(Bullet::new(BulletOwner::Enemy, origin, vel, e.atk));
                        }
                    }
                    EnemyKind::Windmill => {
                        for vel in windmill_rays(now) {
                            bullets.push(Bullet::new(BulletOwner::Enemy, origin, vel, e.atk));
                        }
                    }
                    _ => {
                        bullets.push(Bullet::new(
                            BulletOwner::Enemy,
                            origin,
                            Vec2::new(0.0, ENEMY_BULLET_SPEED),
                            e.atk,
                        ));
                    }
                }
            }
            e.last_fired = now;
        }

        if let Some(beam) = &mut e.beam {
            if now - beam.last_fired >= beam.interval {
                let origin = Vec2::new(beam.origin_x, e.pos.y + e.crash_box.y);
                bullets.push(Bullet::new(
                    BulletOwner::Enemy,
                    origin,
                    Vec2::new(0.0, BEAM_BULLET_SPEED),
                    e.atk * BEAM_ATK_MUL,
                ));
                beam.last_fired = now;
            }
        }
    }
}
