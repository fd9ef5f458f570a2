//! The simulation driver: owns all game state and runs one deterministic
//! tick in a fixed order — spawn, enemy fire, movement, combat, items.
//!
//! Pausing is the caller's job: a paused front end simply does not call
//! `tick`, so the simulation freezes with no time decay.

use rand::Rng;

use crate::combat;
use crate::entities::{
    Bounds, Bullet, BulletOwner, Direction, Enemy, GameStatus, Item, Player, Vec2,
    BLASTER_ATK_MUL, PLAYFIELD,
};
use crate::motion;
use crate::spawn::{ItemTable, Scheduler, SpawnTable};
use crate::store::Store;

const PLAYER_BULLET_SPEED: f32 = 10.0;

pub struct Stage {
    pub bounds: Bounds,
    pub player: Player,
    pub enemies: Store<Enemy>,
    pub bullets: Store<Bullet>,
    pub items: Store<Item>,
    pub item_table: ItemTable,
    scheduler: Scheduler,
    /// Simulation clock, milliseconds.  Monotonic except for the rewind to
    /// the boss anchor on a boss defeat.
    pub time_stamp: f32,
    pub last_time_stamp: f32,
    /// Difficulty level; bumped on boss defeat, never decreased.
    pub level: u32,
    pub score: u32,
    /// Timestamp captured when the current boss spawned; restored on its
    /// death so the boss fight consumes no spawn-timer progress.
    pub boss_anchor: Option<f32>,
    pub status: GameStatus,
}

impl Stage {
    pub fn new(table: SpawnTable) -> Stage {
        let bounds = PLAYFIELD;
        Stage {
            bounds,
            player: Player::new(Vec2::new(bounds.w * 0.5, bounds.h * 0.95)),
            enemies: Store::new(),
            bullets: Store::new(),
            items: Store::new(),
            item_table: ItemTable::standard(),
            scheduler: Scheduler::new(table),
            time_stamp: 0.0,
            last_time_stamp: 0.0,
            level: 0,
            score: 0,
            boss_anchor: None,
            status: GameStatus::Playing,
        }
    }

    // ── Input intents (applied before the tick) ──────────────────────────────

    /// One axis-aligned movement step, rejected at the playfield edge.
    pub fn player_move(&mut self, dir: Direction) {
        let step = self.player.speed;
        let (dx, dy) = match dir {
            Direction::Up => (0.0, -step),
            Direction::Left => (-step, 0.0),
            Direction::Down => (0.0, step),
            Direction::Right => (step, 0.0),
        };
        let aim = Vec2::new(self.player.pos.x + dx, self.player.pos.y + dy);
        if !self.bounds.outside(aim) {
            self.player.pos = aim;
        }
    }

    /// Fire one volley from every port, if the cooldown has elapsed.
    pub fn player_fire(&mut self) {
        if self.time_stamp - self.player.last_fired < self.player.fire_interval {
            return;
        }
        let atk = self.player.atk
            * if self.player.has_blaster {
                BLASTER_ATK_MUL
            } else {
                1.0
            };
        for port in &self.player.fire_ports {
            let origin = Vec2::new(self.player.pos.x + port.x, self.player.pos.y + port.y);
            self.bullets.push(Bullet::new(
                BulletOwner::Player,
                origin,
                Vec2::new(0.0, -PLAYER_BULLET_SPEED),
                atk,
            ));
        }
        self.player.last_fired = self.time_stamp;
    }

    // ── The tick ─────────────────────────────────────────────────────────────

    /// Advance the simulation by `dt_ms` milliseconds.  A finished game
    /// refuses to tick.
    pub fn tick(&mut self, dt_ms: f32, rng: &mut impl Rng) {
        if self.status == GameStatus::GameOver {
            return;
        }
        self.last_time_stamp = self.time_stamp;
        self.time_stamp += dt_ms;

        // 1. Scheduled spawns (suppressed during boss fights).
        if let Some(anchor) = self.scheduler.run(
            &mut self.enemies,
            self.bounds,
            self.level,
            self.last_time_stamp,
            self.time_stamp,
            rng,
        ) {
            self.boss_anchor = Some(anchor);
        }

        // 2. Enemy fire.
        motion::enemy_fire(&mut self.enemies, &mut self.bullets, self.time_stamp);

        // 3. Movement: bullets, then enemy AI (which may stage escorts).
        combat::update_bullets(&mut self.bullets, self.bounds);
        motion::update_enemies(
            &mut self.enemies,
            self.player.pos,
            self.bounds,
            self.last_time_stamp,
            self.time_stamp,
            self.level,
            rng,
        );

        // 4. Combat resolution.
        let pass = combat::resolve_enemies(
            &mut self.enemies,
            &mut self.bullets,
            &mut self.items,
            &self.item_table,
            self.bounds,
            rng,
        );
        self.score += pass.score;
        if let Some(bump) = pass.boss_level_bump {
            // Rewind the clock to the boss anchor so the fight consumed no
            // spawn-timer progress; the player's cooldown rewinds with it.
            if let Some(anchor) = self.boss_anchor.take() {
                self.time_stamp = anchor;
                self.player.last_fired = anchor;
            }
            self.level += bump;
        }
        if combat::resolve_player(&mut self.player, &mut self.bullets) {
            self.status = GameStatus::GameOver;
            log::info!("game over: score {}", self.score);
        }

        // 5. Items fall and get picked up.
        combat::update_items(&mut self.items, &mut self.player, self.bounds);
    }

    /// The live boss, if a boss fight is underway (drives the HUD bar).
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.kind.is_boss())
    }
}
