/// Difficulty scaling — pure functions from level to stat multipliers.
///
/// The level starts at 0 and is bumped each time a boss falls, so every boss
/// rematch faces the player against noticeably tougher spawns.

use crate::entities::Enemy;

/// Fire intervals are never scaled below this floor, whatever the level.
pub const FIRE_INTERVAL_FLOOR_MS: f32 = 50.0;

/// Stat multipliers for enemies spawned at a given difficulty level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelScale {
    pub atk: f32,
    pub defen: f32,
    pub hp: f32,
    pub fire_interval: f32,
}

/// Exponential growth per level: attack ×1.44, defense ×1.15, hp ×1.67,
/// fire interval ×0.90 (faster shots).
pub fn scale_for_level(level: u32) -> LevelScale {
    let level = level as i32;
    LevelScale {
        atk: 1.44_f32.powi(level),
        defen: 1.15_f32.powi(level),
        hp: 1.67_f32.powi(level),
        fire_interval: 0.90_f32.powi(level),
    }
}

impl LevelScale {
    /// Apply the multipliers to a freshly constructed enemy's base stats.
    /// Runs exactly once per enemy, at spawn time.  The fire-interval
    /// multiplier is only accepted if the result stays above the floor.
    /// Boss-class enemies capture their scaled hp as `max_hp` here, for the
    /// HP-bar ratio.
    pub fn apply(&self, enemy: &mut Enemy) {
        enemy.atk *= self.atk;
        enemy.defen *= self.defen;
        enemy.hp *= self.hp;
        let scaled = enemy.fire_interval * self.fire_interval;
        if scaled >= FIRE_INTERVAL_FLOOR_MS {
            enemy.fire_interval = scaled;
        }
        if enemy.kind.is_boss() {
            enemy.max_hp = Some(enemy.hp);
        }
    }
}
