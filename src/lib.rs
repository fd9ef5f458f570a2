//! Simulation core of a vertically-scrolling shooter: the authoritative
//! per-tick update of player, enemies, bullets, and pickups, with spawn
//! scheduling, collision and damage resolution, loot, and boss-driven
//! difficulty progression.
//!
//! Rendering, input polling, and frame pacing live in the binary; the
//! library never blocks, never draws, and takes all randomness through an
//! injected [`rand::Rng`], so every behavior is reproducible under a seeded
//! RNG in tests.

pub mod combat;
pub mod entities;
pub mod motion;
pub mod progression;
pub mod spawn;
pub mod stage;
pub mod store;
