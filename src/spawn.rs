//! Spawn scheduling — materializes enemies and loot from a declarative table.
//!
//! The table is parsed from JSON at startup and is fatal if malformed; an
//! unknown variant identifier inside an otherwise well-formed rule is the one
//! non-fatal case, skipped with a warning when the rule fires.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use crate::entities::{Bounds, Enemy, EnemyKind, Item, ItemKind, Vec2};
use crate::progression::scale_for_level;
use crate::store::Store;

// ── Table format ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize)]
pub struct SpawnTable {
    pub rules: Vec<SpawnRule>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpawnRule {
    /// Enemy variant identifier ("basic", "ring-burst", ...).  Kept as a
    /// string so an unknown identifier degrades to a skipped rule instead of
    /// a parse failure.
    pub variant: String,
    pub trigger: Trigger,
    pub placement: Placement,
    /// Timestamp before which the rule is not eligible to fire.
    #[serde(default)]
    pub first_at: Option<f32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Trigger {
    /// Jittered cadence: a period is drawn from Gaussian(mu, std) at the
    /// start of each cycle and held until the next firing edge.
    Periodic { mu: f32, std: f32 },
    /// Fires once per listed absolute timestamp.
    At { times: Vec<f32> },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Placement {
    /// Random x along the top edge.
    RandomTop,
    Fixed { x: f32, y: f32 },
}

impl SpawnTable {
    pub fn load(path: impl AsRef<Path>) -> Result<SpawnTable> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading spawn table {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("spawn table {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<SpawnTable> {
        let table: SpawnTable = serde_json::from_str(text).context("parsing spawn table")?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<()> {
        for (i, rule) in self.rules.iter().enumerate() {
            if let Trigger::Periodic { mu, std } = &rule.trigger {
                ensure!(
                    mu.is_finite() && *mu > 0.0,
                    "rule {i} ({}): periodic mu must be positive, got {mu}",
                    rule.variant
                );
                ensure!(
                    std.is_finite() && *std >= 0.0,
                    "rule {i} ({}): periodic std must be non-negative, got {std}",
                    rule.variant
                );
            }
        }
        Ok(())
    }
}

// ── Edge detection ────────────────────────────────────────────────────────────

/// Wrap-around edge of `t mod period` between the previous and the current
/// timestamp.  The `last < now` gate keeps a paused (non-advancing) tick from
/// ever firing.
pub fn cycle_edge(last: f32, now: f32, period: f32) -> bool {
    period > 0.0 && last < now && last % period > now % period
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

pub struct Scheduler {
    rules: Vec<RuleState>,
}

struct RuleState {
    rule: SpawnRule,
    /// Current held period of a periodic rule; redrawn after each firing edge.
    period: Option<f32>,
}

/// Draw a strictly positive period from Gaussian(mu, std), rejecting
/// non-positive samples.  A zero period would break the modulus edge test.
fn draw_period(mu: f32, std: f32, rng: &mut impl Rng) -> f32 {
    match Normal::new(mu, std) {
        Ok(dist) => loop {
            let p: f32 = dist.sample(rng);
            if p > 0.0 {
                return p;
            }
        },
        // Unreachable after table validation; fall back to the mean.
        Err(_) => mu,
    }
}

impl Scheduler {
    pub fn new(table: SpawnTable) -> Scheduler {
        Scheduler {
            rules: table
                .rules
                .into_iter()
                .map(|rule| RuleState { rule, period: None })
                .collect(),
        }
    }

    /// Fire every rule due in the `(last, now]` window, appending spawned
    /// enemies (with progression scaling applied) to the store.  Returns the
    /// boss-encounter anchor timestamp if a boss-class enemy spawned.
    pub fn run(
        &mut self,
        enemies: &mut Store<Enemy>,
        bounds: Bounds,
        level: u32,
        last: f32,
        now: f32,
        rng: &mut impl Rng,
    ) -> Option<f32> {
        let boss_alive = enemies.iter().any(|e| e.kind.is_boss());
        let mut anchor = None;

        for rs in &mut self.rules {
            if rs.rule.first_at.map_or(false, |t| now < t) {
                continue;
            }

            let fires = match &rs.rule.trigger {
                Trigger::Periodic { mu, std } => {
                    // Normal spawning is suspended for the whole boss fight.
                    if boss_alive {
                        continue;
                    }
                    let period = *rs.period.get_or_insert_with(|| draw_period(*mu, *std, rng));
                    if cycle_edge(last, now, period) {
                        rs.period = Some(draw_period(*mu, *std, rng));
                        1
                    } else {
                        0
                    }
                }
                Trigger::At { times } => times.iter().filter(|&&t| last < t && t <= now).count(),
            };

            for _ in 0..fires {
                let Some(kind) = EnemyKind::from_id(&rs.rule.variant) else {
                    log::warn!("spawn rule skipped: unknown enemy variant {:?}", rs.rule.variant);
                    break;
                };
                // At most one boss-class enemy may ever be alive.
                if kind.is_boss() && (boss_alive || anchor.is_some()) {
                    continue;
                }
                let pos = match &rs.rule.placement {
                    Placement::RandomTop => Vec2::new(rng.gen::<f32>() * bounds.w, 0.0),
                    Placement::Fixed { x, y } => Vec2::new(*x, *y),
                };
                let mut enemy = Enemy::new(kind, pos);
                scale_for_level(level).apply(&mut enemy);
                if kind.is_boss() {
                    log::info!("boss {:?} enters at t={now}", kind);
                    anchor = Some(now);
                }
                enemies.push(enemy);
            }
        }
        anchor
    }
}

// ── Loot ──────────────────────────────────────────────────────────────────────

/// Weighted item-kind lookup, flattened so that index density equals weight.
#[derive(Clone, Debug)]
pub struct ItemTable {
    flat: Vec<ItemKind>,
}

impl ItemTable {
    /// The drop weights every enemy death rolls against.
    pub fn standard() -> ItemTable {
        ItemTable::from_weights(&[
            (ItemKind::Heal, 10),
            (ItemKind::FireRate, 5),
            (ItemKind::MaxHp, 2),
            (ItemKind::Attack, 2),
            (ItemKind::Defense, 2),
        ])
    }

    pub fn from_weights(weights: &[(ItemKind, u32)]) -> ItemTable {
        let mut flat = Vec::new();
        for &(kind, weight) in weights {
            for _ in 0..weight {
                flat.push(kind);
            }
        }
        ItemTable { flat }
    }

    pub fn flattened(&self) -> &[ItemKind] {
        &self.flat
    }

    /// Draw one kind with probability proportional to its weight.
    pub fn pick(&self, rng: &mut impl Rng) -> Option<ItemKind> {
        if self.flat.is_empty() {
            return None;
        }
        Some(self.flat[rng.gen_range(0..self.flat.len())])
    }

    /// Roll against `probability`; on success append one weighted-random
    /// item at `pos`.
    pub fn try_spawn(
        &self,
        probability: f32,
        pos: Vec2,
        items: &mut Store<Item>,
        rng: &mut impl Rng,
    ) {
        if rng.gen::<f32>() >= probability {
            return;
        }
        if let Some(kind) = self.pick(rng) {
            items.push(Item::new(kind, pos));
        }
    }
}
