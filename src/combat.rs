//! Combat resolution — hit testing, damage, deaths, loot, and pickups.
//!
//! Every pass here follows the store discipline: walk the committed
//! entities, mark removals, commit after the pass.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::entities::{
    Bounds, Bullet, BulletOwner, Enemy, EnemyKind, EnemyTier, Item, ItemKind, Player, Vec2,
    EXPLOSION_FRAMES, ITEM_HALF_EXTENT, PLAYER_PORT_LAYOUT,
};
use crate::spawn::ItemTable;
use crate::store::Store;

/// Drop probability on an ordinary enemy's death.
pub const ORDINARY_DROP_PROB: f32 = 0.2;

/// Standard deviation of the scatter applied to multi-drop boss loot.
const BOSS_SCATTER_STD: f32 = 30.0;

/// Scattered drops accompanying the final boss's equipment drop.
const TOP_BOSS_SCATTER_DROPS: usize = 8;

/// Maximum player fire rate, shots per second.
const FIRE_RATE_CAP: f32 = 20.0;

// ── Primitives ────────────────────────────────────────────────────────────────

/// Damage dealt by an attack: never less than 1, so chip damage always lands.
pub fn damage(atk: f32, defen: f32) -> f32 {
    (atk - defen).max(1.0)
}

/// Axis-aligned box test: does `point` lie within the box spanned by
/// `center` ± `half`?
pub fn hits(center: Vec2, half: Vec2, point: Vec2) -> bool {
    (point.x - center.x).abs() <= half.x && (point.y - center.y).abs() <= half.y
}

/// Advance the explosion sequence one frame.  Returns false once the
/// sequence is exhausted and the bullet should be removed.
pub fn advance_explosion(b: &mut Bullet) -> bool {
    if b.explosion_frame < EXPLOSION_FRAMES {
        b.explosion_frame += 1;
        true
    } else {
        false
    }
}

/// Transition a bullet into its exploding state: it stops moving, stops
/// dealing damage, and shows the first explosion frame immediately.
pub fn explode(b: &mut Bullet) {
    b.exploding = true;
    b.vel = Vec2::ZERO;
    advance_explosion(b);
}

// ── Bullet update ─────────────────────────────────────────────────────────────

/// Move every bullet, advance explosion sequences, and cull bullets that
/// left the playfield or finished exploding.
pub fn update_bullets(bullets: &mut Store<Bullet>, bounds: Bounds) {
    for i in 0..bullets.len() {
        let doomed = {
            let Some(b) = bullets.get_mut(i) else { continue };
            b.pos.x += b.vel.x;
            b.pos.y += b.vel.y;
            let out = bounds.outside(b.pos);
            let finished = b.exploding && !advance_explosion(b);
            out || finished
        };
        if doomed {
            bullets.mark_remove(i);
        }
    }
    bullets.commit();
}

// ── Enemy resolution ──────────────────────────────────────────────────────────

/// Result of one enemy-resolution pass.
pub struct EnemyPass {
    /// Score gained from player-dealt damage this tick.
    pub score: u32,
    /// Level increase owed for a boss defeated this tick.
    pub boss_level_bump: Option<u32>,
}

/// Resolve player bullets against enemies: damage, deaths with loot, and
/// out-of-bounds culling (bosses exempt).
pub fn resolve_enemies(
    enemies: &mut Store<Enemy>,
    bullets: &mut Store<Bullet>,
    items: &mut Store<Item>,
    table: &ItemTable,
    bounds: Bounds,
    rng: &mut impl Rng,
) -> EnemyPass {
    let mut score = 0u32;
    let mut boss_level_bump = None;

    for ei in 0..enemies.len() {
        let Some((pos, half, defen, kind)) = enemies
            .get(ei)
            .map(|e| (e.pos, e.crash_box, e.defen, e.kind))
        else {
            continue;
        };

        let mut hp_loss = 0.0;
        for bi in 0..bullets.len() {
            let Some(b) = bullets.get_mut(bi) else { continue };
            if b.owner != BulletOwner::Player || b.exploding {
                continue;
            }
            if !hits(pos, half, b.pos) {
                continue;
            }
            let dealt = damage(b.atk, defen);
            hp_loss += dealt;
            score += dealt as u32;
            explode(b);
        }

        let hp = {
            let Some(e) = enemies.get_mut(ei) else { continue };
            e.hp -= hp_loss;
            e.hp
        };

        if hp <= 0.0 {
            enemies.mark_remove(ei);
            drop_loot(kind, pos, items, table, rng);
            if kind.is_boss() {
                log::info!("boss {:?} defeated", kind);
                boss_level_bump = Some(match kind.tier() {
                    EnemyTier::TopBoss => 3,
                    _ => 1,
                });
            }
        } else if !kind.is_boss() && bounds.outside_margin(pos) {
            enemies.mark_remove(ei);
        }
    }
    enemies.commit();

    EnemyPass {
        score,
        boss_level_bump,
    }
}

/// Loot scales with the fallen enemy's tier: ordinary enemies roll once
/// against the drop probability, mid-bosses scatter a guaranteed handful,
/// the final boss drops its unique equipment plus a scattered pile.
fn drop_loot(
    kind: EnemyKind,
    pos: Vec2,
    items: &mut Store<Item>,
    table: &ItemTable,
    rng: &mut impl Rng,
) {
    match kind.tier() {
        EnemyTier::Ordinary => table.try_spawn(ORDINARY_DROP_PROB, pos, items, rng),
        EnemyTier::MidBoss => {
            let count = rng.gen_range(3..=5);
            for _ in 0..count {
                if let Some(k) = table.pick(rng) {
                    items.push(Item::new(k, scatter(pos, rng)));
                }
            }
        }
        EnemyTier::TopBoss => {
            items.push(Item::new(ItemKind::Blaster, pos));
            items.push(Item::new(ItemKind::FirePort, scatter(pos, rng)));
            for _ in 0..TOP_BOSS_SCATTER_DROPS {
                if let Some(k) = table.pick(rng) {
                    items.push(Item::new(k, scatter(pos, rng)));
                }
            }
        }
    }
}

fn scatter(pos: Vec2, rng: &mut impl Rng) -> Vec2 {
    match Normal::new(0.0_f32, BOSS_SCATTER_STD) {
        Ok(dist) => Vec2::new(pos.x + dist.sample(rng), pos.y + dist.sample(rng)),
        Err(_) => pos,
    }
}

// ── Player resolution ─────────────────────────────────────────────────────────

/// Resolve enemy bullets against the player.  Returns true if the player's
/// hp reached zero — the terminal game-over transition, not a removal.
pub fn resolve_player(player: &mut Player, bullets: &mut Store<Bullet>) -> bool {
    let mut game_over = false;
    for b in bullets.iter_mut() {
        if b.owner != BulletOwner::Enemy || b.exploding {
            continue;
        }
        if !hits(player.pos, player.crash_box, b.pos) {
            continue;
        }
        let dealt = damage(b.atk, player.defen);
        player.hp -= dealt;
        explode(b);
        if player.hp <= 0.0 {
            player.hp = 0.0;
            game_over = true;
        }
    }
    game_over
}

// ── Items ─────────────────────────────────────────────────────────────────────

/// Move items, cull those past the despawn margin, and resolve pickups
/// against the player's crash box (grown by the item's half-extent).
pub fn update_items(items: &mut Store<Item>, player: &mut Player, bounds: Bounds) {
    let reach = Vec2::new(
        player.crash_box.x + ITEM_HALF_EXTENT.x,
        player.crash_box.y + ITEM_HALF_EXTENT.y,
    );
    for i in 0..items.len() {
        let mut picked: Option<(ItemKind, f32)> = None;
        let mut gone = false;
        {
            let Some(item) = items.get_mut(i) else { continue };
            item.pos.x += item.vel.x;
            item.pos.y += item.vel.y;
            if bounds.outside_margin(item.pos) {
                gone = true;
            } else if hits(player.pos, reach, item.pos) {
                picked = Some((item.kind, item.power));
                gone = true;
            }
        }
        if let Some((kind, power)) = picked {
            apply_item(player, kind, power);
        }
        if gone {
            items.mark_remove(i);
        }
    }
    items.commit();
}

/// Apply a pickup's effect.  Upgrades past their cap are idempotent no-ops.
fn apply_item(player: &mut Player, kind: ItemKind, power: f32) {
    match kind {
        ItemKind::Heal => player.hp = (player.hp + power).min(player.hp_max),
        ItemKind::MaxHp => player.hp_max += power,
        ItemKind::FireRate => {
            let freq = 1000.0 / player.fire_interval;
            if freq < FIRE_RATE_CAP {
                player.fire_interval = 1000.0 / (freq + power).min(FIRE_RATE_CAP);
            }
        }
        ItemKind::Attack => player.atk += power,
        ItemKind::Defense => player.defen += power,
        ItemKind::Blaster => player.has_blaster = true,
        ItemKind::FirePort => {
            if player.fire_ports.len() < PLAYER_PORT_LAYOUT.len() {
                player
                    .fire_ports
                    .push(PLAYER_PORT_LAYOUT[player.fire_ports.len()]);
            }
        }
    }
}
