/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// stage.  No game logic is performed; this module only translates world
/// coordinates into terminal cells and state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use skystrike::entities::{
    Bullet, BulletOwner, Enemy, EnemyKind, GameStatus, Item, ItemKind, Vec2, EXPLOSION_FRAMES,
};
use skystrike::stage::Stage;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_HP_BAR: Color = Color::Green;
const C_BOSS_BAR: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;
const C_CRASH_BOX: Color = Color::DarkGrey;

/// Explosion sequence glyphs, indexed by `explosion_frame - 1`.
const EXPLOSION_GLYPHS: [&str; EXPLOSION_FRAMES] = ["✦", "✶", "✸", "✺", "·"];

// ── Display configuration ─────────────────────────────────────────────────────

/// Render-side toggles; the simulation knows nothing about them.
pub struct DisplayOptions {
    /// Show entity crash boxes (debug aid).
    pub show_crash_box: bool,
    /// Show numeric hp next to the bars.
    pub show_hp_text: bool,
}

impl Default for DisplayOptions {
    fn default() -> DisplayOptions {
        DisplayOptions {
            show_crash_box: false,
            show_hp_text: true,
        }
    }
}

/// Terminal area the playfield is scaled into.
#[derive(Clone, Copy)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    /// Map a world position into the playfield interior (clamped).
    fn cell(&self, stage: &Stage, pos: Vec2) -> (u16, u16) {
        let inner_w = self.cols.saturating_sub(2).max(1) as f32;
        let inner_h = self.rows.saturating_sub(4).max(1) as f32;
        let col = 1.0 + (pos.x / stage.bounds.w * inner_w).clamp(0.0, inner_w - 1.0);
        let row = 2.0 + (pos.y / stage.bounds.h * inner_h).clamp(0.0, inner_h - 1.0);
        (col as u16, row as u16)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    stage: &Stage,
    opts: &DisplayOptions,
    view: Viewport,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, stage, opts, view)?;

    for enemy in stage.enemies.iter() {
        draw_enemy(out, stage, enemy, view)?;
    }
    for item in stage.items.iter() {
        draw_item(out, stage, item, view)?;
    }
    for bullet in stage.bullets.iter() {
        draw_bullet(out, stage, bullet, view)?;
    }
    draw_player(out, stage, view)?;

    if opts.show_crash_box {
        draw_crash_boxes(out, stage, view)?;
    }
    draw_status_line(out, stage, opts, view)?;

    if stage.status == GameStatus::GameOver {
        draw_game_over(out, stage, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    stage: &Stage,
    opts: &DisplayOptions,
    view: Viewport,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Score:{:>8}  Lv:{}", stage.score, stage.level)))?;

    // Boss health bar — right side of the HUD row, only during a boss fight.
    if let Some(boss) = stage.boss() {
        let max = boss.max_hp.unwrap_or(boss.hp).max(1.0);
        let ratio = (boss.hp / max).clamp(0.0, 1.0);
        let width = (view.cols / 3).max(8) as usize;
        let filled = (ratio * width as f32).round() as usize;
        let bar = format!("BOSS [{}{}]", "█".repeat(filled), " ".repeat(width - filled));
        let text = if opts.show_hp_text {
            format!("{} {:.0}/{:.0}", bar, boss.hp.max(0.0), max)
        } else {
            bar
        };
        let x = view.cols.saturating_sub(text.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_BOSS_BAR))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn enemy_glyph(kind: EnemyKind) -> (&'static str, Color) {
    match kind {
        EnemyKind::Basic => ("▼", Color::Green),
        EnemyKind::DoubleShooter => ("◆", Color::Cyan),
        EnemyKind::TripleShooter => ("ψ", Color::Yellow),
        EnemyKind::RingBurst => ("✹", Color::Red),
        EnemyKind::Charger => ("‡", Color::Magenta),
        EnemyKind::Tracker => ("¤", Color::Red),
        EnemyKind::Windmill => ("✕", Color::Cyan),
        EnemyKind::VaderFighter => ("Ж", Color::Magenta),
        EnemyKind::CapitalShip => ("▣▣▣", Color::Red),
        EnemyKind::EscortFighter => ("v", Color::Green),
        EnemyKind::FinalBoss => ("▓▓▓", Color::Red),
    }
}

fn draw_enemy<W: Write>(
    out: &mut W,
    stage: &Stage,
    enemy: &Enemy,
    view: Viewport,
) -> std::io::Result<()> {
    let (glyph, color) = enemy_glyph(enemy.kind);
    let (col, row) = view.cell(stage, enemy.pos);
    // Center multi-cell glyphs on the position
    let col = col.saturating_sub(glyph.chars().count() as u16 / 2).max(1);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    stage: &Stage,
    bullet: &Bullet,
    view: Viewport,
) -> std::io::Result<()> {
    let (col, row) = view.cell(stage, bullet.pos);
    out.queue(cursor::MoveTo(col, row))?;
    if bullet.exploding {
        let glyph = EXPLOSION_GLYPHS[bullet.explosion_frame.clamp(1, EXPLOSION_FRAMES) - 1];
        out.queue(style::SetForegroundColor(C_EXPLOSION))?;
        out.queue(Print(glyph))?;
    } else {
        match bullet.owner {
            BulletOwner::Player => {
                out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
                out.queue(Print("│"))?;
            }
            BulletOwner::Enemy => {
                out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
                out.queue(Print("•"))?;
            }
        }
    }
    Ok(())
}

fn draw_item<W: Write>(
    out: &mut W,
    stage: &Stage,
    item: &Item,
    view: Viewport,
) -> std::io::Result<()> {
    let (sym, color) = match item.kind {
        ItemKind::Heal => ("♥", Color::Magenta),
        ItemKind::MaxHp => ("✚", Color::Green),
        ItemKind::FireRate => ("!", Color::Cyan),
        ItemKind::Attack => ("↟", Color::Yellow),
        ItemKind::Defense => ("◊", Color::Blue),
        ItemKind::Blaster => ("★", Color::Yellow),
        ItemKind::FirePort => ("╫", Color::White),
    };
    let (col, row) = view.cell(stage, item.pos);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(sym))?;
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, stage: &Stage, view: Viewport) -> std::io::Result<()> {
    let (col, row) = view.cell(stage, stage.player.pos);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;
    if row + 1 < view.rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

/// Corner marks around every crash box (debug overlay).
fn draw_crash_boxes<W: Write>(out: &mut W, stage: &Stage, view: Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_CRASH_BOX))?;
    let mut boxes: Vec<(Vec2, Vec2)> = vec![(stage.player.pos, stage.player.crash_box)];
    for e in stage.enemies.iter() {
        boxes.push((e.pos, e.crash_box));
    }
    for (pos, half) in boxes {
        let (l, t) = view.cell(stage, Vec2::new(pos.x - half.x, pos.y - half.y));
        let (r, b) = view.cell(stage, Vec2::new(pos.x + half.x, pos.y + half.y));
        for (col, row) in [(l, t), (r, t), (l, b), (r, b)] {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("+"))?;
        }
    }
    Ok(())
}

// ── Status line (last row) ────────────────────────────────────────────────────

fn draw_status_line<W: Write>(
    out: &mut W,
    stage: &Stage,
    opts: &DisplayOptions,
    view: Viewport,
) -> std::io::Result<()> {
    let row = view.rows.saturating_sub(1);
    let p = &stage.player;

    let width = 20usize;
    let ratio = (p.hp / p.hp_max.max(1.0)).clamp(0.0, 1.0);
    let filled = (ratio * width as f32).round() as usize;
    let bar = format!("HP [{}{}]", "█".repeat(filled), "-".repeat(width - filled));
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HP_BAR))?;
    out.queue(Print(&bar))?;
    if opts.show_hp_text {
        out.queue(Print(format!(" {:.0}/{:.0}", p.hp.max(0.0), p.hp_max)))?;
    }

    let hint = "WASD/arrows: Move  SPACE: Fire  P: Pause  B: Boxes  Q: Quit";
    let x = view.cols.saturating_sub(hint.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(x, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Drawn on top of the last rendered frame while the game is paused.
pub fn draw_pause<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let msg = "║ PAUSE ║";
    let col = (view.cols / 2).saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, view.rows / 2))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(msg))?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, stage: &Stage, view: Viewport) -> std::io::Result<()> {
    let lines = [
        "╔════════════════════╗",
        "║    GAME  OVER      ║",
        "╚════════════════════╝",
    ];
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(2);

    out.queue(style::SetForegroundColor(Color::Red))?;
    for (i, msg) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*msg))?;
    }

    let score_line = format!("Final Score: {:>8}", stage.score);
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, start_row + lines.len() as u16))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let hint = "R - Play Again  Q - Quit";
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, start_row + lines.len() as u16 + 1))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;
    Ok(())
}
