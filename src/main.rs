mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;

use skystrike::entities::{Direction, GameStatus};
use skystrike::spawn::SpawnTable;
use skystrike::stage::Stage;

use display::{DisplayOptions, Viewport};

/// Simulation step and frame pacing, matching the original 17 ms cadence.
const FRAME: Duration = Duration::from_millis(17);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈136 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key; each frame all "fresh" keys act
/// simultaneously, so diagonal movement plus fire works with no
/// interference.  Pause (`P`) freezes the loop entirely — the stage is not
/// ticked, so no simulation time passes.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    table: &SpawnTable,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();

    let (cols, rows) = terminal::size().context("querying terminal size")?;
    let view = Viewport { cols, rows };
    let mut opts = DisplayOptions::default();
    let mut stage = Stage::new(table.clone());
    let mut paused = false;

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(());
                        }
                        KeyCode::Char('p') | KeyCode::Char('P')
                            if stage.status == GameStatus::Playing =>
                        {
                            paused = !paused;
                            if paused {
                                display::draw_pause(out, view)?;
                            }
                        }
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            opts.show_crash_box = !opts.show_crash_box;
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            opts.show_hp_text = !opts.show_hp_text;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if stage.status == GameStatus::GameOver =>
                        {
                            stage = Stage::new(table.clone());
                            paused = false;
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Frozen while paused: no intents, no tick, no time decay ───────────
        if paused {
            thread::sleep(FRAME);
            continue;
        }

        if stage.status == GameStatus::Playing {
            // Movement intents, applied before the tick
            if any_held(
                &key_frame,
                &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
                frame,
            ) {
                stage.player_move(Direction::Up);
            }
            if any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ) {
                stage.player_move(Direction::Left);
            }
            if any_held(
                &key_frame,
                &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
                frame,
            ) {
                stage.player_move(Direction::Down);
            }
            if any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ) {
                stage.player_move(Direction::Right);
            }
            // Fire intent — the stage's cooldown throttles the actual rate
            if any_held(
                &key_frame,
                &[KeyCode::Char(' '), KeyCode::Char('k'), KeyCode::Char('K')],
                frame,
            ) {
                stage.player_fire();
            }

            stage.tick(FRAME.as_millis() as f32, &mut rng);
        }

        display::render(out, &stage, &opts, view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // The spawn table is the one piece of config; refusing to start on a
    // bad table beats running with a partial one.
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/spawn_table.json".to_string());
    let table = SpawnTable::load(&path)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx, &table);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
