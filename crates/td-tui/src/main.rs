//! Trapdelve terminal front end.
//!
//! Renders the core's display snapshot as a glyph grid and feeds key
//! presses back as inputs. All rules live in td-core; this binary only
//! draws, maps keys, and owns the reward-screen delay.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::Print;
use crossterm::queue;
use crossterm::terminal::{self, Clear, ClearType};

use td_core::{Direction, DisplaySnapshot, Phase, Session, TurnResult};

/// Trapdelve - cross the minefield, find the stairs down.
#[derive(Parser, Debug)]
#[command(name = "trapdelve", about = "Trapdelve - a minesweeper dungeon crawl")]
struct Args {
    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Restores the terminal even on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut session = match args.seed {
        Some(seed) => Session::new(seed),
        None => Session::from_entropy(),
    };
    log::info!("starting run with seed {}", session.rng.seed());
    session.setup_floor();

    let _guard = RawModeGuard::enable()?;
    let mut stdout = io::stdout();
    // Flag placement waits for a follow-up direction key.
    let mut flagging = false;

    loop {
        draw(&mut stdout, &session.snapshot(), flagging)?;
        session.clear_last_action_message();
        session.clear_ui_effect();
        session.clear_just_acquired_item();

        if session.phase == Phase::GameOver {
            wait_for_any_key()?;
            return Ok(());
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let KeyCode::Char(pressed) = key.code else {
            continue;
        };

        if flagging {
            flagging = false;
            if let Some(direction) = Direction::from_key(pressed) {
                let (dr, dc) = direction.delta();
                let pos = session.player.pos.offset(dr, dc);
                session.toggle_flag(pos.r, pos.c);
            }
            continue;
        }

        let input = match session.phase {
            Phase::Playing if pressed == 'q' => return Ok(()),
            Phase::Playing if pressed == 'f' => {
                flagging = true;
                continue;
            }
            Phase::ConfirmNextFloor if pressed == 'y' => "yes".to_string(),
            Phase::ConfirmNextFloor if pressed == 'n' => "no".to_string(),
            _ => pressed.to_string(),
        };

        let advance = matches!(
            session.handle_input(&input),
            TurnResult::NextFloorAfterDelay
        );
        if advance {
            thread::sleep(Duration::from_millis(1500));
            session.advance_floor();
        }
    }
}

/// One frame: header, grid, messages, prompt.
fn draw(stdout: &mut io::Stdout, snapshot: &DisplaySnapshot, flagging: bool) -> io::Result<()> {
    let state = &snapshot.display;

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    line(stdout, format!("--- Floor: {} (turn {}) ---", state.floor_number, state.turn))?;

    let held: Vec<&str> = state.items.iter().map(|item| item.name()).collect();
    let held = if held.is_empty() {
        "None".to_string()
    } else {
        held.join(", ")
    };
    line(stdout, format!("Items: {held}"))?;

    for r in 0..state.grid.rows() as i32 {
        let mut row = String::new();
        for c in 0..state.grid.cols() as i32 {
            row.push_str(&glyph(snapshot, r, c));
        }
        line(stdout, row)?;
    }
    line(stdout, "------------------".to_string())?;

    if snapshot.phase == Phase::ChoosingItem {
        for (index, item) in state.current_item_choices.iter().enumerate() {
            line(
                stdout,
                format!("{}: {} - {}", index + 1, item.name(), item.description()),
            )?;
        }
    }
    if let Some(result) = snapshot.result {
        line(stdout, format!("Reached floor {}", result.final_floor_number))?;
        for record in &result.floor_revelation_rates {
            line(
                stdout,
                format!("  Floor {}: {:.0}% revealed", record.floor, record.rate * 100.0),
            )?;
        }
        for (item, count) in &result.final_items {
            line(stdout, format!("  {} x{}", item.name(), count))?;
        }
    }

    if !snapshot.message.is_empty() {
        line(stdout, snapshot.message.to_string())?;
    }
    if let Some(action) = snapshot.last_action_message {
        // A flash effect just means the message deserves emphasis here.
        if snapshot.ui_effect.is_some() {
            line(stdout, format!("*** {action} ***"))?;
        } else {
            line(stdout, action.to_string())?;
        }
    }
    if let Some(item) = snapshot.new_item_acquired {
        line(stdout, format!("Picked up: {}!", item.name()))?;
    }

    if flagging {
        line(stdout, "Flag which direction? (w/a/s/d)".to_string())?;
    } else if snapshot.phase == Phase::Playing {
        line(stdout, format!("{}(f: flag, q: quit)", snapshot.prompt))?;
    }

    stdout.flush()
}

/// The three-or-four character glyph for one cell.
fn glyph(snapshot: &DisplaySnapshot, r: i32, c: i32) -> String {
    let state = &snapshot.display;
    let pos = td_core::grid::Pos::new(r, c);
    let cell = state.grid.cell(pos);

    if pos == state.player {
        return if cell.is_trap {
            "P(X)".to_string()
        } else if cell.adjacent_traps == 0 {
            "P(.)".to_string()
        } else {
            format!("P({})", cell.adjacent_traps)
        };
    }
    if pos == state.exit && (cell.is_revealed || state.exit_revealed_this_floor) {
        return " E ".to_string();
    }
    if cell.is_revealed {
        if cell.has_item() {
            " I ".to_string()
        } else if cell.is_trap {
            " X ".to_string()
        } else if cell.adjacent_traps == 0 {
            " . ".to_string()
        } else {
            format!(" {} ", cell.adjacent_traps)
        }
    } else if cell.is_flagged {
        " F ".to_string()
    } else {
        " # ".to_string()
    }
}

fn line(stdout: &mut io::Stdout, text: String) -> io::Result<()> {
    queue!(stdout, Print(text), Print("\r\n"))
}

fn wait_for_any_key() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
