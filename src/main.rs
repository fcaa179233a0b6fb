mod display;

use std::collections::{HashMap, HashSet};
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use arena_shooter::compute::{init_state, tick, FrameInput, GameStatus};
use arena_shooter::config::{config_path, LogSettings, Settings};
use arena_shooter::error::AppError;
use arena_shooter::interfaces::{render_frame, Action, Camera, InputSource};
use arena_shooter::tuning::Difficulty;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use display::TerminalCanvas;

// ── Simultaneous-input model ──────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms at
/// 30 FPS) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Keyboard and mouse state assembled from terminal events. Held keys keep
/// the frame they were last seen; one-shot keys (upgrades) only count on the
/// frame they were pressed.
#[derive(Default)]
struct KeyboardState {
    key_frame: HashMap<KeyCode, u64>,
    pressed: HashSet<KeyCode>,
    frame: u64,
    cursor: Option<Vec2>,
    mouse_down: bool,
}

impl KeyboardState {
    /// Letters are folded to lowercase so Shift/Caps Lock don't matter.
    fn normalise(code: KeyCode) -> KeyCode {
        match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }

    fn press(&mut self, code: KeyCode) {
        let code = Self::normalise(code);
        self.key_frame.insert(code, self.frame);
        self.pressed.insert(code);
    }

    fn repeat(&mut self, code: KeyCode) {
        self.key_frame.insert(Self::normalise(code), self.frame);
    }

    fn release(&mut self, code: KeyCode) {
        self.key_frame.remove(&Self::normalise(code));
    }

    fn held(&self, code: KeyCode) -> bool {
        self.key_frame
            .get(&code)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.held(*c))
    }

    fn begin_frame(&mut self) {
        self.frame += 1;
        self.pressed.clear();
    }
}

impl InputSource for KeyboardState {
    fn is_down(&self, action: Action) -> bool {
        match action {
            Action::Up => self.any_held(&[KeyCode::Char('w'), KeyCode::Up]),
            Action::Down => self.any_held(&[KeyCode::Char('s'), KeyCode::Down]),
            Action::Left => self.any_held(&[KeyCode::Char('a'), KeyCode::Left]),
            Action::Right => self.any_held(&[KeyCode::Char('d'), KeyCode::Right]),
            Action::Fire => self.mouse_down || self.held(KeyCode::Char(' ')),
            Action::Dash => self.held(KeyCode::Char('j')),
            Action::Shield => self.held(KeyCode::Char('k')),
            Action::Burst => self.held(KeyCode::Char('l')),
            Action::UpgradeDamage => self.pressed.contains(&KeyCode::Char('1')),
            Action::UpgradeSpeed => self.pressed.contains(&KeyCode::Char('2')),
            Action::UpgradeHealth => self.pressed.contains(&KeyCode::Char('3')),
        }
    }

    fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode, so events go to a file. `RUST_LOG` overrides
/// the configured filter.
fn init_tracing(log: &LogSettings) -> Result<(), AppError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log.file)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.filter))
        .map_err(|e| AppError::Log(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| AppError::Log(e.to_string()))?;

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Difficulty),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    preselected: Difficulty,
) -> std::io::Result<MenuResult> {
    let mut selected = Difficulty::ALL
        .iter()
        .position(|d| *d == preselected)
        .unwrap_or(1);

    loop {
        draw_menu(out, selected)?;

        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) = event else {
            continue;
        };
        match code {
            KeyCode::Char('1') => return Ok(MenuResult::Start(Difficulty::Easy)),
            KeyCode::Char('2') => return Ok(MenuResult::Start(Difficulty::Normal)),
            KeyCode::Char('3') => return Ok(MenuResult::Start(Difficulty::Hard)),
            KeyCode::Up | KeyCode::Char('w') => selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('s') => {
                selected = (selected + 1).min(Difficulty::ALL.len() - 1)
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                return Ok(MenuResult::Start(Difficulty::ALL[selected]))
            }
            _ if is_quit(code, modifiers) => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
}

fn draw_menu<W: Write>(out: &mut W, selected: usize) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  ARENA  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: [(Difficulty, Color); 3] = [
        (Difficulty::Easy, Color::Green),
        (Difficulty::Normal, Color::Yellow),
        (Difficulty::Hard, Color::Red),
    ];
    for (i, (difficulty, color)) in options.iter().enumerate() {
        let profile = difficulty.profile();
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        let marker = if i == selected { '>' } else { ' ' };
        out.queue(Print(format!("{marker}[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", difficulty.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(
            " {} waves, {:.0} HP",
            profile.waves_to_win, profile.player_hp
        )))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("WASD : Move   SPACE / Mouse : Shoot   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Restart,
}

/// Input model: instead of acting on each key event individually, the
/// `KeyboardState` records the frame number of the last press/repeat event
/// for every key. Each frame the simulation reads which keys are still
/// "fresh" through `InputSource`, so Space + WASD can be held together.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events, so keys are removed on release.
/// * **Classic terminals**: only `Press` events. Keys expire after
///   `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    difficulty: Difficulty,
    rng: &mut StdRng,
) -> std::io::Result<LoopExit> {
    let frame_time = settings.frame_duration();
    let dt = frame_time.as_secs_f32();

    let (width, height) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(width, height);
    let mut state = init_state(difficulty);
    let mut camera = Camera::new(canvas.viewport());
    camera.snap_to(state.player.pos(), &state.world);
    let mut keys = KeyboardState::default();

    info!(difficulty = difficulty.label(), "run started");

    loop {
        let frame_start = Instant::now();
        keys.begin_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        if is_quit(code, modifiers) {
                            return Ok(LoopExit::Quit);
                        }
                        if matches!(code, KeyCode::Char('r') | KeyCode::Char('R'))
                            && state.status != GameStatus::Playing
                        {
                            return Ok(LoopExit::Restart);
                        }
                        keys.press(code);
                    }
                    KeyEventKind::Repeat => keys.repeat(code),
                    KeyEventKind::Release => keys.release(code),
                },
                Event::Mouse(MouseEvent { kind, column, row, .. }) => {
                    keys.cursor = canvas.cell_to_screen(column, row).or(keys.cursor);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => keys.mouse_down = true,
                        MouseEventKind::Up(MouseButton::Left) => keys.mouse_down = false,
                        _ => {}
                    }
                }
                Event::Resize(w, h) => {
                    canvas = TerminalCanvas::new(w, h);
                    camera.viewport = canvas.viewport();
                }
                _ => {}
            }
        }

        // ── Simulate ──────────────────────────────────────────────────────────
        let input = FrameInput::capture(&keys, &camera);
        state = tick(&state, &input, dt, rng);
        camera.follow(state.player.pos(), &state.world);

        // ── Draw ──────────────────────────────────────────────────────────────
        canvas.clear();
        render_frame(&state, &camera, &mut canvas);
        canvas.present(out, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), AppError> {
    let settings = Settings::load(&config_path())?;
    init_tracing(&settings.log)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &settings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.map_err(AppError::from)
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
) -> std::io::Result<()> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let difficulty = match show_menu(out, rx, settings.difficulty)? {
        MenuResult::Quit => return Ok(()),
        MenuResult::Start(difficulty) => difficulty,
    };
    while let LoopExit::Restart = game_loop(out, rx, settings, difficulty, &mut rng)? {}
    Ok(())
}
