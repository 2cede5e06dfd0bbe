mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use display::Starfield;
use laser_defense::config::ControlsConfig;
use laser_defense::{Game, GameConfig, Intent};

#[derive(Parser)]
#[command(name = "laser_defense")]
#[command(about = "Shoot down the descending enemy grid before it reaches you")]
struct Args {
    /// RON file overriding playfield, timing, tuning and key bindings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the log (the terminal is taken over by the game)
    #[arg(long, default_value = "laser_defense.log")]
    log: PathBuf,

    /// Seed for the starfield backdrop
    #[arg(long)]
    seed: Option<u64>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Key bindings ──────────────────────────────────────────────────────────────

fn key_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Char(' '),
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

fn build_keymap(controls: &ControlsConfig) -> HashMap<KeyCode, Intent> {
    let mut keymap = HashMap::new();
    for (name, intent) in controls.resolved_bindings() {
        match key_code(&name) {
            Some(code) => {
                keymap.insert(code, intent);
            }
            None => warn!(key = %name, "ignoring binding for unknown key"),
        }
    }
    keymap
}

/// Returns true if `key` was seen within the last `window` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64, window: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= window)
        .unwrap_or(false)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: steering keys are tracked as held (last press/repeat frame per
/// key) and turned into `MoveLeftStart` / `MoveRightStart` / `MoveStop`
/// transitions; every other binding is a one-shot intent on press.
///
/// Keyboard-enhancement terminals report releases and drop a key at once;
/// classic terminals only repeat presses, so keys expire after
/// `hold_window_frames` of silence.
fn play<W: Write>(
    out: &mut W,
    game: &mut Game,
    controls: &ControlsConfig,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> Result<()> {
    let keymap = build_keymap(controls);
    let frame_len = Duration::from_millis(1000 / u64::from(controls.fps.max(1)));
    let window = controls.hold_window_frames;

    let (cols, rows) = terminal::size().context("query terminal size")?;
    let mut stars = Starfield::new(rng, cols, rows);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut steering = Intent::MoveStop;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let (code, kind, modifiers) = match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => (code, kind, modifiers),
                Event::Resize(c, r) => {
                    stars = Starfield::new(rng, c, r);
                    continue;
                }
                _ => continue,
            };
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                    match keymap.get(&code) {
                        Some(intent) if intent.is_steering() => {
                            key_frame.insert(code, frame);
                        }
                        Some(intent) => game.handle_intent(*intent),
                        None => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    if key_frame.contains_key(&code) {
                        key_frame.insert(code, frame);
                    }
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Steering from held keys ───────────────────────────────────────────
        let held = |target: Intent| {
            keymap
                .iter()
                .any(|(key, intent)| *intent == target && is_held(&key_frame, key, frame, window))
        };
        let wanted = if held(Intent::MoveLeftStart) {
            Intent::MoveLeftStart
        } else if held(Intent::MoveRightStart) {
            Intent::MoveRightStart
        } else {
            Intent::MoveStop
        };
        // Re-assert a held direction every frame so it survives a restart.
        if wanted != steering || wanted != Intent::MoveStop {
            game.handle_intent(wanted);
            steering = wanted;
        }

        // ── Advance simulation by real elapsed time ───────────────────────────
        let elapsed_ms = last.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        last += Duration::from_millis(u64::from(elapsed_ms));
        game.update(elapsed_ms);

        display::render(out, &game.frame(), &stars).context("render frame")?;

        let spent = frame_start.elapsed();
        if spent < frame_len {
            thread::sleep(frame_len - spent);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log)?;

    let config = match &args.config {
        Some(path) => {
            let (config, fallback) = GameConfig::load_or_default(path);
            if let Some(reason) = fallback {
                warn!(%reason, "using default configuration");
            }
            config
        }
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

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
                break; // receiver dropped → program exiting
            }
        }
    });

    let mut game = Game::new(config.clone());
    game.mark_ready();
    info!(
        width = config.playfield.width,
        height = config.playfield.height,
        "game ready"
    );
    let result = play(&mut out, &mut game, &config.controls, &rx, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(score = game.round().score(), "exiting");
    result
}
