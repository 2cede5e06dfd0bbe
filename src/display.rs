/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable [`Frame`].  No
/// game logic is performed; this module only scales the pixel playfield onto
/// terminal cells and translates it into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use laser_defense::entities::Sprite;
use laser_defense::frame::{Frame, MessageColor, Renderable};
use rand::Rng;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Green;
const C_HUD_LIVES: Color = Color::Red;
const C_HERO: Color = Color::White;
const C_HERO_DAMAGED: Color = Color::DarkYellow;
const C_ENEMY: Color = Color::Green;
const C_LASER: Color = Color::Red;
const C_EXPLOSION_RED: Color = Color::Red;
const C_EXPLOSION_GREEN: Color = Color::Green;
const C_STAR: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

// ── Starfield ─────────────────────────────────────────────────────────────────

/// Static decorative backdrop, regenerated when the terminal is resized.
pub struct Starfield {
    stars: Vec<(u16, u16, char)>,
}

impl Starfield {
    pub fn new(rng: &mut impl Rng, cols: u16, rows: u16) -> Self {
        let inner = cols.saturating_sub(2) as usize * rows.saturating_sub(4) as usize;
        let count = inner / 40;
        let stars = (0..count)
            .filter_map(|_| {
                if cols < 3 || rows < 5 {
                    return None;
                }
                let x = rng.gen_range(1..cols - 1);
                let y = rng.gen_range(2..rows - 2);
                let glyph = if rng.gen_bool(0.2) { '*' } else { '.' };
                Some((x, y, glyph))
            })
            .collect();
        Self { stars }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Maps playfield pixels onto the bordered inner area of the terminal.
struct Viewport {
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(frame: &Frame, cols: u16, rows: u16) -> Self {
        let inner_w = cols.saturating_sub(2).max(1) as f32;
        let inner_h = rows.saturating_sub(4).max(1) as f32;
        Self {
            cols,
            rows,
            sx: inner_w / frame.width.max(1) as f32,
            sy: inner_h / frame.height.max(1) as f32,
        }
    }

    /// Cell at the centre of an entity's box.
    fn centre(&self, e: &Renderable) -> (u16, u16) {
        let cx = (e.x + e.width as f32 / 2.0) * self.sx;
        let cy = (e.y + e.height as f32 / 2.0) * self.sy;
        let col = (1.0 + cx).clamp(1.0, self.cols.saturating_sub(2) as f32);
        let row = (2.0 + cy).clamp(2.0, self.rows.saturating_sub(3) as f32);
        (col as u16, row as u16)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, frame: &Frame, stars: &Starfield) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let view = Viewport::new(frame, cols, rows);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_stars(out, stars)?;
    draw_border(out, &view)?;
    draw_hud(out, frame, &view)?;

    for entity in &frame.entities {
        draw_entity(out, entity, &view)?;
    }

    if let Some(banner) = &frame.hud.banner {
        draw_banner(out, &banner.text, banner.color, &view)?;
    }
    draw_controls_hint(out, &view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_stars<W: Write>(out: &mut W, stars: &Starfield) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_STAR))?;
    for &(x, y, glyph) in &stars.stars {
        out.queue(cursor::MoveTo(x, y))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, frame: &Frame, view: &Viewport) -> std::io::Result<()> {
    // Score, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", frame.hud.score)))?;

    // Lives, right
    let lives_str = format!("Lives:{}", "♥".repeat(frame.hud.life as usize));
    let rx = view
        .cols
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn glyph(sprite: Sprite) -> (&'static str, Color) {
    match sprite {
        Sprite::Hero => ("/▲\\", C_HERO),
        Sprite::HeroLeft => ("«▲\\", C_HERO),
        Sprite::HeroRight => ("/▲»", C_HERO),
        Sprite::HeroDamaged => ("/▲\\", C_HERO_DAMAGED),
        Sprite::Enemy => ("«▼»", C_ENEMY),
        Sprite::Laser => ("║", C_LASER),
        Sprite::ExplosionRed => ("✸", C_EXPLOSION_RED),
        Sprite::ExplosionGreen => ("✸", C_EXPLOSION_GREEN),
    }
}

fn draw_entity<W: Write>(out: &mut W, entity: &Renderable, view: &Viewport) -> std::io::Result<()> {
    let (text, color) = glyph(entity.sprite);
    let (col, row) = view.centre(entity);
    let half = text.chars().count() as u16 / 2;
    out.queue(cursor::MoveTo(col.saturating_sub(half).max(1), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Banner & hint ─────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    text: &str,
    color: MessageColor,
    view: &Viewport,
) -> std::io::Result<()> {
    let color = match color {
        MessageColor::Yellow => Color::Yellow,
        MessageColor::Red => Color::Red,
        MessageColor::Green => Color::Green,
    };
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, view.rows / 2))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   ↑ ↓ : Nudge   SPACE : Fire   ENTER : Start   Q : Quit",
    ))?;
    Ok(())
}
