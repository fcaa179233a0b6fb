/// Rendering layer. All terminal output lives here.
///
/// `TerminalCanvas` is the `Renderer` the simulation draws into: sprites are
/// rasterised onto a character grid, then `present` flushes the grid plus HUD
/// and overlays. No game logic is performed in this module.

use std::io::Write;

use arena_shooter::compute::{GameState, GameStatus};
use arena_shooter::entities::{Owner, Rgb};
use arena_shooter::interfaces::{Renderer, Sprite};
use arena_shooter::player::Stat;
use arena_shooter::tuning::{Difficulty, EnemyKind};
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::White;
const C_HUD_HP: Color = Color::Red;
const C_HUD_MANA: Color = Color::Blue;
const C_HUD_SHIELD: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_MANA: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

/// World units covered by one terminal cell. Cells are roughly twice as
/// tall as they are wide.
const CELL_SIZE: Vec2 = Vec2::new(12.0, 24.0);

/// Rows reserved above the arena for the HUD.
const HUD_ROWS: u16 = 2;

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

fn difficulty_color(d: Difficulty) -> Color {
    match d {
        Difficulty::Easy => Color::Green,
        Difficulty::Normal => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

pub struct TerminalCanvas {
    width: u16,
    height: u16,
    /// Arena cells, row-major, inside the border.
    cells: Vec<Option<(char, Color)>>,
    cols: usize,
    rows: usize,
}

impl TerminalCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2) as usize;
        let rows = height.saturating_sub(HUD_ROWS + 3) as usize;
        Self {
            width,
            height,
            cells: vec![None; cols * rows],
            cols,
            rows,
        }
    }

    /// Size of the visible arena in world units, for the camera.
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * CELL_SIZE
    }

    /// Arena top-left in terminal coordinates.
    fn origin(&self) -> (u16, u16) {
        (1, HUD_ROWS + 1)
    }

    /// Terminal cell to a screen position in world units (cell centre), for
    /// mouse aiming. `None` outside the arena.
    pub fn cell_to_screen(&self, column: u16, row: u16) -> Option<Vec2> {
        let (left, top) = self.origin();
        let col = column.checked_sub(left)? as usize;
        let row = row.checked_sub(top)? as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((Vec2::new(col as f32, row as f32) + 0.5) * CELL_SIZE)
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Screen position in world units to a terminal cell, if visible.
    fn cell_at(&self, screen: Vec2) -> Option<(usize, usize)> {
        let cell = (screen / CELL_SIZE).floor();
        if cell.x < 0.0 || cell.y < 0.0 {
            return None;
        }
        let (col, row) = (cell.x as usize, cell.y as usize);
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    fn plot(&mut self, world: Vec2, camera_offset: Vec2, glyph: char, color: Color) {
        if let Some((col, row)) = self.cell_at(world - camera_offset) {
            self.cells[row * self.cols + col] = Some((glyph, color));
        }
    }

    /// Fill every cell whose centre lies inside the circle.
    fn plot_disc(&mut self, centre: Vec2, radius: f32, offset: Vec2, glyph: char, color: Color) {
        let reach = (Vec2::splat(radius) / CELL_SIZE).ceil();
        let (rx, ry) = (reach.x as i32, reach.y as i32);
        for dy in -ry..=ry {
            for dx in -rx..=rx {
                let p = centre + Vec2::new(dx as f32, dy as f32) * CELL_SIZE;
                if p.distance(centre) <= radius.max(CELL_SIZE.x / 2.0) {
                    self.plot(p, offset, glyph, color);
                }
            }
        }
    }

    // ── Flush ────────────────────────────────────────────────────────────────

    /// Write one complete frame: border, arena, HUD and any overlay.
    pub fn present<W: Write>(&self, out: &mut W, state: &GameState) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_border(out)?;
        self.draw_cells(out)?;
        self.draw_hud(out, state)?;
        self.draw_controls_hint(out)?;

        if let Some(remaining) = state.countdown() {
            if state.status == GameStatus::Playing {
                self.draw_countdown(out, state, remaining)?;
            }
        }
        match state.status {
            GameStatus::Won => self.draw_banner(out, state, "V I C T O R Y", Color::Green)?,
            GameStatus::Lost => self.draw_banner(out, state, "GAME  OVER", Color::Red)?,
            GameStatus::Playing => {}
        }

        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.height.saturating_sub(1)))?;
        out.flush()
    }

    fn draw_border<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let (_, top) = self.origin();
        let top = top - 1;
        let bottom = top + self.rows as u16 + 1;
        out.queue(style::SetForegroundColor(C_BORDER))?;
        out.queue(cursor::MoveTo(0, top))?;
        out.queue(Print(format!("┌{}┐", "─".repeat(self.cols))))?;
        out.queue(cursor::MoveTo(0, bottom))?;
        out.queue(Print(format!("└{}┘", "─".repeat(self.cols))))?;
        for row in top + 1..bottom {
            out.queue(cursor::MoveTo(0, row))?;
            out.queue(Print("│"))?;
            out.queue(cursor::MoveTo(self.cols as u16 + 1, row))?;
            out.queue(Print("│"))?;
        }
        Ok(())
    }

    fn draw_cells<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let (left, top) = self.origin();
        for (i, cell) in self.cells.iter().enumerate() {
            let Some((glyph, color)) = cell else {
                continue;
            };
            let (col, row) = ((i % self.cols) as u16, (i / self.cols) as u16);
            out.queue(cursor::MoveTo(left + col, top + row))?;
            out.queue(style::SetForegroundColor(*color))?;
            out.queue(Print(glyph))?;
        }
        Ok(())
    }

    // ── HUD (rows 0-1) ────────────────────────────────────────────────────────

    fn draw_hud<W: Write>(&self, out: &mut W, state: &GameState) -> std::io::Result<()> {
        let p = &state.player;
        let waves = &state.waves;

        out.queue(cursor::MoveTo(1, 0))?;
        out.queue(style::SetForegroundColor(C_HUD))?;
        out.queue(Print(format!(
            "Wave {:>2}/{:<2}  Enemies {:>3}  Kills {:>4}  ",
            waves.current_wave(),
            waves.waves_to_win(),
            state.live_enemies(),
            state.stats.kills,
        )))?;
        out.queue(style::SetForegroundColor(C_HUD_HP))?;
        out.queue(Print(format!(
            "HP {:>3.0}/{:<3.0}  ",
            p.health.current(),
            p.health.max()
        )))?;
        out.queue(style::SetForegroundColor(C_HUD_MANA))?;
        out.queue(Print(format!("Mana {:>4}  ", p.mana)))?;
        if p.shield_active() {
            out.queue(style::SetForegroundColor(C_HUD_SHIELD))?;
            out.queue(Print(format!("[SHIELD {:>2.0}s]", p.shield_remaining.ceil())))?;
        }

        let label = format!("[ {} ]", state.difficulty.label().to_uppercase());
        let lx = self.width.saturating_sub(label.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(lx, 0))?;
        out.queue(style::SetForegroundColor(difficulty_color(state.difficulty)))?;
        out.queue(Print(label))?;

        let cd = |remaining: f32| {
            if remaining > 0.0 {
                format!("{remaining:>3.1}s")
            } else {
                " ok ".to_string()
            }
        };
        let costs: Vec<String> = Stat::ALL
            .iter()
            .zip(["1 Dmg", "2 Spd", "3 HP"])
            .map(|(stat, name)| format!("{name}:{}", p.upgrade_cost(*stat)))
            .collect();
        out.queue(cursor::MoveTo(1, 1))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!(
            "J Dash {}  K Shield {}  L Burst {}   Upgrades {}",
            cd(p.dash.remaining()),
            cd(p.shield.remaining()),
            cd(p.burst.remaining()),
            costs.join("  "),
        )))?;
        Ok(())
    }

    fn draw_controls_hint<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(cursor::MoveTo(1, self.height.saturating_sub(1)))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(
            "WASD : Move   SPACE/Mouse : Shoot   J K L : Abilities   1 2 3 : Upgrade   Q : Quit",
        ))?;
        Ok(())
    }

    // ── Overlays ──────────────────────────────────────────────────────────────

    fn centred<W: Write>(&self, out: &mut W, row: u16, text: &str, color: Color) -> std::io::Result<()> {
        let col = (self.width / 2).saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(text))?;
        Ok(())
    }

    fn draw_countdown<W: Write>(
        &self,
        out: &mut W,
        state: &GameState,
        remaining: f32,
    ) -> std::io::Result<()> {
        let text = format!(
            "Wave {} begins in {:.0}",
            state.waves.current_wave() + 1,
            remaining.ceil()
        );
        self.centred(out, HUD_ROWS + 2, &text, Color::Yellow)
    }

    fn draw_banner<W: Write>(
        &self,
        out: &mut W,
        state: &GameState,
        title: &str,
        color: Color,
    ) -> std::io::Result<()> {
        let inner = 22;
        let top = format!("╔{}╗", "═".repeat(inner));
        let middle = format!("║{title:^inner$}║");
        let bottom = format!("╚{}╝", "═".repeat(inner));
        let stats = &state.stats;
        let summary = format!(
            "Waves cleared {}   Kills {}   Mana {}",
            stats.waves_cleared, stats.kills, stats.mana_collected
        );

        let start = (self.height / 2).saturating_sub(3);
        self.centred(out, start, &top, color)?;
        self.centred(out, start + 1, &middle, color)?;
        self.centred(out, start + 2, &bottom, color)?;
        self.centred(out, start + 3, &summary, Color::Yellow)?;
        self.centred(out, start + 4, "R - Play Again  Q - Quit", Color::White)
    }
}

// ── Sprites ───────────────────────────────────────────────────────────────────

fn enemy_glyph(kind: EnemyKind) -> char {
    match kind {
        EnemyKind::Shooter => 'S',
        EnemyKind::Exploder => '*',
        EnemyKind::Bouncer => 'o',
        EnemyKind::Tank => 'T',
        EnemyKind::Leaper => 'L',
    }
}

impl Renderer for TerminalCanvas {
    fn draw(&mut self, sprite: Sprite<'_>, camera_offset: Vec2) {
        match sprite {
            Sprite::Player(p) => {
                let color = if p.shield_active() { C_HUD_SHIELD } else { C_PLAYER };
                let nose = p.pos() + Vec2::from_angle(p.angle) * p.body.radius * 2.0;
                self.plot(nose, camera_offset, '·', color);
                self.plot(p.pos(), camera_offset, '@', color);
            }
            Sprite::Enemy(e) => {
                let color = rgb(e.template().color);
                if e.is_exploding() {
                    let blast = e.template().explosion.map(|x| x.radius).unwrap_or(0.0);
                    self.plot_disc(e.pos(), blast, camera_offset, '░', Color::DarkYellow);
                    return;
                }
                let glyph = enemy_glyph(e.kind);
                self.plot_disc(e.pos(), e.body.radius, camera_offset, glyph, color);
            }
            Sprite::Projectile(b) => {
                let (glyph, color) = match b.owner {
                    Owner::Player => ('•', C_BULLET_PLAYER),
                    Owner::Enemy => ('∘', C_BULLET_ENEMY),
                };
                self.plot(b.pos, camera_offset, glyph, color);
            }
            Sprite::Mana(m) => self.plot(m.pos, camera_offset, '◆', C_MANA),
            Sprite::Particle(p) => {
                let glyph = if p.fade() > 0.5 { '+' } else { '.' };
                self.plot(p.pos, camera_offset, glyph, rgb(p.color));
            }
        }
    }
}
