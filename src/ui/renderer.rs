/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The playfield is scaled from game units to whatever terminal area is
/// available, so resizing the window rescales the scene instead of clipping it.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::PlayfieldConfig;
use crate::domain::entity::Rect;
use crate::sim::world::{Phase, Snapshot};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell. Using the same RGB for
    /// `Clear` and for cells keeps VTE terminals from showing row seams.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real
    /// cell, so every position is diffed on the next flush.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn fill(&mut self, area: CellRect, cell: Cell) {
        for y in area.row..area.row + area.rows {
            for x in area.col..area.col + area.cols {
                self.set(x, y, cell);
            }
        }
    }

    /// Write a string at (x, y). Each char occupies one column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Write a string horizontally centered on row y.
    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        self.put_str(self.width.saturating_sub(len) / 2, y, s, fg, bg);
    }
}

// ── Viewport: game units → terminal cells ──

/// A block of terminal cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct CellRect {
    col: usize,
    row: usize,
    cols: usize,
    rows: usize,
}

/// Maps the playfield onto a terminal area starting at (`left`, `top`).
#[derive(Clone, Copy, Debug)]
struct Viewport {
    left: usize,
    top: usize,
    cols: usize,
    rows: usize,
    units_w: i32,
    units_h: i32,
}

impl Viewport {
    fn new(playfield: &PlayfieldConfig, left: usize, top: usize, cols: usize, rows: usize) -> Self {
        Viewport {
            left,
            top,
            cols: cols.max(1),
            rows: rows.max(1),
            units_w: playfield.width.max(1),
            units_h: playfield.height.max(1),
        }
    }

    fn col(&self, x: i32) -> i64 {
        x as i64 * self.cols as i64 / self.units_w as i64
    }

    fn row(&self, y: i32) -> i64 {
        y as i64 * self.rows as i64 / self.units_h as i64
    }

    /// Cells covered by a game-space rectangle, clipped to the viewport.
    /// Anything with nonzero area on screen gets at least one cell.
    fn project(&self, r: &Rect) -> Option<CellRect> {
        let c0 = self.col(r.x);
        let r0 = self.row(r.y);
        let c1 = self.col(r.right()).max(c0 + 1);
        let r1 = self.row(r.bottom()).max(r0 + 1);

        let c0 = c0.clamp(0, self.cols as i64);
        let c1 = c1.clamp(0, self.cols as i64);
        let r0 = r0.clamp(0, self.rows as i64);
        let r1 = r1.clamp(0, self.rows as i64);
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        Some(CellRect {
            col: self.left + c0 as usize,
            row: self.top + r0 as usize,
            cols: (c1 - c0) as usize,
            rows: (r1 - r0) as usize,
        })
    }

    fn area(&self) -> CellRect {
        CellRect { col: self.left, row: self.top, cols: self.cols, rows: self.rows }
    }
}

/// Everything below the line the player stands on, if any of it lies
/// inside the playfield.
fn ground_band(pf: &PlayfieldConfig) -> Option<Rect> {
    let feet = pf.ground_y() + pf.player_size;
    let depth = pf.height - feet;
    (depth > 0).then(|| Rect::new(0, feet, pf.width, depth))
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const FIELD_ROW: usize = 2;
/// HUD, gap, gap, help bar.
const RESERVED_ROWS: usize = 4;

const SKY_BG: Color = Color::Rgb { r: 30, g: 34, b: 52 };
const GROUND_BG: Color = Color::Rgb { r: 70, g: 52, b: 36 };
const PLAYER_FG: Color = Color::Rgb { r: 80, g: 255, b: 120 };
const OBSTACLE_FG: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const HUD_FG: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const DIM_FG: Color = Color::Rgb { r: 120, g: 120, b: 140 };
const OVERLAY_BG: Color = Color::Rgb { r: 40, g: 40, b: 40 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<(Phase, bool)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.invalidate();

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Force a full repaint on the next frame.
    pub fn invalidate(&mut self) {
        self.back.invalidate();
    }

    pub fn render(&mut self, snap: &Snapshot<'_>) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            log::debug!("terminal resized to {tw}x{th}");
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Overlays come and go with phase and pause; repaint cleanly.
        let state = Some((snap.phase, snap.paused));
        if self.last_phase != state {
            self.back.invalidate();
            self.last_phase = state;
        }

        self.front.clear();
        self.compose(snap);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Composition ──

    fn compose(&mut self, snap: &Snapshot<'_>) {
        let field_rows = self.term_h.saturating_sub(RESERVED_ROWS);
        let view = Viewport::new(snap.playfield, 0, FIELD_ROW, self.term_w, field_rows);

        self.compose_hud(snap);
        self.compose_field(snap, &view);
        self.compose_help();

        match (snap.phase, snap.paused) {
            (Phase::GameOver, _) => self.compose_game_over(snap, &view),
            (Phase::Running, true) => self.compose_pause_overlay(&view),
            (Phase::Running, false) => {}
        }
    }

    fn compose_hud(&mut self, snap: &Snapshot<'_>) {
        let (label, color) = match (snap.phase, snap.paused) {
            (Phase::GameOver, _) => ("GAME OVER", OBSTACLE_FG),
            (Phase::Running, true) => ("PAUSED", HUD_FG),
            (Phase::Running, false) => ("RUNNING", PLAYER_FG),
        };
        self.front.put_str(1, HUD_ROW, "DASH RUNNER", HUD_FG, Color::Reset);
        let score = format!("Score: {:>6}", snap.score);
        self.front.put_str(15, HUD_ROW, &score, Color::White, Color::Reset);
        let alt = format!("Alt: {:>4}", snap.altitude);
        self.front.put_str(31, HUD_ROW, &alt, DIM_FG, Color::Reset);
        self.front.put_str(43, HUD_ROW, label, color, Color::Reset);
    }

    fn compose_field(&mut self, snap: &Snapshot<'_>, view: &Viewport) {
        let pf = snap.playfield;
        self.front.fill(view.area(), Cell::new(' ', Color::White, SKY_BG));

        if let Some(area) = ground_band(pf).and_then(|g| view.project(&g)) {
            self.front.fill(area, Cell::new('░', DIM_FG, GROUND_BG));
        }

        for obstacle in snap.obstacles {
            if let Some(area) = view.project(&obstacle.bounds()) {
                self.front.fill(area, Cell::new('▓', OBSTACLE_FG, SKY_BG));
            }
        }

        if let Some(area) = view.project(&snap.player) {
            self.front.fill(area, Cell::new('█', PLAYER_FG, SKY_BG));
        }
    }

    fn compose_help(&mut self) {
        if self.term_h == 0 {
            return;
        }
        let row = self.term_h - 1;
        self.front.put_str(
            1,
            row,
            "SPACE/\u{2191} Jump   P Pause   ENTER/R Restart   Q/ESC Quit",
            DIM_FG,
            Color::Reset,
        );
    }

    /// Dark box centered on the playfield, `lines.len() + 2` rows tall.
    fn compose_box(&mut self, view: &Viewport, lines: &[(&str, Color)]) {
        let area = view.area();
        let box_w = 36usize.min(area.cols);
        let box_h = (lines.len() + 2).min(area.rows);
        let col = area.col + area.cols.saturating_sub(box_w) / 2;
        let row = area.row + area.rows.saturating_sub(box_h) / 2;
        self.front.fill(
            CellRect { col, row, cols: box_w, rows: box_h },
            Cell::new(' ', Color::White, OVERLAY_BG),
        );
        for (i, (text, fg)) in lines.iter().enumerate().take(box_h.saturating_sub(1)) {
            self.front.put_centered(row + 1 + i, text, *fg, OVERLAY_BG);
        }
    }

    fn compose_game_over(&mut self, snap: &Snapshot<'_>, view: &Viewport) {
        let score = format!("Final score: {}", snap.score);
        self.compose_box(
            view,
            &[
                ("G A M E   O V E R", OBSTACLE_FG),
                ("", Color::White),
                (score.as_str(), Color::White),
                ("", Color::White),
                ("ENTER / R: Restart", PLAYER_FG),
                ("ESC / Q:   Quit", DIM_FG),
            ],
        );
    }

    fn compose_pause_overlay(&mut self, view: &Viewport) {
        self.compose_box(
            view,
            &[
                ("PAUSED", HUD_FG),
                ("", Color::White),
                ("P / F1: Resume", Color::Rgb { r: 100, g: 200, b: 255 }),
            ],
        );
    }
}
