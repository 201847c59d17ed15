/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Rasterize the frame's draw commands into the `front` buffer
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// ## Units
///
/// Draw commands are in world units. One terminal column is `UNIT_W`
/// units wide and one row is `UNIT_H` units tall, so a 40-unit word is
/// two rows high. Rotation can't be drawn on a character grid; it is
/// approximated by shifting each row sideways about the shape's center.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::word::TextMeasure;
use super::draw::DrawCommand;

pub const UNIT_W: f32 = 10.0;
pub const UNIT_H: f32 = 20.0;

/// Rows reserved outside the canvas: HUD on top, entry + help at the bottom.
const HUD_ROW: usize = 0;
const CANVAS_ROW: usize = 1;
const RESERVED_ROWS: usize = 3;

/// Canvas size in world units for a terminal of `cols` x `rows`.
pub fn canvas_size(cols: u16, rows: u16) -> (f32, f32) {
    let canvas_rows = (rows as usize).saturating_sub(RESERVED_ROWS).max(1);
    (cols as f32 * UNIT_W, canvas_rows as f32 * UNIT_H)
}

/// Text extent on the character grid: one column per char.
pub struct CellMetrics;

impl TextMeasure for CellMetrics {
    fn width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * UNIT_W
    }
}

fn gray(v: u8) -> Color {
    Color::Rgb { r: v, g: v, b: v }
}

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit near-black background for every "empty" terminal cell, so
    /// inter-row gaps match cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 0, g: 0, b: 0 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
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
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
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

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Canvas: world-unit rasterizer over a region of the buffer ──

/// Maps canvas cells (which may be off-screen) onto buffer rows
/// `top..top + rows`.
struct Canvas<'a> {
    buf: &'a mut FrameBuffer,
    top: usize,
    rows: usize,
}

impl<'a> Canvas<'a> {
    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || row as usize >= self.rows {
            return;
        }
        self.buf.set(col as usize, self.top + row as usize, cell);
    }

    fn get(&self, col: i32, row: i32) -> Cell {
        if col < 0 || row < 0 || row as usize >= self.rows {
            return Cell::BLANK;
        }
        self.buf.get(col as usize, self.top + row as usize)
    }

    fn draw(&mut self, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::Floor { y, height, gray: g, .. } => {
                let r0 = (y / UNIT_H).round() as i32;
                let r1 = ((y + height) / UNIT_H).round().max(r0 as f32 + 1.0) as i32;
                let cols = self.buf.width as i32;
                for row in r0..r1 {
                    for col in 0..cols {
                        self.put(col, row, Cell::new(' ', Color::White, gray(*g)));
                    }
                }
            }
            DrawCommand::Rect { x, y, w, h, radius, rotation, fill, stroke, stroke_width } => {
                self.draw_rect(*x, *y, *w, *h, *radius, *rotation, *fill, *stroke, *stroke_width);
            }
            DrawCommand::Text { x, y, text, gray: g, rotation, pivot } => {
                let row = (y / UNIT_H).floor() as i32;
                let shift = row_shift(row, pivot.1, *rotation);
                let col0 = (x / UNIT_W).round() as i32 + shift;
                for (i, ch) in text.chars().enumerate() {
                    let col = col0 + i as i32;
                    // keep whatever is underneath as background
                    let under = self.get(col, row);
                    self.put(col, row, Cell::new(ch, gray(*g), under.bg));
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        rotation: f32,
        fill: u8,
        stroke: u8,
        stroke_width: f32,
    ) {
        let c0 = (x / UNIT_W).round() as i32;
        let r0 = (y / UNIT_H).round() as i32;
        let cols = ((w / UNIT_W).round() as i32).max(1);
        let rows = ((h / UNIT_H).round() as i32).max(1);
        let cy = y + h / 2.0;
        let bg = gray(fill);
        let fg = gray(stroke);
        let edged = stroke_width > 0.0 && cols >= 2;

        for k in 0..rows {
            let row = r0 + k;
            let shift = row_shift(row, cy, rotation);
            for j in 0..cols {
                let col = c0 + j + shift;
                let ch = if !edged {
                    ' '
                } else if j == 0 || j == cols - 1 {
                    edge_glyph(j == 0, k, rows, radius > 0.0)
                } else {
                    ' '
                };
                self.put(col, row, Cell::new(ch, fg, bg));
            }
        }
    }
}

/// Sideways shift in columns for `row` when rotating by `rotation`
/// about a center at world y `cy`.
fn row_shift(row: i32, cy: f32, rotation: f32) -> i32 {
    if rotation == 0.0 {
        return 0;
    }
    let dy = (row as f32 + 0.5) * UNIT_H - cy;
    (-dy * rotation.sin() / UNIT_W).round() as i32
}

fn edge_glyph(left: bool, k: i32, rows: i32, rounded: bool) -> char {
    let top = k == 0 && rows > 1;
    let bottom = k == rows - 1 && rows > 1;
    match (left, top, bottom, rounded) {
        (true, true, _, true) => '╭',
        (false, true, _, true) => '╮',
        (true, _, true, true) => '╰',
        (false, _, true, true) => '╯',
        (true, true, _, false) => '┌',
        (false, true, _, false) => '┐',
        (true, _, true, false) => '└',
        (false, _, true, false) => '┘',
        _ => '│',
    }
}

// ── Status: everything drawn outside the canvas ──

pub struct Status<'a> {
    pub clock: &'a str,
    pub pool: usize,
    pub falling: usize,
    pub stacked: usize,
    /// `Some((text, cursor))` while the entry line has focus.
    pub entry: Option<(&'a str, usize)>,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
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
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

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

    /// Canvas size in world units for the current terminal.
    pub fn canvas_size(&self) -> (f32, f32) {
        canvas_size(self.term_w as u16, self.term_h as u16)
    }

    pub fn render(&mut self, commands: &[DrawCommand], status: &Status) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose_frame(&mut self.front, commands, status);

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal's
        // own default, which may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
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
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose_frame(buf: &mut FrameBuffer, commands: &[DrawCommand], status: &Status) {
    let rows = buf.height.saturating_sub(RESERVED_ROWS);
    let hud_bg = Color::Rgb { r: 30, g: 30, b: 30 };

    // ── Canvas ──
    {
        let mut canvas = Canvas { buf: &mut *buf, top: CANVAS_ROW, rows };
        for cmd in commands {
            canvas.draw(cmd);
        }
    }

    // ── HUD row ──
    let hud = format!(
        " {}   pool:{}  falling:{}  stacked:{} ",
        status.clock, status.pool, status.falling, status.stacked,
    );
    buf.fill_row(HUD_ROW, hud_bg);
    buf.put_str(0, HUD_ROW, &hud, Color::White, hud_bg);

    // ── Entry line ──
    let entry_row = CANVAS_ROW + rows;
    if entry_row < buf.height {
        match status.entry {
            Some((text, cursor)) => {
                let entry_bg = Color::Rgb { r: 45, g: 45, b: 45 };
                buf.fill_row(entry_row, entry_bg);
                buf.put_str(0, entry_row, "> ", Color::White, entry_bg);
                buf.put_str(2, entry_row, text, Color::White, entry_bg);
                // caret: inverted cell
                let at = 2 + cursor;
                let under = text.chars().nth(cursor).unwrap_or(' ');
                buf.set(at, entry_row, Cell::new(under, Color::Black, Color::White));
            }
            None => {
                buf.put_str(0, entry_row, " Enter or / to type words", Color::DarkGrey, Cell::BASE_BG);
            }
        }
    }

    // ── Help bar ──
    let help_row = entry_row + 1;
    if help_row < buf.height {
        let help = match status.entry {
            Some(_) => " Enter:Submit  Esc:Back  Ctrl+C:Quit",
            None => " a-z:Clear words by first letter  Esc:Quit",
        };
        buf.put_str(0, help_row, help, Color::DarkGrey, Cell::BASE_BG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status() -> Status<'static> {
        Status { clock: "00:00", pool: 0, falling: 0, stacked: 0, entry: None }
    }

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    fn cols(buf: &FrameBuffer, y: usize, from: usize, to: usize) -> String {
        (from..to).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn canvas_size_reserves_rows() {
        assert_eq!(canvas_size(80, 24), (800.0, 420.0));
        assert_eq!(canvas_size(10, 2), (100.0, 20.0));
    }

    #[test]
    fn cell_metrics_counts_chars() {
        assert_eq!(CellMetrics.width("héllo"), 50.0);
        assert_eq!(CellMetrics.width(""), 0.0);
    }

    #[test]
    fn upright_word_rasterizes_as_box_with_text() {
        let mut buf = FrameBuffer::new(20, 8);
        let cmds = vec![
            DrawCommand::Rect {
                x: 20.0, y: 40.0, w: 50.0, h: 40.0,
                radius: 3.0, rotation: 0.0, fill: 120, stroke: 100, stroke_width: 1.0,
            },
            DrawCommand::Text {
                x: 30.0, y: 50.0, text: "abc".into(), gray: 255,
                rotation: 0.0, pivot: (45.0, 60.0),
            },
        ];
        compose_frame(&mut buf, &cmds, &status());

        // canvas rows 2..4 land on buffer rows 3..5
        assert_eq!(cols(&buf, 3, 2, 7), "╭abc╮");
        assert_eq!(cols(&buf, 4, 2, 7), "╰   ╯");
        let text_cell = buf.get(3, 3);
        assert_eq!(text_cell.fg, gray(255));
        assert_eq!(text_cell.bg, gray(120));
    }

    #[test]
    fn floor_fills_band() {
        let mut buf = FrameBuffer::new(4, 8);
        let cmds = vec![DrawCommand::Floor { y: 80.0, width: 40.0, height: 20.0, gray: 50 }];
        compose_frame(&mut buf, &cmds, &status());
        // canvas has 5 rows (1..=5); floor is canvas row 4 = buffer row 5
        for x in 0..4 {
            assert_eq!(buf.get(x, 5).bg, gray(50));
            assert_eq!(buf.get(x, 4).bg, Cell::BASE_BG);
        }
    }

    #[test]
    fn words_above_canvas_are_clipped() {
        let mut buf = FrameBuffer::new(10, 6);
        let cmds = vec![DrawCommand::Rect {
            x: 0.0, y: -40.0, w: 50.0, h: 40.0,
            radius: 0.0, rotation: 0.0, fill: 90, stroke: 100, stroke_width: 1.0,
        }];
        compose_frame(&mut buf, &cmds, &status());
        for y in CANVAS_ROW..CANVAS_ROW + 3 {
            for x in 0..10 {
                assert_eq!(buf.get(x, y).bg, Cell::BASE_BG);
            }
        }
    }

    #[test]
    fn rotation_shears_rows_opposite_ways() {
        // 90 degrees: top row shifts right, bottom row shifts left
        assert_eq!(row_shift(0, 20.0, std::f32::consts::FRAC_PI_2), 1);
        assert_eq!(row_shift(1, 20.0, std::f32::consts::FRAC_PI_2), -1);
        assert_eq!(row_shift(0, 20.0, 0.05), 0);
    }

    #[test]
    fn hud_and_entry_lines() {
        let mut buf = FrameBuffer::new(40, 6);
        let s = Status {
            clock: "01:05",
            pool: 3,
            falling: 1,
            stacked: 2,
            entry: Some(("hey", 3)),
        };
        compose_frame(&mut buf, &[], &s);
        assert!(row_text(&buf, 0).contains("01:05"));
        assert!(row_text(&buf, 0).contains("stacked:2"));
        assert!(row_text(&buf, 4).starts_with("> hey"));
        assert_eq!(buf.get(5, 4).bg, Color::White);
    }
}
