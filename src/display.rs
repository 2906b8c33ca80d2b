use crate::color::{Rgb, BLACK};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Where finished frames go: a fixed-size panel of RGB pixels.
pub trait PixelSink {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb);
}

/// Keeps the last frame in memory. Used headless and in tests.
pub struct MemoryDisplay {
    w: usize,
    h: usize,
    pixels: Vec<Rgb>,
    writes: usize,
}

impl MemoryDisplay {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            pixels: vec![BLACK; w * h],
            writes: 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.w || y >= self.h {
            return None;
        }
        Some(self.pixels[y * self.w + x])
    }

    /// Total `set_pixel` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PixelSink for MemoryDisplay {
    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.w && y < self.h {
            self.pixels[y * self.w + x] = color;
        }
        self.writes += 1;
    }
}

// Each LED is two terminal columns wide so it comes out roughly square.
const LED: &str = "██";
const LED_COLS: u16 = 2;
// Bottom row holds the status line.
const STATUS_ROWS: u16 = 1;

/// Largest panel that fits a terminal of `cols` x `rows`.
pub fn fit_grid(cols: u16, rows: u16) -> (usize, usize) {
    (
        usize::from(cols / LED_COLS),
        usize::from(rows.saturating_sub(STATUS_ROWS)),
    )
}

/// The terminal standing in for an LED panel.
pub struct TerminalDisplay {
    out: io::Stdout,
    cols: u16,
    rows: u16,
    w: usize,
    h: usize,
    cur: Vec<Rgb>,
    prev: Vec<Option<Rgb>>,
    status: String,
    last_status: String,
}

impl TerminalDisplay {
    /// Switches to the alternate screen. The panel is `w` x `h` LEDs.
    pub fn begin(w: usize, h: usize) -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;

        Ok(Self {
            out,
            cols,
            rows,
            w,
            h,
            cur: vec![BLACK; w * h],
            prev: vec![None; w * h],
            status: String::new(),
            last_status: String::new(),
        })
    }

    pub fn end(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()
    }

    /// Re-centers after the terminal changed size and forces a full redraw.
    pub fn resize_if_needed(&mut self) -> io::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev.fill(None);
        self.last_status.clear();
        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        Ok(true)
    }

    pub fn set_status(&mut self, line: String) {
        self.status = line;
    }

    fn origin(&self) -> (u16, u16) {
        let panel_cols = (self.w as u16).saturating_mul(LED_COLS);
        let panel_rows = self.h as u16 + STATUS_ROWS;
        (
            self.cols.saturating_sub(panel_cols) / 2,
            self.rows.saturating_sub(panel_rows) / 2,
        )
    }

    /// Draws whatever changed since the last frame.
    pub fn present(&mut self) -> io::Result<()> {
        let (ox, oy) = self.origin();
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        for y in 0..self.h {
            for x in 0..self.w {
                let i = y * self.w + x;
                let c = self.cur[i];
                if self.prev[i] == Some(c) {
                    continue;
                }
                self.prev[i] = Some(c);

                queue!(
                    self.out,
                    cursor::MoveTo(ox + x as u16 * LED_COLS, oy + y as u16)
                )?;
                if last_fg != Some(c) {
                    queue!(self.out, SetForegroundColor(c.to_color()))?;
                    last_fg = Some(c);
                }
                queue!(self.out, Print(LED))?;
            }
        }

        if self.status != self.last_status {
            let width = usize::from(self.cols.saturating_sub(ox));
            let line: String = format!("{:<width$}", self.status).chars().take(width).collect();
            queue!(
                self.out,
                cursor::MoveTo(ox, oy + self.h as u16),
                SetForegroundColor(Color::Grey),
                Print(line)
            )?;
            self.last_status.clone_from(&self.status);
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

impl PixelSink for TerminalDisplay {
    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.w && y < self.h {
            self.cur[y * self.w + x] = color;
        }
    }
}
