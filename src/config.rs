use crate::population::DEFAULT_TEMPO;
use clap::Parser;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

// Pico Unicorn panel, used when there is no terminal to fit.
pub const PANEL_WIDTH: u16 = 16;
pub const PANEL_HEIGHT: u16 = 7;
pub const DEFAULT_DECAY: u8 = 10;
pub const HEADLESS_TICKS: u64 = 1000;

#[derive(Parser, Debug, Clone)]
#[command(name = "wormfarm")]
#[command(about = "Worms crawling over an LED panel, in your terminal", long_about = None)]
pub struct Args {
    /// ticks per second at start (x/y change it by 2 while running)
    #[arg(long, default_value_t = DEFAULT_TEMPO, value_parser = clap::value_parser!(u32).range(1..))]
    pub tempo: u32,

    /// how much every LED fades per tick
    #[arg(long, default_value_t = DEFAULT_DECAY)]
    pub decay: u8,

    /// panel width in LEDs (default: fill the terminal)
    #[arg(long, value_parser = clap::value_parser!(u16).range(2..))]
    pub width: Option<u16>,

    /// panel height in LEDs (default: fill the terminal)
    #[arg(long, value_parser = clap::value_parser!(u16).range(2..))]
    pub height: Option<u16>,

    /// RNG seed (default: from the clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// run without a terminal against an in-memory panel
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// stop after this many ticks
    #[arg(long)]
    pub ticks: Option<u64>,

    /// headless only: print the final frame as JSON
    #[arg(long, default_value_t = false)]
    pub dump_frame: bool,

    /// write logs here (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0xC0FFEE)
        })
    }

    /// Panel size when nothing is there to measure.
    pub fn headless_grid(&self) -> (usize, usize) {
        (
            usize::from(self.width.unwrap_or(PANEL_WIDTH)),
            usize::from(self.height.unwrap_or(PANEL_HEIGHT)),
        )
    }

    /// Requested size, falling back to `fit` on each axis left unset.
    pub fn grid_within(&self, fit: (usize, usize)) -> (usize, usize) {
        (
            self.width.map(usize::from).unwrap_or(fit.0),
            self.height.map(usize::from).unwrap_or(fit.1),
        )
    }

    pub fn tick_limit(&self) -> Option<u64> {
        match (self.ticks, self.headless) {
            (Some(n), _) => Some(n),
            (None, true) => Some(HEADLESS_TICKS),
            (None, false) => None,
        }
    }
}
