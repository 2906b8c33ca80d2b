use crate::display::PixelSink;
use crate::error::SimError;
use crate::matrix::PixelMatrix;
use crate::population::Population;
use crate::worm::Lifespan;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;

/// Tempo change per button press.
pub const TEMPO_STEP: i32 = 2;

/// The four panel buttons, already debounced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// A: add a worm of a random family.
    Spawn,
    /// B: remove the newest worm.
    Despawn,
    /// X
    SlowDown,
    /// Y
    SpeedUp,
}

#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub tempo: u32,
    pub decay: u8,
    pub seed: u64,
    pub lifespan: Lifespan,
}

/// Per-tick counters for the status line and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub worms: usize,
    pub deaths: usize,
}

pub struct Simulation {
    matrix: PixelMatrix,
    population: Population,
    rng: StdRng,
    tick: u64,
}

impl Simulation {
    /// Builds an empty simulation. Worms need room to turn, so both sides must be at
    /// least 2.
    pub fn new(cfg: SimConfig) -> Result<Self, SimError> {
        if cfg.width < 2 || cfg.height < 2 {
            return Err(SimError::GridTooSmall {
                width: cfg.width,
                height: cfg.height,
            });
        }
        Ok(Self {
            matrix: PixelMatrix::new(cfg.width, cfg.height, cfg.decay)?,
            population: Population::new(cfg.width, cfg.height, cfg.tempo)
                .with_lifespan(cfg.lifespan),
            rng: StdRng::seed_from_u64(cfg.seed),
            tick: 0,
        })
    }

    /// Same as [`Simulation::new`] with one worm of every family already crawling.
    pub fn seeded(cfg: SimConfig) -> Result<Self, SimError> {
        let mut sim = Self::new(cfg)?;
        sim.population.seed_all_variants(&mut sim.rng);
        Ok(sim)
    }

    pub fn matrix(&self) -> &PixelMatrix {
        &self.matrix
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn press(&mut self, button: Button) {
        match button {
            Button::Spawn => self.population.spawn_random(&mut self.rng),
            Button::Despawn => {
                self.population.despawn_last();
            }
            Button::SlowDown => self.population.adjust_tempo(TEMPO_STEP),
            Button::SpeedUp => self.population.adjust_tempo(-TEMPO_STEP),
        }
    }

    /// Input, then every worm in insertion order, then the dead are replaced, then the
    /// panel fades once.
    pub fn tick(&mut self, buttons: &[Button]) -> Result<TickReport, SimError> {
        for &b in buttons {
            self.press(b);
        }

        self.population.advance_all(&mut self.matrix, &mut self.rng)?;
        let deaths = self.population.reap_dead(&mut self.rng);
        self.matrix.decay();
        self.tick += 1;

        Ok(TickReport {
            tick: self.tick,
            worms: self.population.len(),
            deaths,
        })
    }

    /// Copies the panel into the display sink.
    pub fn render(&self, sink: &mut dyn PixelSink) {
        for cell in self.matrix.snapshot() {
            sink.set_pixel(cell.x, cell.y, cell.color);
        }
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.population.tempo()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use crate::display::MemoryDisplay;

    fn cfg(seed: u64) -> SimConfig {
        SimConfig {
            width: 16,
            height: 7,
            tempo: 16,
            decay: 10,
            seed,
            lifespan: Lifespan::default(),
        }
    }

    #[test]
    fn tiny_grids_are_refused() {
        for (w, h) in [(1, 7), (16, 1), (0, 0)] {
            let err = Simulation::new(SimConfig {
                width: w,
                height: h,
                ..cfg(1)
            });
            assert!(matches!(err, Err(SimError::GridTooSmall { .. })));
        }
    }

    #[test]
    fn same_seed_same_frames() {
        let mut a = Simulation::seeded(cfg(42)).unwrap();
        let mut b = Simulation::seeded(cfg(42)).unwrap();
        for _ in 0..200 {
            a.tick(&[]).unwrap();
            b.tick(&[]).unwrap();
        }
        let fa: Vec<_> = a.matrix().snapshot().collect();
        let fb: Vec<_> = b.matrix().snapshot().collect();
        assert_eq!(fa, fb);
    }

    #[test]
    fn buttons_drive_population_and_tempo() {
        let mut sim = Simulation::seeded(cfg(3)).unwrap();
        let report = sim
            .tick(&[Button::Spawn, Button::Spawn, Button::Despawn])
            .unwrap();
        assert_eq!(report.worms, 7);
        sim.tick(&[Button::SpeedUp, Button::SpeedUp]).unwrap();
        assert_eq!(sim.population().tempo(), 20);
        sim.tick(&[Button::SlowDown]).unwrap();
        assert_eq!(sim.population().tempo(), 18);
        assert_eq!(sim.tick_count(), 3);
    }

    #[test]
    fn despawning_everything_lets_the_panel_fade_out() {
        let mut sim = Simulation::seeded(cfg(5)).unwrap();
        for _ in 0..10 {
            sim.tick(&[]).unwrap();
        }
        let all_gone = [Button::Despawn; 6];
        sim.tick(&all_gone).unwrap();
        assert!(sim.population().is_empty());
        for _ in 0..26 {
            sim.tick(&[Button::Despawn]).unwrap();
        }
        assert_eq!(sim.matrix().lit_cells(), 0);
    }

    #[test]
    fn population_survives_many_lifetimes() {
        let mut sim = Simulation::seeded(SimConfig {
            lifespan: Lifespan {
                max_age: 60,
                dying_window: 20,
                slowdown: 6,
            },
            ..cfg(9)
        })
        .unwrap();
        let mut deaths = 0;
        for _ in 0..500 {
            let report = sim.tick(&[]).unwrap();
            assert_eq!(report.worms, 6);
            deaths += report.deaths;
        }
        assert!(deaths >= 30);
    }

    #[test]
    fn render_paints_every_cell() {
        let mut sim = Simulation::seeded(cfg(11)).unwrap();
        sim.tick(&[]).unwrap();
        let mut display = MemoryDisplay::new(16, 7);
        sim.render(&mut display);
        assert_eq!(display.writes(), 16 * 7);
        for cell in sim.matrix().snapshot() {
            assert_eq!(display.pixel(cell.x, cell.y), Some(cell.color));
        }
        assert!(sim.matrix().snapshot().any(|c| c.color != BLACK));
    }

    #[test]
    fn frame_delay_follows_tempo() {
        let mut sim = Simulation::new(cfg(1)).unwrap();
        assert_eq!(sim.frame_delay(), Duration::from_secs_f64(1.0 / 16.0));
        sim.press(Button::SlowDown);
        assert_eq!(sim.frame_delay(), Duration::from_secs_f64(1.0 / 14.0));
    }
}
