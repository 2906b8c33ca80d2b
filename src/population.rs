use crate::error::SimError;
use crate::matrix::PixelMatrix;
use crate::variant::Variant;
use crate::worm::{Lifespan, Worm};
use rand::Rng;
use tracing::{debug, info};

pub const DEFAULT_TEMPO: u32 = 16;
pub const MIN_TEMPO: u32 = 1;

/// The live worms plus the animation tempo (ticks per second).
pub struct Population {
    worms: Vec<Worm>,
    grid_w: usize,
    grid_h: usize,
    lifespan: Lifespan,
    tempo: u32,
}

impl Population {
    pub fn new(grid_w: usize, grid_h: usize, tempo: u32) -> Self {
        Self {
            worms: Vec::new(),
            grid_w,
            grid_h,
            lifespan: Lifespan::default(),
            tempo: tempo.max(MIN_TEMPO),
        }
    }

    pub fn with_lifespan(mut self, lifespan: Lifespan) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn len(&self) -> usize {
        self.worms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Worm> {
        self.worms.iter()
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    /// Registers an already built worm at the end of the list, on this population's lifespan.
    pub fn push(&mut self, worm: Worm) {
        self.worms.push(worm.with_lifespan(self.lifespan));
    }

    pub fn spawn<R: Rng + ?Sized>(&mut self, variant: Variant, rng: &mut R) {
        let worm =
            Worm::spawn(variant, self.grid_w, self.grid_h, rng).with_lifespan(self.lifespan);
        let (x, y) = worm.position();
        debug!(%variant, x, y, "worm spawned");
        self.worms.push(worm);
    }

    pub fn spawn_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let variant = Variant::random(rng);
        self.spawn(variant, rng);
    }

    /// One worm of every family, in table order.
    pub fn seed_all_variants<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for variant in Variant::ALL {
            self.spawn(variant, rng);
        }
    }

    /// Drops the newest worm. Nothing happens on an empty population.
    pub fn despawn_last(&mut self) -> Option<Worm> {
        let worm = self.worms.pop();
        if let Some(w) = &worm {
            debug!(variant = %w.variant(), "worm removed");
        }
        worm
    }

    /// Moves every worm one tick, oldest first.
    pub fn advance_all<R: Rng + ?Sized>(
        &mut self,
        matrix: &mut PixelMatrix,
        rng: &mut R,
    ) -> Result<(), SimError> {
        for worm in &mut self.worms {
            worm.advance(matrix, rng)?;
        }
        Ok(())
    }

    /// Removes dead worms and spawns a random replacement for each. Returns how many died.
    pub fn reap_dead<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let before = self.worms.len();
        self.worms.retain(|w| {
            if w.is_dead() {
                debug!(variant = %w.variant(), age = w.age(), "worm died");
            }
            !w.is_dead()
        });
        let dead = before - self.worms.len();
        for _ in 0..dead {
            self.spawn_random(rng);
        }
        dead
    }

    /// Positive `delta` slows the animation down. Tempo never drops below 1.
    pub fn adjust_tempo(&mut self, delta: i32) {
        let next = i64::from(self.tempo) - i64::from(delta);
        self.tempo = next.clamp(i64::from(MIN_TEMPO), i64::from(u32::MAX)) as u32;
        info!(tempo = self.tempo, "tempo changed");
    }
}
