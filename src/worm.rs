use crate::color::Rgb;
use crate::error::SimError;
use crate::matrix::{BlendMode, PixelMatrix};
use crate::variant::{Cadence, Variant, VariantState};
use rand::Rng;
use tracing::error;

// Lifecycle (ticks)
const MAX_AGE: u32 = 5000;
const DYING_WINDOW: u32 = 1000;
// Dying worms skip up to this many frames between steps as they run out of life.
const AGE_SLOWDOWN: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifespan {
    pub max_age: u32,
    pub dying_window: u32,
    pub slowdown: u32,
}

impl Default for Lifespan {
    fn default() -> Self {
        Self {
            max_age: MAX_AGE,
            dying_window: DYING_WINDOW,
            slowdown: AGE_SLOWDOWN,
        }
    }
}

/// Screen directions: `Up` is toward row 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    Right,
    Left,
    Up,
    Down,
}

impl Heading {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Right => (1, 0),
            Heading::Left => (-1, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Heading::Right | Heading::Left)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifeState {
    Alive,
    Dying,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Worm {
    x: i32,
    y: i32,
    heading: Heading,
    age: u32,
    turn_chance: f32,
    variant: Variant,
    state: VariantState,
    lifespan: Lifespan,
    // frames left to sit out while dying
    wait_move: u32,
    grid_w: i32,
    grid_h: i32,
}

impl Worm {
    /// A fresh worm heading right from `(x, y)` on a `grid_w` x `grid_h` grid.
    pub fn new(variant: Variant, x: i32, y: i32, grid_w: usize, grid_h: usize) -> Self {
        Self {
            x,
            y,
            heading: Heading::Right,
            age: 0,
            turn_chance: variant.policy().turn_chance,
            variant,
            state: VariantState {
                last: (x, y),
                ..VariantState::default()
            },
            lifespan: Lifespan::default(),
            wait_move: 0,
            grid_w: grid_w as i32,
            grid_h: grid_h as i32,
        }
    }

    /// Drops a worm somewhere it can take its first step to the right.
    pub fn spawn<R: Rng + ?Sized>(
        variant: Variant,
        grid_w: usize,
        grid_h: usize,
        rng: &mut R,
    ) -> Self {
        let x = rng.gen_range(0..grid_w.saturating_sub(1).max(1)) as i32;
        let y = rng.gen_range(0..grid_h.max(1)) as i32;
        Self::new(variant, x, y, grid_w, grid_h)
    }

    pub fn with_heading(mut self, heading: Heading) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_turn_chance(mut self, p: f32) -> Self {
        self.turn_chance = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_lifespan(mut self, lifespan: Lifespan) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn turn_chance(&self) -> f32 {
        self.turn_chance
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn variant_state(&self) -> &VariantState {
        &self.state
    }

    pub(crate) fn variant_state_mut(&mut self) -> &mut VariantState {
        &mut self.state
    }

    pub fn life_left(&self) -> u32 {
        self.lifespan.max_age.saturating_sub(self.age)
    }

    pub fn life_state(&self) -> LifeState {
        let left = self.life_left();
        if left == 0 {
            LifeState::Dead
        } else if left <= self.lifespan.dying_window {
            LifeState::Dying
        } else {
            LifeState::Alive
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life_state() == LifeState::Dead
    }

    /// `base` as it looks at the worm's current age.
    pub fn aged(&self, base: Rgb) -> Rgb {
        match self.life_state() {
            LifeState::Alive => base,
            _ => base.fade_toward_age(self.life_left(), self.lifespan.dying_window),
        }
    }

    fn touching_left(&self) -> bool {
        self.x == 0
    }

    fn touching_right(&self) -> bool {
        self.x >= self.grid_w - 1
    }

    fn touching_top(&self) -> bool {
        self.y == 0
    }

    fn touching_bottom(&self) -> bool {
        self.y >= self.grid_h - 1
    }

    pub fn touching_any_edge(&self) -> bool {
        self.touching_left()
            || self.touching_right()
            || self.touching_top()
            || self.touching_bottom()
    }

    /// Sitting on an edge and facing off the grid.
    pub fn is_ramming_edge(&self) -> bool {
        match self.heading {
            Heading::Left => self.touching_left(),
            Heading::Right => self.touching_right(),
            Heading::Up => self.touching_top(),
            Heading::Down => self.touching_bottom(),
        }
    }

    /// Dying worms sit out a growing number of frames between steps.
    fn stall_for_age(&mut self) -> bool {
        if self.life_state() != LifeState::Dying {
            return false;
        }
        if self.wait_move == 0 {
            let window = u64::from(self.lifespan.dying_window.max(1));
            let spent = window - u64::from(self.life_left());
            let frames = (spent * u64::from(self.lifespan.slowdown)).div_ceil(window) + 1;
            self.wait_move = frames.min(u64::from(u32::MAX)) as u32;
        }
        self.wait_move -= 1;
        self.wait_move > 0
    }

    /// Swaps the moving axis, steering away from any edge the worm is touching.
    fn turn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.heading = if self.heading.is_horizontal() {
            if self.touching_top() {
                Heading::Down
            } else if self.touching_bottom() {
                Heading::Up
            } else if rng.gen_bool(0.5) {
                Heading::Down
            } else {
                Heading::Up
            }
        } else if self.touching_left() {
            Heading::Right
        } else if self.touching_right() {
            Heading::Left
        } else if rng.gen_bool(0.5) {
            Heading::Right
        } else {
            Heading::Left
        };
    }

    fn geometry_violation(&self) -> SimError {
        let (dx, dy) = self.heading.delta();
        error!(
            variant = self.variant.name(),
            x = self.x,
            y = self.y,
            dx,
            dy,
            "worm left the grid"
        );
        SimError::GeometryViolation {
            variant: self.variant.name(),
            x: self.x,
            y: self.y,
            dx,
            dy,
        }
    }

    /// One tick: step, maybe turn, paint the head, grow older.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        matrix: &mut PixelMatrix,
        rng: &mut R,
    ) -> Result<(), SimError> {
        let policy = self.variant.policy();
        self.state.last = (self.x, self.y);

        // An off-beat tick only redraws the head where it stands.
        if (policy.cadence)(self) == Cadence::Hold {
            let color = (policy.paint)(self);
            return matrix
                .write(self.x, self.y, color, BlendMode::Additive)
                .map_err(|_| self.geometry_violation());
        }

        if !self.stall_for_age() {
            let (dx, dy) = self.heading.delta();
            self.x += dx;
            self.y += dy;
        }

        // Turning only points the worm somewhere else; it moves next tick.
        if self.is_ramming_edge() || rng.gen::<f32>() < (policy.turn)(self) {
            self.turn(rng);
        }

        let color = (policy.paint)(self);
        matrix
            .write(self.x, self.y, color, BlendMode::Additive)
            .map_err(|_| self.geometry_violation())?;
        (policy.trail)(self, matrix).map_err(|_| self.geometry_violation())?;

        self.age = self.age.saturating_add(1);
        Ok(())
    }
}
