//! Behavioral profiles for the worm families.
//!
//! Every variant is a row in [`POLICIES`]: a base turn chance and color plus the functions
//! that decide turning, painting and move cadence. Adding a family means adding a tag and
//! a row.

use crate::color::{Rgb, BLUE, GREEN, GREY, ORANGE, PURPLE, RED, YELLOW};
use crate::error::MatrixError;
use crate::matrix::{BlendMode, PixelMatrix};
use crate::worm::Worm;
use rand::Rng;
use std::fmt;

/// Turn chance for worms that don't pick their own.
pub const DEFAULT_TURN_CHANCE: f32 = 0.25;
/// Wall huggers barely turn while touching an edge, so they run along it.
pub const WALL_HUG_TURN_CHANCE: f32 = 0.1;

pub const RAINBOW: [Rgb; 6] = [RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE];
pub const RAINBOW_DARKEN: u8 = 50;
pub const TWO_TONE_BODY: Rgb = GREY;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Turny,
    Straight,
    WallHugger,
    Slow,
    Rainbow,
    TwoTone,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Turny,
        Variant::Straight,
        Variant::WallHugger,
        Variant::Slow,
        Variant::Rainbow,
        Variant::TwoTone,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Variant {
        Variant::ALL[rng.gen_range(0..Variant::ALL.len())]
    }

    pub fn policy(self) -> &'static Policy {
        &POLICIES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.policy().name
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a worm may step this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    Move,
    Hold,
}

/// Per-variant memory carried by a worm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VariantState {
    pub palette_index: usize,
    pub hold_next: bool,
    pub last: (i32, i32),
}

pub struct Policy {
    pub name: &'static str,
    pub turn_chance: f32,
    pub color: Rgb,
    /// Probability of a voluntary turn this tick.
    pub turn: fn(&Worm) -> f32,
    pub paint: fn(&mut Worm) -> Rgb,
    pub cadence: fn(&mut Worm) -> Cadence,
    /// Runs after the head has been drawn.
    pub trail: fn(&Worm, &mut PixelMatrix) -> Result<(), MatrixError>,
}

pub static POLICIES: [Policy; 6] = [
    Policy {
        name: "turny",
        turn_chance: 0.6,
        color: RED,
        turn: own_chance,
        paint: steady_color,
        cadence: every_tick,
        trail: no_trail,
    },
    Policy {
        name: "straight",
        turn_chance: 0.2,
        color: BLUE,
        turn: own_chance,
        paint: steady_color,
        cadence: every_tick,
        trail: no_trail,
    },
    Policy {
        name: "wall-hugger",
        turn_chance: 0.6,
        color: GREEN,
        turn: hug_walls,
        paint: steady_color,
        cadence: every_tick,
        trail: no_trail,
    },
    Policy {
        name: "slow",
        turn_chance: 0.6,
        color: PURPLE,
        turn: own_chance,
        paint: steady_color,
        cadence: every_other_tick,
        trail: no_trail,
    },
    Policy {
        name: "rainbow",
        turn_chance: 0.3,
        color: RED,
        turn: own_chance,
        paint: cycle_rainbow,
        cadence: every_tick,
        trail: no_trail,
    },
    Policy {
        name: "two-tone",
        turn_chance: DEFAULT_TURN_CHANCE,
        color: RED,
        turn: own_chance,
        paint: steady_color,
        cadence: every_tick,
        trail: grey_body,
    },
];

fn own_chance(worm: &Worm) -> f32 {
    worm.turn_chance()
}

fn hug_walls(worm: &Worm) -> f32 {
    if worm.touching_any_edge() {
        WALL_HUG_TURN_CHANCE
    } else {
        worm.turn_chance()
    }
}

fn steady_color(worm: &mut Worm) -> Rgb {
    worm.aged(worm.variant().policy().color)
}

fn cycle_rainbow(worm: &mut Worm) -> Rgb {
    let state = worm.variant_state_mut();
    let base = RAINBOW[state.palette_index].decay(RAINBOW_DARKEN);
    state.palette_index = (state.palette_index + 1) % RAINBOW.len();
    worm.aged(base)
}

fn every_tick(_: &mut Worm) -> Cadence {
    Cadence::Move
}

fn every_other_tick(worm: &mut Worm) -> Cadence {
    let state = worm.variant_state_mut();
    let hold = state.hold_next;
    state.hold_next = !hold;
    if hold {
        Cadence::Hold
    } else {
        Cadence::Move
    }
}

fn no_trail(_: &Worm, _: &mut PixelMatrix) -> Result<(), MatrixError> {
    Ok(())
}

// Overwrite, not blend: the body has to stay grey under other trails.
fn grey_body(worm: &Worm, matrix: &mut PixelMatrix) -> Result<(), MatrixError> {
    let (x, y) = worm.variant_state().last;
    matrix.write(x, y, TWO_TONE_BODY, BlendMode::Overwrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn table_rows_line_up_with_tags() {
        let names: Vec<&str> = Variant::ALL.iter().map(|v| v.name()).collect();
        assert_eq!(
            names,
            ["turny", "straight", "wall-hugger", "slow", "rainbow", "two-tone"]
        );
        assert_eq!(Variant::Turny.policy().turn_chance, 0.6);
        assert_eq!(Variant::Straight.policy().turn_chance, 0.2);
        assert_eq!(Variant::WallHugger.policy().turn_chance, 0.6);
        assert_eq!(Variant::Slow.policy().turn_chance, 0.6);
        assert_eq!(Variant::Rainbow.policy().turn_chance, 0.3);
        assert_eq!(Variant::TwoTone.policy().turn_chance, DEFAULT_TURN_CHANCE);
    }

    #[test]
    fn random_variant_covers_every_family() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(Variant::random(&mut rng));
        }
        assert_eq!(seen.len(), Variant::ALL.len());
    }

    #[test]
    fn wall_hugger_turns_less_on_an_edge() {
        let on_edge = Worm::new(Variant::WallHugger, 0, 3, 16, 7);
        let inside = Worm::new(Variant::WallHugger, 5, 3, 16, 7);
        assert_eq!((on_edge.variant().policy().turn)(&on_edge), WALL_HUG_TURN_CHANCE);
        assert_eq!((inside.variant().policy().turn)(&inside), 0.6);
    }

    #[test]
    fn slow_cadence_alternates_starting_with_a_move() {
        let mut worm = Worm::new(Variant::Slow, 5, 3, 16, 7);
        let cadence = Variant::Slow.policy().cadence;
        let seq: Vec<Cadence> = (0..4).map(|_| cadence(&mut worm)).collect();
        assert_eq!(
            seq,
            [Cadence::Move, Cadence::Hold, Cadence::Move, Cadence::Hold]
        );
    }

    #[test]
    fn rainbow_walks_the_darkened_palette() {
        let mut worm = Worm::new(Variant::Rainbow, 5, 3, 16, 7);
        let paint = Variant::Rainbow.policy().paint;
        let colors: Vec<Rgb> = (0..7).map(|_| paint(&mut worm)).collect();
        assert_eq!(colors[0], Rgb::new(205, 0, 0));
        assert_eq!(colors[1], Rgb::new(205, 70, 0));
        assert_eq!(colors[5], Rgb::new(205, 0, 205));
        assert_eq!(colors[6], colors[0]);
    }
}
