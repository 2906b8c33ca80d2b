use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const RED: Rgb = Rgb::new(255, 50, 50);
pub const GREEN: Rgb = Rgb::new(50, 255, 50);
pub const BLUE: Rgb = Rgb::new(50, 50, 255);
pub const YELLOW: Rgb = Rgb::new(255, 255, 50);
pub const PURPLE: Rgb = Rgb::new(255, 50, 255);
pub const ORANGE: Rgb = Rgb::new(255, 120, 50);
pub const GREY: Rgb = Rgb::new(150, 150, 150);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn map(self, f: impl Fn(u8) -> u8) -> Rgb {
        Rgb::new(f(self.r), f(self.g), f(self.b))
    }

    /// Per-channel sum, saturating at 255. Overlapping trails brighten until they clip.
    pub fn blend_additive(self, add: Rgb) -> Rgb {
        Rgb::new(
            self.r.saturating_add(add.r),
            self.g.saturating_add(add.g),
            self.b.saturating_add(add.b),
        )
    }

    /// Per-channel subtraction floored at 0.
    pub fn decay(self, step: u8) -> Rgb {
        self.map(|c| c.saturating_sub(step))
    }

    /// Fades a color as its owner runs out of life.
    ///
    /// `life_left` counts the ticks of the `window`-long dying window still ahead (equal to
    /// `window` = just started dying, 0 = dead). Channels first converge on their mean,
    /// which greys the color out, and then the whole color is pulled down toward black.
    pub fn fade_toward_age(self, life_left: u32, window: u32) -> Rgb {
        let window = u64::from(window.max(1));
        let spent = window - u64::from(life_left).min(window);
        let sum = u64::from(self.r) + u64::from(self.g) + u64::from(self.b);
        // a mean of thirds never lands on a half
        let avg = (sum + 1) / 3;
        let fraction = ((2 * avg * spent + window) / (2 * window)) as i32;
        let avg = avg as i32;

        self.map(|c| {
            let c = i32::from(c);
            let toward = if c > avg {
                (c - 2 * fraction).max(avg)
            } else {
                (c + fraction).min(avg)
            };
            (toward - fraction).clamp(0, 255) as u8
        })
    }

    pub fn is_black(self) -> bool {
        self == BLACK
    }

    pub fn to_color(self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [Rgb; 8] = [BLACK, RED, GREEN, BLUE, YELLOW, PURPLE, ORANGE, GREY];

    #[test]
    fn additive_blend_never_darkens_and_clips_at_255() {
        for base in SAMPLES {
            for add in SAMPLES {
                let out = base.blend_additive(add);
                assert!(out.r >= base.r && out.g >= base.g && out.b >= base.b);
                assert_eq!(out, add.blend_additive(base));
            }
        }
        assert_eq!(
            Rgb::new(200, 10, 0).blend_additive(Rgb::new(100, 10, 0)),
            Rgb::new(255, 20, 0)
        );
    }

    #[test]
    fn saturated_blend_loses_information() {
        let a = Rgb::new(250, 0, 0).blend_additive(Rgb::new(10, 0, 0));
        let b = Rgb::new(250, 0, 0).blend_additive(Rgb::new(90, 0, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn decay_reaches_black_and_stays_there() {
        for start in SAMPLES {
            let mut c = start;
            for _ in 0..26 {
                c = c.decay(10);
            }
            assert!(c.is_black(), "{start:?} still lit: {c:?}");
            assert_eq!(c.decay(10), BLACK);
        }
        assert_eq!(RED.decay(10), Rgb::new(245, 40, 40));
    }

    #[test]
    fn fade_is_identity_with_full_life() {
        for c in SAMPLES {
            assert_eq!(c.fade_toward_age(1000, 1000), c);
        }
    }

    #[test]
    fn fade_reaches_black_with_no_life() {
        for c in SAMPLES {
            assert_eq!(c.fade_toward_age(0, 1000), BLACK);
        }
    }

    #[test]
    fn fade_greys_out_before_going_dark() {
        // avg 118, fraction 59: red max(137, 118) - 59, the others min(109, 118) - 59
        assert_eq!(RED.fade_toward_age(500, 1000), Rgb::new(78, 50, 50));
        // avg 150 on a grey: only the darkening step applies
        assert_eq!(GREY.fade_toward_age(500, 1000), Rgb::new(75, 75, 75));
    }

    #[test]
    fn fade_clamps_life_beyond_the_window() {
        assert_eq!(BLUE.fade_toward_age(3000, 1000), BLUE);
        assert_eq!(BLUE.fade_toward_age(0, 0), BLACK);
        assert_eq!(BLUE.fade_toward_age(5, 0), BLUE);
    }

    #[test]
    fn fade_rounds_exact_halves_up() {
        // avg 150, fraction = round(150 * 10 / 1000) = round(1.5) = 2
        assert_eq!(GREY.fade_toward_age(990, 1000), Rgb::new(148, 148, 148));
        // avg 118, fraction = round(118 * 30 / 1000) = round(3.54) = 4
        assert_eq!(RED.fade_toward_age(970, 1000), Rgb::new(243, 50, 50));
    }

    #[test]
    fn fade_moves_channels_monotonically_toward_black() {
        let mut prev = PURPLE.fade_toward_age(1000, 1000);
        for step in (0..=10).rev() {
            let next = PURPLE.fade_toward_age(step * 100, 1000);
            let sum = |c: Rgb| u32::from(c.r) + u32::from(c.g) + u32::from(c.b);
            assert!(sum(next) <= sum(prev));
            prev = next;
        }
    }
}
