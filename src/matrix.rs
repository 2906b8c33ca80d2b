use crate::color::{Rgb, BLACK};
use crate::error::MatrixError;
use serde::Serialize;

/// How a write combines with what is already lit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Additive,
    Overwrite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub color: Rgb,
}

/// Virtual LED panel. Worms paint into it during a tick; it is decayed once per tick and
/// then copied out to the display.
pub struct PixelMatrix {
    w: usize,
    h: usize,
    cells: Vec<Rgb>,
    decay_rate: u8,
}

impl PixelMatrix {
    pub fn new(w: usize, h: usize, decay_rate: u8) -> Result<Self, MatrixError> {
        if w == 0 || h == 0 {
            return Err(MatrixError::EmptyGrid {
                width: w,
                height: h,
            });
        }
        Ok(Self {
            w,
            h,
            cells: vec![BLACK; w * h],
            decay_rate,
        })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn decay_rate(&self) -> u8 {
        self.decay_rate
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h
    }

    fn idx(&self, x: i32, y: i32) -> Result<usize, MatrixError> {
        if !self.in_bounds(x, y) {
            return Err(MatrixError::OutOfBounds {
                x,
                y,
                width: self.w,
                height: self.h,
            });
        }
        Ok(y as usize * self.w + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Rgb, MatrixError> {
        let i = self.idx(x, y)?;
        Ok(self.cells[i])
    }

    pub fn write(&mut self, x: i32, y: i32, color: Rgb, mode: BlendMode) -> Result<(), MatrixError> {
        let i = self.idx(x, y)?;
        self.cells[i] = match mode {
            BlendMode::Additive => self.cells[i].blend_additive(color),
            BlendMode::Overwrite => color,
        };
        Ok(())
    }

    /// Fades every cell by `step`.
    pub fn decay_all(&mut self, step: u8) {
        for c in &mut self.cells {
            *c = c.decay(step);
        }
    }

    /// Fades every cell by the configured decay rate.
    pub fn decay(&mut self) {
        self.decay_all(self.decay_rate);
    }

    /// Row-major view of every cell.
    pub fn snapshot(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().enumerate().map(move |(i, &color)| Cell {
            x: i % self.w,
            y: i / self.w,
            color,
        })
    }

    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_black()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RED;

    #[test]
    fn additive_write_then_decay_only_touches_one_cell() {
        let mut m = PixelMatrix::new(5, 5, 10).unwrap();
        m.write(2, 2, RED, BlendMode::Additive).unwrap();
        m.decay_all(10);

        assert_eq!(m.get(2, 2).unwrap(), Rgb::new(245, 40, 40));
        for cell in m.snapshot() {
            if (cell.x, cell.y) != (2, 2) {
                assert_eq!(cell.color, BLACK, "({}, {}) was touched", cell.x, cell.y);
            }
        }
    }

    #[test]
    fn additive_writes_stack_and_saturate() {
        let mut m = PixelMatrix::new(2, 2, 10).unwrap();
        m.write(1, 0, RED, BlendMode::Additive).unwrap();
        m.write(1, 0, RED, BlendMode::Additive).unwrap();
        assert_eq!(m.get(1, 0).unwrap(), Rgb::new(255, 100, 100));
    }

    #[test]
    fn overwrite_replaces_the_cell() {
        let mut m = PixelMatrix::new(2, 2, 10).unwrap();
        m.write(0, 1, RED, BlendMode::Additive).unwrap();
        m.write(0, 1, Rgb::new(1, 2, 3), BlendMode::Overwrite).unwrap();
        assert_eq!(m.get(0, 1).unwrap(), Rgb::new(1, 2, 3));
    }

    #[test]
    fn writes_off_the_grid_fail() {
        let mut m = PixelMatrix::new(16, 7, 10).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (16, 0), (0, 7)] {
            assert_eq!(
                m.write(x, y, RED, BlendMode::Additive),
                Err(MatrixError::OutOfBounds {
                    x,
                    y,
                    width: 16,
                    height: 7
                })
            );
        }
        assert_eq!(m.lit_cells(), 0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(PixelMatrix::new(0, 7, 10).is_err());
        assert!(PixelMatrix::new(16, 0, 10).is_err());
        assert!(PixelMatrix::new(1, 1, 10).is_ok());
    }

    #[test]
    fn snapshot_is_row_major_and_read_only() {
        let mut m = PixelMatrix::new(3, 2, 10).unwrap();
        m.write(2, 1, RED, BlendMode::Overwrite).unwrap();
        let cells: Vec<Cell> = m.snapshot().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!((cells[1].x, cells[1].y), (1, 0));
        assert_eq!((cells[5].x, cells[5].y), (2, 1));
        assert_eq!(cells[5].color, RED);
        assert_eq!(m.snapshot().collect::<Vec<_>>(), cells);
    }

    #[test]
    fn configured_decay_rate_is_used() {
        let mut m = PixelMatrix::new(1, 1, 50).unwrap();
        m.write(0, 0, RED, BlendMode::Overwrite).unwrap();
        m.decay();
        assert_eq!(m.get(0, 0).unwrap(), Rgb::new(205, 0, 0));
    }
}
