use thiserror::Error;

/// Errors raised by the pixel matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("a pixel matrix needs at least one row and one column, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("pixel ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Errors that stop the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A worm computed a head position off the grid. This is a motion-model bug and is
    /// never clamped away.
    #[error("{variant} worm left the grid at x {x} (speed {dx}), y {y} (speed {dy})")]
    GeometryViolation {
        variant: &'static str,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
    },
    #[error("worms need a grid of at least 2x2, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}
