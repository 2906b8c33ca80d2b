//! Worms crawling over an LED panel.
//!
//! The engine is [`sim::Simulation`]: a [`matrix::PixelMatrix`] the worms paint into and a
//! [`population::Population`] of [`worm::Worm`]s whose behavior comes from the
//! [`variant`] table. Frames leave through a [`display::PixelSink`].

pub mod app;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod matrix;
pub mod population;
pub mod sim;
pub mod variant;
pub mod worm;

pub use color::Rgb;
pub use error::{MatrixError, SimError};
pub use matrix::{BlendMode, PixelMatrix};
pub use population::Population;
pub use sim::{Button, SimConfig, Simulation};
pub use variant::Variant;
pub use worm::{Heading, LifeState, Lifespan, Worm};
