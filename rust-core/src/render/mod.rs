//! Figure rendering with tiny-skia and resvg

pub mod colormap;
pub mod decimate;
pub mod figure;
pub mod svg;
pub mod ticks;

pub use colormap::Colormap;
pub use figure::{FigureConfig, FigureRenderer};
