// crates/boxnest-layout/src/lib.rs
pub mod cell;
pub mod grid;
pub mod taffy_engine;

pub use cell::{Alignment, CellOptions, SizerItem};
pub use grid::{Direction, GridSizer};
