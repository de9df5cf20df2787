// crates/boxnest-core/src/lib.rs
pub mod geometry;
pub mod hooks;
pub mod primitive;
pub mod sizer;
pub mod tree;

pub use geometry::*;
pub use hooks::*;
pub use primitive::*;
pub use sizer::*;
pub use tree::*;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Unknown primitive: {0}")]
    UnknownPrimitive(PrimitiveId),

    #[error("Primitive {0} has been destroyed")]
    Destroyed(PrimitiveId),

    #[error("Parenting {child} under {parent} would create a cycle")]
    ParentCycle {
        child: PrimitiveId,
        parent: PrimitiveId,
    },

    #[error("Cell ({row}, {column}) is already occupied")]
    CellOccupied { row: usize, column: usize },

    #[error("Cell ({row}, {column}) is outside the addressable grid")]
    CellOutOfRange { row: usize, column: usize },

    #[error("Layout engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
