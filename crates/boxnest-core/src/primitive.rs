// crates/boxnest-core/src/primitive.rs
use glam::IVec2;

use crate::{Hooks, Insets, Sizer};

pub type PrimitiveId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveState {
    Live,
    Destroyed,
}

/// Membership of a primitive in a sizer cell. Identifies the cell only; it
/// owns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle {
    /// Primitive owning the sizer the cell belongs to, `None` for a root sizer.
    pub owner: Option<PrimitiveId>,
    pub row: usize,
    pub column: usize,
}

/// A rectangular entity taking part in the layout.
///
/// Positions are local to whatever contains the primitive. Operations that
/// need the rest of the tree (sizing, net positions, destruction) live on
/// [`crate::PrimitiveTree`].
#[derive(Debug)]
pub struct Primitive {
    pub(crate) name: String,
    pub(crate) position: IVec2,
    pub(crate) size: IVec2,
    pub(crate) min_size: IVec2,
    pub(crate) native_size: IVec2,
    pub(crate) borders: Insets,
    pub(crate) sizer: Option<Box<dyn Sizer>>,
    pub(crate) cell: Option<CellHandle>,
    pub(crate) parent: Option<PrimitiveId>,
    pub(crate) hooks: Hooks,
    pub(crate) state: PrimitiveState,
}

impl Primitive {
    pub fn new(size: IVec2) -> Self {
        Self {
            name: String::new(),
            position: IVec2::ZERO,
            size,
            min_size: size,
            native_size: size,
            borders: Insets::ZERO,
            sizer: None,
            cell: None,
            parent: None,
            hooks: Hooks::new(),
            state: PrimitiveState::Live,
        }
    }

    pub fn with_borders(mut self, borders: impl Into<Insets>) -> Self {
        self.borders = borders.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    /// The primitive's own floor, regardless of any nested sizer.
    pub fn own_min_size(&self) -> IVec2 {
        self.min_size
    }

    /// Intrinsic size, raised on each axis to the space its borders need.
    pub fn native_size(&self) -> IVec2 {
        self.native_size.max(self.borders.total())
    }

    pub fn borders(&self) -> Insets {
        self.borders
    }

    pub fn sizer(&self) -> Option<&dyn Sizer> {
        self.sizer.as_deref()
    }

    pub fn has_sizer(&self) -> bool {
        self.sizer.is_some()
    }

    pub fn cell(&self) -> Option<CellHandle> {
        self.cell
    }

    pub fn parent(&self) -> Option<PrimitiveId> {
        self.parent
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn state(&self) -> PrimitiveState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == PrimitiveState::Live
    }
}
